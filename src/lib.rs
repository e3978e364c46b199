//! # bibler
//!
//! Look up entries in a BibTeX file and open the document they link to.
//!
//! Provides:
//! - **Library**: loading, case-insensitive search, interactive resolution,
//!   link classification, viewer dispatch, and a listing report
//! - **CLI**: `bibler` binary (`cli` feature, on by default)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> bibler::error::Result<()> {
//! use bibler::{Config, Session, TerminalPrompt};
//!
//! let session = Session::open(Config::discover(None)?, None)?;
//!
//! // Opens directly when "doe2020" is a key, prompts otherwise.
//! let outcome = session.lookup_key("doe2020", &mut TerminalPrompt::new()).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Searching
//!
//! ```
//! use bibler::{Bibliography, Entry};
//!
//! let bib: Bibliography = vec![
//!     Entry::new("doe2020").with_field("author", "Doe, J."),
//!     Entry::new("roe2021").with_field("author", "Roe, R."),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(bib.search_by_author("DOE").keys(), vec!["doe2020"]);
//! ```

pub mod config;
pub mod error;
pub mod links;
pub mod parse;
pub mod report;
pub mod resolve;
pub mod search;
pub mod session;
pub mod types;
pub mod viewer;

// Re-export key types at the crate root.
pub use config::{Config, ViewerCommand};
pub use error::BiblerError;
#[cfg(feature = "cli")]
pub use resolve::TerminalPrompt;
pub use resolve::Prompt;
pub use session::{Outcome, Session};
pub use types::*;
