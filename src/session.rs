//! A lookup session: one loaded bibliography plus the parts needed to open
//! what the user asks for.

use crate::config::Config;
use crate::error::Result;
use crate::links::LinkClassifier;
use crate::parse;
use crate::report::{list_all, Report};
use crate::resolve::{exact_link, link_or_search, resolve, LinkChoice, Prompt};
use crate::types::{Bibliography, Entry, Launched, Resolution, SearchField, SearchResult, Target};
use crate::viewer::Dispatcher;
use serde::Serialize;
use std::path::Path;

/// What a lookup ended with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The query matched nothing; no viewer was started.
    NoMatch,
    /// A viewer was started for `key`.
    Opened {
        key: String,
        /// Whether the exact-key short-circuit was taken.
        exact: bool,
        target: Target,
        launched: Launched,
    },
}

/// Owns the configuration, the bibliography and the dispatch machinery.
///
/// # Example
///
/// ```no_run
/// # fn example() -> bibler::error::Result<()> {
/// use bibler::{Config, Session};
///
/// let session = Session::open(Config::default(), None)?;
/// let report = session.list();
/// println!("{} of {} entries have a link", report.linked_entries, report.total_entries);
/// # Ok(())
/// # }
/// ```
pub struct Session {
    config: Config,
    bibliography: Bibliography,
    classifier: LinkClassifier,
    dispatcher: Dispatcher,
}

impl Session {
    /// Load `file` (or the configured bibliography) and build a session.
    pub fn open(config: Config, file: Option<&Path>) -> Result<Self> {
        let path = file.unwrap_or(config.bibliography.as_path()).to_path_buf();
        let bibliography = parse::load(&path)?;
        let dispatcher = Dispatcher::new(&config);
        Self::with_parts(config, bibliography, dispatcher)
    }

    /// Build a session from an already loaded bibliography.
    pub fn with_parts(
        config: Config,
        bibliography: Bibliography,
        dispatcher: Dispatcher,
    ) -> Result<Self> {
        let classifier = LinkClassifier::new(config.probe_timeout())?;
        Ok(Self {
            config,
            bibliography,
            classifier,
            dispatcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bibliography(&self) -> &Bibliography {
        &self.bibliography
    }

    /// Search without resolving.
    pub fn search(&self, field: &SearchField, query: &str) -> SearchResult<'_> {
        self.bibliography.search(field, query)
    }

    /// Look up by citation key.
    ///
    /// A query equal to a key opens that entry directly, without prompting.
    /// On this path an entry without a link is an error; there is no
    /// fallback search.
    pub async fn lookup_key<P: Prompt + ?Sized>(
        &self,
        query: &str,
        prompt: &mut P,
    ) -> Result<Outcome> {
        if let Some(entry) = self.bibliography.exact(query) {
            tracing::debug!("Exact match for key '{}'", query);
            let link = exact_link(entry)?;
            let target = self.classifier.classify(link).await;
            return self.open_target(entry, true, target);
        }
        let results = self.bibliography.search_by_key(query);
        self.resolve_and_open(&results, prompt).await
    }

    /// Look up by any field. [`SearchField::Key`] defers to [`Session::lookup_key`].
    pub async fn lookup<P: Prompt + ?Sized>(
        &self,
        field: &SearchField,
        query: &str,
        prompt: &mut P,
    ) -> Result<Outcome> {
        match field {
            SearchField::Key => self.lookup_key(query, prompt).await,
            SearchField::Field(_) => {
                let results = self.bibliography.search(field, query);
                self.resolve_and_open(&results, prompt).await
            }
        }
    }

    /// Let the user pick one result and open it.
    ///
    /// A picked entry without a link opens a title search instead.
    pub async fn resolve_and_open<P: Prompt + ?Sized>(
        &self,
        results: &SearchResult<'_>,
        prompt: &mut P,
    ) -> Result<Outcome> {
        let entry = match resolve(results, prompt, self.config.max_selection_attempts)? {
            Resolution::NoMatch => return Ok(Outcome::NoMatch),
            Resolution::Selected(entry) => entry,
        };

        let target = match link_or_search(entry, &self.config.search_url)? {
            LinkChoice::Link(link) => self.classifier.classify(&link).await,
            LinkChoice::Search(url) => Target::Search { url },
        };
        self.open_target(entry, false, target)
    }

    /// Listing of every linked entry.
    pub fn list(&self) -> Report {
        list_all(&self.bibliography)
    }

    fn open_target(&self, entry: &Entry, exact: bool, target: Target) -> Result<Outcome> {
        let launched = self.dispatcher.dispatch(&target)?;
        Ok(Outcome::Opened {
            key: entry.key.clone(),
            exact,
            target,
            launched,
        })
    }
}
