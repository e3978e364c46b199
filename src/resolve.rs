//! Disambiguation of search results and link resolution for a chosen entry.

use crate::error::{BiblerError, Result};
use crate::types::{Entry, Resolution, SearchResult, LINK_FIELD, TITLE_FIELD};

/// Source of interactive selections.
pub trait Prompt {
    /// Show the candidate lines and read the raw reply.
    fn read_selection(&mut self, candidates: &[String]) -> Result<String>;

    /// Report a rejected reply before the next attempt.
    fn report_invalid(&mut self, _error: &BiblerError) {}
}

/// Terminal prompt backed by `dialoguer`.
#[cfg(feature = "cli")]
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    shown: bool,
}

#[cfg(feature = "cli")]
impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "cli")]
impl Prompt for TerminalPrompt {
    fn read_selection(&mut self, candidates: &[String]) -> Result<String> {
        // The list is printed once; re-prompts only repeat the question.
        if !self.shown {
            for line in candidates {
                println!("{}", line);
            }
            println!();
            self.shown = true;
        }
        dialoguer::Input::<String>::new()
            .with_prompt("Choose item")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| BiblerError::Prompt(e.to_string()))
    }

    fn report_invalid(&mut self, error: &BiblerError) {
        eprintln!("{}", error);
    }
}

/// Parse a zero-based selection among `count` candidates.
pub fn parse_selection(input: &str, count: usize) -> Result<usize> {
    let trimmed = input.trim();
    let index: usize = trimmed
        .parse()
        .map_err(|_| BiblerError::InvalidSelection {
            input: trimmed.to_string(),
            reason: "not a number".to_string(),
        })?;
    if index >= count {
        return Err(BiblerError::InvalidSelection {
            input: trimmed.to_string(),
            reason: format!("choose between 0 and {}", count.saturating_sub(1)),
        });
    }
    Ok(index)
}

/// Render search hits as numbered candidate lines.
pub fn format_candidates(results: &SearchResult<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len() * 3);
    for (idx, entry) in results.entries.iter().enumerate() {
        lines.push(format!("({}) {{{}}}:", idx, entry.key));
        lines.push(format!(
            "\t{}, [{}]",
            entry.title().unwrap_or("-"),
            entry.author().unwrap_or("-")
        ));
        if let Some(link) = entry.link() {
            lines.push(format!("\tlink:  {}", link));
        }
    }
    lines
}

/// Pick one entry out of a search result.
///
/// Any non-empty result is presented for selection, even a single hit.
/// Invalid replies are reported and re-prompted up to `max_attempts` times;
/// the last error is returned once attempts run out.
pub fn resolve<'a, P: Prompt + ?Sized>(
    results: &SearchResult<'a>,
    prompt: &mut P,
    max_attempts: u32,
) -> Result<Resolution<'a>> {
    if results.is_empty() {
        return Ok(Resolution::NoMatch);
    }

    let candidates = format_candidates(results);
    let mut attempts = 0;
    loop {
        attempts += 1;
        let reply = prompt.read_selection(&candidates)?;
        match parse_selection(&reply, results.len()) {
            Ok(index) => return Ok(Resolution::Selected(results.entries[index])),
            Err(e) if attempts < max_attempts => {
                tracing::debug!("Attempt {} of {}: {}", attempts, max_attempts, e);
                prompt.report_invalid(&e);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Link of an entry found by the exact-key short-circuit.
///
/// Unlike [`link_or_search`], a missing link is an error here.
pub fn exact_link(entry: &Entry) -> Result<&str> {
    entry.link().ok_or_else(|| BiblerError::MissingField {
        key: entry.key.clone(),
        field: LINK_FIELD.to_string(),
    })
}

/// What to open for an interactively selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkChoice {
    /// The entry's own link, still to be classified.
    Link(String),
    /// A synthesized title search.
    Search(String),
}

/// Link of a selected entry, or a title search on `search_url` when absent.
pub fn link_or_search(entry: &Entry, search_url: &str) -> Result<LinkChoice> {
    if let Some(link) = entry.link() {
        return Ok(LinkChoice::Link(link.to_string()));
    }
    let title = entry.title().ok_or_else(|| BiblerError::MissingField {
        key: entry.key.clone(),
        field: TITLE_FIELD.to_string(),
    })?;
    Ok(LinkChoice::Search(search_url_for(search_url, title)?))
}

/// Build `<base>?q="<title>"` with the query form-encoded.
pub fn search_url_for(base: &str, title: &str) -> Result<String> {
    let quoted = format!("\"{}\"", title);
    let url = url::Url::parse_with_params(base, &[("q", quoted.as_str())])
        .map_err(|e| BiblerError::Config(format!("invalid search_url '{}': {}", base, e)))?;
    Ok(url.to_string())
}
