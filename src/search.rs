//! Substring search over a loaded bibliography.
//!
//! Every mode scans the full table; no index is built. Matching is
//! case-insensitive containment and results come back in ascending key order.

use crate::types::{Bibliography, Entry, SearchField, SearchResult};

impl Bibliography {
    /// Search with an explicit [`SearchField`].
    pub fn search(&self, field: &SearchField, query: &str) -> SearchResult<'_> {
        let needle = query.to_lowercase();
        let entries: Vec<&Entry> = self
            .iter()
            .filter(|entry| {
                let haystack = match field {
                    SearchField::Key => Some(entry.key.as_str()),
                    SearchField::Field(name) => entry.get(name),
                };
                // Entries lacking the field are skipped rather than treated as an error.
                haystack.is_some_and(|h| contains_ignore_case(h, &needle))
            })
            .collect();

        tracing::debug!(
            "Search {} for '{}': {} match(es)",
            field,
            query,
            entries.len()
        );

        SearchResult {
            field: field.clone(),
            query: query.to_string(),
            entries,
        }
    }

    /// Entries whose citation key contains `query`.
    pub fn search_by_key(&self, query: &str) -> SearchResult<'_> {
        self.search(&SearchField::Key, query)
    }

    /// Entries whose `field` value contains `query`.
    pub fn search_by_field(&self, field: &str, query: &str) -> SearchResult<'_> {
        self.search(&SearchField::Field(field.to_lowercase()), query)
    }

    pub fn search_by_author(&self, query: &str) -> SearchResult<'_> {
        self.search(&SearchField::author(), query)
    }

    pub fn search_by_title(&self, query: &str) -> SearchResult<'_> {
        self.search(&SearchField::title(), query)
    }

    /// Exact, case-sensitive key match used to short-circuit disambiguation.
    pub fn exact(&self, key: &str) -> Option<&Entry> {
        self.get(key)
    }
}

/// `needle` must already be lower-cased.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
