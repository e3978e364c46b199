//! Public types for bibler.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Field holding the path or URL of the document for an entry.
pub const LINK_FIELD: &str = "link";
/// Field searched by `--title`.
pub const TITLE_FIELD: &str = "title";
/// Field searched by `--author`.
pub const AUTHOR_FIELD: &str = "author";

/// A single bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Citation key, unique within a bibliography.
    pub key: String,
    /// Field values keyed by lower-cased field name.
    pub fields: BTreeMap<String, String>,
}

impl Entry {
    /// Create an entry with no fields.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter, mostly for tests and programmatic use.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }

    /// Look up a field by name (case-insensitive).
    pub fn get(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(v) => Some(v.as_str()),
            None => self.fields.get(&field.to_lowercase()).map(|v| v.as_str()),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.get(TITLE_FIELD)
    }

    pub fn author(&self) -> Option<&str> {
        self.get(AUTHOR_FIELD)
    }

    pub fn link(&self) -> Option<&str> {
        self.get(LINK_FIELD)
    }
}

/// All entries of a loaded bibliography, keyed by citation key.
///
/// Backed by a `BTreeMap`, so iteration is always in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    entries: BTreeMap<String, Entry>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the entry previously stored under its key.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    /// Exact, case-sensitive key lookup.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for Bibliography {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut bib = Bibliography::new();
        for entry in iter {
            bib.insert(entry);
        }
        bib
    }
}

/// What a search matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchField {
    /// The citation key.
    Key,
    /// A named entry field.
    Field(String),
}

impl SearchField {
    pub fn author() -> Self {
        Self::Field(AUTHOR_FIELD.to_string())
    }

    pub fn title() -> Self {
        Self::Field(TITLE_FIELD.to_string())
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key => write!(f, "bibtex key"),
            Self::Field(name) => write!(f, "{}", name),
        }
    }
}

/// Entries matching one query, in ascending key order.
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    pub field: SearchField,
    pub query: String,
    pub entries: Vec<&'a Entry>,
}

impl<'a> SearchResult<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}

/// Outcome of disambiguating a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The search matched nothing.
    NoMatch,
    /// The user picked (or the exact-key lookup found) this entry.
    Selected(&'a Entry),
}

/// A classified link, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// An existing local file, opened in the document viewer.
    Local { path: PathBuf },
    /// A URL that answered the probe with a success status.
    Remote { url: String },
    /// A synthesized web search for an entry without a link.
    Search { url: String },
    /// Neither a local file nor a reachable URL.
    Invalid { link: String, reason: String },
}

impl Target {
    /// The path or URL handed to the viewer.
    pub fn location(&self) -> String {
        match self {
            Self::Local { path } => path.display().to_string(),
            Self::Remote { url } | Self::Search { url } => url.clone(),
            Self::Invalid { link, .. } => link.clone(),
        }
    }
}

/// Which configured viewer handles a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerKind {
    Document,
    Web,
}

impl std::fmt::Display for ViewerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => write!(f, "document viewer"),
            Self::Web => write!(f, "web viewer"),
        }
    }
}

/// Record of a viewer process that was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Launched {
    pub viewer: ViewerKind,
    pub program: String,
    pub args: Vec<String>,
}
