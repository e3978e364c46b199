//! BibTeX loading.
//!
//! Tokenizing is delegated to `biblatex`'s raw parser; field text is kept as
//! written (braces, dashes and math included) and only `@string`
//! abbreviations and `#` concatenation are evaluated.

use crate::error::{BiblerError, Result};
use crate::types::{Bibliography, Entry};
use biblatex::{RawBibliography, RawChunk, Spanned};
use std::collections::HashMap;
use std::path::Path;

/// Load a bibliography from a `.bib` file.
///
/// Fails with [`BiblerError::NotFound`] when `path` is not an existing regular
/// file and with [`BiblerError::Parse`] when the content is malformed.
pub fn load(path: &Path) -> Result<Bibliography> {
    if !path.is_file() {
        return Err(BiblerError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let bib = parse_bibliography(&content)?;
    tracing::debug!("Loaded {} entries from {}", bib.len(), path.display());
    Ok(bib)
}

/// Parse `.bib` content from a string.
///
/// Duplicate citation keys are rejected.
pub fn parse_bibliography(content: &str) -> Result<Bibliography> {
    let raw = RawBibliography::parse(content).map_err(|e| BiblerError::Parse(e.to_string()))?;

    // Definitions may refer to earlier ones, so resolve in file order.
    let mut strings: HashMap<String, String> = HashMap::new();
    for pair in &raw.abbreviations {
        let value = field_text(&pair.value.v, &strings);
        strings.insert(pair.key.v.to_lowercase(), value);
    }

    let mut bib = Bibliography::new();
    for entry in &raw.entries {
        let key = entry.v.key.v;
        let mut flat = Entry::new(key);
        for pair in &entry.v.fields {
            flat.fields
                .insert(pair.key.v.to_lowercase(), field_text(&pair.value.v, &strings));
        }
        if bib.insert(flat).is_some() {
            return Err(BiblerError::Parse(format!("duplicate key '{}'", key)));
        }
    }
    Ok(bib)
}

/// Join the chunks of one field value. Unknown abbreviations keep their name.
fn field_text(chunks: &[Spanned<RawChunk<'_>>], strings: &HashMap<String, String>) -> String {
    let mut out = String::new();
    for chunk in chunks {
        match chunk.v {
            RawChunk::Normal(text) => out.push_str(text),
            RawChunk::Abbreviation(name) => match strings.get(&name.to_lowercase()) {
                Some(value) => out.push_str(value),
                None => {
                    tracing::debug!("Undefined @string '{}'", name);
                    out.push_str(name);
                }
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
@article{doe2020,
  title = {Foo},
  author = {Doe, J.},
  link = {/tmp/doe2020.pdf},
  year = {2020}
}

@inproceedings{smith2019graphs,
  title = {Graphs and $x^2$ Things},
  author = {Smith, Alice and Jones, Bob}
}
"#;

    #[test]
    fn test_parse_bibliography() {
        let bib = parse_bibliography(SAMPLE).unwrap();
        assert_eq!(bib.len(), 2);

        let doe = bib.get("doe2020").unwrap();
        assert_eq!(doe.title(), Some("Foo"));
        assert_eq!(doe.author(), Some("Doe, J."));
        assert_eq!(doe.link(), Some("/tmp/doe2020.pdf"));
        assert_eq!(doe.get("year"), Some("2020"));

        let smith = bib.get("smith2019graphs").unwrap();
        assert_eq!(smith.link(), None);
        assert!(smith.title().unwrap().contains("$x^2$"));
    }

    #[test]
    fn test_parse_empty_content() {
        let bib = parse_bibliography("").unwrap();
        assert!(bib.is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_bibliography("@article{broken, title = {Unclosed").unwrap_err();
        assert!(matches!(err, BiblerError::Parse(_)));
    }

    #[test]
    fn test_parse_keeps_link_text_as_written() {
        let bib = parse_bibliography(
            "@misc{a, title = {{The} {GPU} --- Story}, link = {~/papers/smith--2019_x.pdf}}",
        )
        .unwrap();
        let a = bib.get("a").unwrap();
        assert_eq!(a.link(), Some("~/papers/smith--2019_x.pdf"));
        assert_eq!(a.title(), Some("{The} {GPU} --- Story"));
    }

    #[test]
    fn test_parse_resolves_string_abbreviations() {
        let bib = parse_bibliography(
            r#"
@string{papers = "/home/doe/papers"}
@string{jml = {Journal of Machine Learning}}
@article{doe2020,
  journal = jml,
  link = papers # "/doe--2020.pdf",
  month = jan
}
"#,
        )
        .unwrap();
        let doe = bib.get("doe2020").unwrap();
        assert_eq!(doe.get("journal"), Some("Journal of Machine Learning"));
        assert_eq!(doe.link(), Some("/home/doe/papers/doe--2020.pdf"));
        assert_eq!(doe.get("month"), Some("jan"));
    }

    #[test]
    fn test_parse_duplicate_key() {
        let err = parse_bibliography("@misc{a, title = {One}}\n@misc{a, title = {Two}}\n")
            .unwrap_err();
        assert!(matches!(err, BiblerError::Parse(ref msg) if msg.contains("duplicate key 'a'")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bib");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, BiblerError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, BiblerError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let bib = load(file.path()).unwrap();
        assert!(bib.contains_key("doe2020"));
        assert!(bib.contains_key("smith2019graphs"));
    }
}
