//! Listing of all linked entries with file metadata and totals.
//!
//! Links are never probed here; only local file metadata is read.

use crate::config::expand_tilde;
use crate::types::Bibliography;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

/// Timestamp format used in listings.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata of a linked local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub modified: DateTime<Local>,
    pub size: u64,
}

impl FileInfo {
    pub fn modified_display(&self) -> String {
        self.modified.format(TIME_FORMAT).to_string()
    }

    pub fn size_display(&self) -> String {
        format_size(self.size)
    }
}

/// One entry with a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub key: String,
    pub link: String,
    /// Present when the link is a readable local file.
    pub file: Option<FileInfo>,
}

/// Listing of a whole bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub total_entries: usize,
    pub linked_entries: usize,
    /// Keys of entries without a link.
    pub omitted: Vec<String>,
    /// Sum of the sizes of all linked local files.
    pub total_bytes: u64,
}

impl Report {
    pub fn total_size_display(&self) -> String {
        format_size(self.total_bytes)
    }

    pub fn local_files(&self) -> usize {
        self.rows.iter().filter(|r| r.file.is_some()).count()
    }
}

/// Build the listing for every entry, in key order.
pub fn list_all(bib: &Bibliography) -> Report {
    let mut rows = Vec::new();
    let mut omitted = Vec::new();
    let mut total_bytes = 0u64;

    for entry in bib.iter() {
        let Some(link) = entry.link() else {
            omitted.push(entry.key.clone());
            continue;
        };
        let file = file_info(Path::new(link));
        if let Some(info) = &file {
            total_bytes += info.size;
        }
        rows.push(ReportRow {
            key: entry.key.clone(),
            link: link.to_string(),
            file,
        });
    }

    tracing::debug!(
        "Listed {} linked entries, {} without link",
        rows.len(),
        omitted.len()
    );

    Report {
        linked_entries: rows.len(),
        total_entries: bib.len(),
        rows,
        omitted,
        total_bytes,
    }
}

fn file_info(link: &Path) -> Option<FileInfo> {
    let path = expand_tilde(link);
    let meta = std::fs::metadata(&path).ok().filter(|m| m.is_file())?;
    let modified = match meta.modified() {
        Ok(time) => DateTime::<Local>::from(time),
        Err(e) => {
            tracing::debug!("No modification time for {}: {}", path.display(), e);
            return None;
        }
    };
    Some(FileInfo {
        modified,
        size: meta.len(),
    })
}

/// Human-readable size with binary prefixes, one decimal place.
///
/// `1023 -> "1023.0B"`, `1024 -> "1.0KiB"`; anything at or beyond 1024^8
/// is expressed in `Yi`.
pub fn format_size(bytes: u64) -> String {
    format_scaled(bytes as f64)
}

fn format_scaled(mut num: f64) -> String {
    const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{:3.1}{}B", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}YiB", num)
}
