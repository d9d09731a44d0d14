//! Entry store
//!
//! Entries are the ordered candidate strings shown on the wheel. Duplicates
//! are allowed and each occupies its own segment.

use crate::consts::{ENTRY_FILE_MAX_BYTES, LARGE_DATASET_WARNING};
use crate::error::ValidationError;

/// Split raw text into entries: one per line, trimmed, blank lines dropped.
///
/// Fully blank input yields an empty list; callers treat that as
/// [`ValidationError::NoValidEntries`].
pub fn parse_entries(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Entries with every value that has already won removed, order preserved.
///
/// Exclusion is by value: if "Bob" appears twice and one "Bob" wins, both go.
pub fn exclude(entries: &[String], winners: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !winners.contains(entry))
        .cloned()
        .collect()
}

/// Number of distinct values in an entry list
pub fn distinct_count(entries: &[String]) -> usize {
    let mut seen: Vec<&str> = entries.iter().map(String::as_str).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Non-blocking notices raised while importing entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportWarning {
    /// More entries than the wheel comfortably handles
    LargeDataset { count: usize },
}

/// A validated bulk replacement of the entry list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryImport {
    pub entries: Vec<String>,
    pub warnings: Vec<ImportWarning>,
}

impl EntryImport {
    /// Replace the entry list from pasted text
    pub fn from_text(raw: &str) -> Result<Self, ValidationError> {
        let entries = parse_entries(raw);
        if entries.is_empty() {
            return Err(ValidationError::NoValidEntries);
        }

        let mut warnings = Vec::new();
        if entries.len() > LARGE_DATASET_WARNING {
            log::warn!(
                "Large dataset detected: {} entries, performance may be affected",
                entries.len()
            );
            warnings.push(ImportWarning::LargeDataset {
                count: entries.len(),
            });
        }

        log::info!("Imported {} entries", entries.len());
        Ok(Self { entries, warnings })
    }

    /// Replace the entry list from an uploaded text file
    pub fn from_file(contents: &str, size: u64) -> Result<Self, ValidationError> {
        if size > ENTRY_FILE_MAX_BYTES {
            return Err(ValidationError::EntryFileTooLarge {
                size,
                limit: ENTRY_FILE_MAX_BYTES,
            });
        }
        Self::from_text(contents)
    }
}
