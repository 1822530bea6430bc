//! In-memory catalog of imported files.
//!
//! The catalog is the sole owner of the file records and of the current
//! selection. Every mutation keeps the selection pointing at an existing
//! record (or at nothing).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::analyzer::AnalysisOutcome;

/// Lifecycle status of a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Pending,
    Ready,
    Failed,
}

impl RecordStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Analyzing...",
            Self::Ready => "Ready",
            Self::Failed => "Failed",
        }
    }
}

/// Analysis attached to a record once the analysis call resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordAnalysis {
    Completed(AnalysisOutcome),
    Failed { reason: String },
}

/// One imported file with its content and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub filename: String,
    pub content: String,
    pub size_bytes: u64,
    pub imported_at: DateTime<Utc>,
    pub status: RecordStatus,
    pub analysis: Option<RecordAnalysis>,
}

impl FileRecord {
    /// A freshly accepted import, waiting for its analysis.
    pub fn pending(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            filename: filename.into(),
            size_bytes: content.len() as u64,
            content,
            imported_at: Utc::now(),
            status: RecordStatus::Pending,
            analysis: None,
        }
    }

    /// A record whose analysis succeeded.
    pub fn ready(
        filename: impl Into<String>,
        content: impl Into<String>,
        outcome: AnalysisOutcome,
    ) -> Self {
        Self {
            status: RecordStatus::Ready,
            analysis: Some(RecordAnalysis::Completed(outcome)),
            ..Self::pending(filename, content)
        }
    }

    /// A record whose analysis failed.
    pub fn failed(
        filename: impl Into<String>,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            status: RecordStatus::Failed,
            analysis: Some(RecordAnalysis::Failed {
                reason: reason.into(),
            }),
            ..Self::pending(filename, content)
        }
    }

    /// The successful outcome, if any.
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match &self.analysis {
            Some(RecordAnalysis::Completed(outcome)) => Some(outcome),
            _ => None,
        }
    }

    /// Lowercased extension, used for the file-type label.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no file named {0:?} in the catalog")]
    UnknownFile(String),
}

/// Mapping of filename to record plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    files: BTreeMap<String, FileRecord>,
    selected: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or unconditionally replace the record at `filename`.
    pub fn upsert(&mut self, filename: impl Into<String>, record: FileRecord) {
        let filename = filename.into();
        let replaced = self.files.insert(filename.clone(), record).is_some();
        tracing::debug!(filename = %filename, replaced, "catalog upsert");
    }

    /// Delete the record at `filename`, clearing the selection if it pointed there.
    ///
    /// Removing an absent file is a no-op.
    pub fn remove(&mut self, filename: &str) -> Option<FileRecord> {
        let removed = self.files.remove(filename);
        if removed.is_some() && self.selected.as_deref() == Some(filename) {
            self.selected = None;
        }
        tracing::debug!(filename, existed = removed.is_some(), "catalog remove");
        removed
    }

    /// Mark `filename` as the selected file. Fails if it isn't in the catalog.
    pub fn select(&mut self, filename: &str) -> Result<(), CatalogError> {
        if !self.files.contains_key(filename) {
            tracing::warn!(filename, "rejected selection of unknown file");
            return Err(CatalogError::UnknownFile(filename.to_string()));
        }
        self.selected = Some(filename.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Filenames in ascending lexicographic order, independent of insertion order.
    pub fn list_sorted(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Records in the same order as [`list_sorted`](Self::list_sorted).
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    pub fn get(&self, filename: &str) -> Option<&FileRecord> {
        self.files.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_record(&self) -> Option<&FileRecord> {
        self.selected.as_deref().and_then(|f| self.files.get(f))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Filename at sorted position `index`.
    pub fn nth(&self, index: usize) -> Option<&str> {
        self.files.keys().nth(index).map(String::as_str)
    }

    /// Sorted position of `filename`.
    pub fn position(&self, filename: &str) -> Option<usize> {
        self.files.keys().position(|k| k == filename)
    }

    /// Move the selection to the next file in sorted order, wrapping around.
    /// With nothing selected, selects the first file.
    pub fn select_next(&mut self) -> Option<&str> {
        let len = self.files.len();
        if len == 0 {
            return None;
        }
        let next = match self.selected.as_deref().and_then(|f| self.position(f)) {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.selected = self.nth(next).map(String::from);
        self.selected()
    }

    /// Move the selection to the previous file in sorted order, wrapping around.
    /// With nothing selected, selects the last file.
    pub fn select_prev(&mut self) -> Option<&str> {
        let len = self.files.len();
        if len == 0 {
            return None;
        }
        let prev = match self.selected.as_deref().and_then(|f| self.position(f)) {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.selected = self.nth(prev).map(String::from);
        self.selected()
    }
}
