use crate::catalog::{Catalog, FileRecord};

/// Two-step deletion: a request only records which file is pending, and the
/// catalog is mutated on an explicit confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pending: Option<String>,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to delete `filename`. Unknown files are ignored.
    ///
    /// Returns whether a confirmation is now pending.
    pub fn request(&mut self, filename: &str, catalog: &Catalog) -> bool {
        if catalog.contains(filename) {
            self.pending = Some(filename.to_string());
        }
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Dialog body for the pending deletion.
    pub fn prompt(&self) -> Option<String> {
        self.pending
            .as_ref()
            .map(|f| format!("Are you sure you want to delete {}?", f))
    }

    /// Drop the pending request without touching the catalog.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Remove the pending file from the catalog.
    pub fn confirm(&mut self, catalog: &mut Catalog) -> Option<FileRecord> {
        let filename = self.pending.take()?;
        tracing::info!(filename = %filename, "deleting file");
        catalog.remove(&filename)
    }
}
