use text_analyzer_core::AnalysisFinished;

/// Events flowing from background tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A spawned analysis call returned.
    AnalysisFinished(AnalysisFinished),
}

impl From<AnalysisFinished> for BackendEvent {
    fn from(finished: AnalysisFinished) -> Self {
        Self::AnalysisFinished(finished)
    }
}
