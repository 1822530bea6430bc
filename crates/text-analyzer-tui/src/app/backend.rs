use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::AnalysisFinished(finished) => {
                let filename = self.controller.in_flight_filename().map(str::to_string);
                let ok = finished.result.is_ok();
                let applied = self
                    .controller
                    .complete(finished.id, finished.result, &mut self.catalog)
                    .is_some();

                // Point the selection at a freshly analyzed file
                if applied
                    && ok
                    && let Some(filename) = filename
                    && self.catalog.select(&filename).is_err()
                {
                    tracing::warn!(filename = %filename, "analyzed file missing from catalog");
                }
            }
        }
    }
}
