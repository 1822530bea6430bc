use super::{App, Screen};
use crate::action::Action;

impl App {
    /// Handle input while on the file picker screen.
    pub(super) fn handle_file_picker_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::NavigateBack => {
                self.screen = Screen::Imports;
            }
            Action::MoveDown => {
                let max = self.file_picker.entries.len().saturating_sub(1);
                if self.file_picker.cursor < max {
                    self.file_picker.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(1);
            }
            Action::GoTop => {
                self.file_picker.cursor = 0;
            }
            Action::GoBottom => {
                self.file_picker.cursor = self.file_picker.entries.len().saturating_sub(1);
            }
            Action::DrillIn => {
                // Enter on a directory opens it; on a file, imports it
                if self.file_picker.enter_directory() {
                    return;
                }
                let Some(path) = self.file_picker.current_entry().map(|e| e.path.clone()) else {
                    return;
                };
                self.screen = Screen::Imports;
                self.start_import(&path);
            }
            _ => {}
        }
    }
}
