use std::time::Instant;

use super::{App, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Tick and resize are handled regardless of modals
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                // The attempt's terminal phase lasts as long as its notice
                if self.controller.expire_notice(Instant::now()) {
                    self.controller.reset();
                }
                self.pump_pending();
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(10);
                return false;
            }
            _ => {}
        }

        // Delete confirmation modal: Enter/y confirms, Esc/n cancels
        if self.delete.is_pending() {
            match action {
                Action::DrillIn | Action::ConfirmYes => {
                    if let Some(record) = self.delete.confirm(&mut self.catalog) {
                        tracing::debug!(filename = %record.filename, "file deleted");
                    }
                }
                Action::NavigateBack | Action::ConfirmNo => self.delete.cancel(),
                _ => {}
            }
            return false;
        }

        // Quit confirmation modal: q/y confirms, Esc/n cancels
        if self.confirm_quit {
            match action {
                Action::Quit | Action::ConfirmYes => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack | Action::ConfirmNo => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        if self.screen == Screen::FilePicker {
            self.handle_file_picker_action(action);
            return false;
        }

        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::SwitchScreen => {
                self.screen = match self.screen {
                    Screen::Imports => Screen::Dashboard,
                    _ => Screen::Imports,
                };
            }
            Action::MoveDown => {
                self.catalog.select_next();
            }
            Action::MoveUp => {
                self.catalog.select_prev();
            }
            Action::GoTop => {
                if let Some(first) = self.catalog.nth(0).map(str::to_string) {
                    let _ = self.catalog.select(&first);
                }
            }
            Action::GoBottom => {
                let last = self.catalog.len().checked_sub(1);
                if let Some(name) = last.and_then(|i| self.catalog.nth(i)).map(str::to_string) {
                    let _ = self.catalog.select(&name);
                }
            }
            Action::DrillIn => {
                if self.screen == Screen::Imports && self.catalog.selected().is_some() {
                    self.screen = Screen::Dashboard;
                }
            }
            Action::NavigateBack => match self.screen {
                Screen::Dashboard => self.screen = Screen::Imports,
                _ => self.catalog.clear_selection(),
            },
            Action::OpenFile => {
                if self.can_import() {
                    self.file_picker.refresh_entries();
                    self.screen = Screen::FilePicker;
                } else {
                    tracing::debug!("file picker disabled while analyzing");
                }
            }
            Action::Delete => {
                if let Some(filename) = self.catalog.selected().map(str::to_string) {
                    self.delete.request(&filename, &self.catalog);
                }
            }
            Action::DismissNotice => {
                self.controller.dismiss_notice();
                self.controller.reset();
            }
            _ => {}
        }
        false
    }
}
