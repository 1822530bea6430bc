mod backend;
mod update;
mod update_file_picker;


use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use text_analyzer_core::{
    Catalog, DeleteConfirmation, ImportController, ImportError, IncomingFile, Notice,
};

use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Imports,
    FilePicker,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_txt: bool,
}

impl FilePickerState {
    pub fn new(current_dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_txt: false,
            });
        }

        match std::fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                let mut dirs = Vec::new();
                let mut files = Vec::new();

                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();

                    // Skip hidden files/dirs
                    if name.starts_with('.') {
                        continue;
                    }

                    if path.is_dir() {
                        dirs.push(FileEntry {
                            name,
                            path,
                            is_dir: true,
                            is_txt: false,
                        });
                    } else {
                        let is_txt = text_analyzer_core::import::validate::is_plain_text(&name, None);
                        files.push(FileEntry {
                            name,
                            path,
                            is_dir: false,
                            is_txt,
                        });
                    }
                }

                dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

                entries.extend(dirs);
                entries.extend(files);
            }
            Err(e) => {
                tracing::warn!(dir = %self.current_dir.display(), error = %e, "cannot list directory");
            }
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub catalog: Catalog,
    pub controller: ImportController,
    pub delete: DeleteConfirmation,
    pub file_picker: FilePickerState,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    /// Height of the visible list area (set on resize).
    pub visible_rows: usize,
    /// Files named on the command line, offered to the controller one at a
    /// time as each import settles.
    pub pending_paths: VecDeque<PathBuf>,
    /// Channel for spawned analysis results.
    pub event_tx: Option<mpsc::UnboundedSender<BackendEvent>>,
}

impl App {
    pub fn new(controller: ImportController, theme: Theme) -> Self {
        let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            screen: Screen::Imports,
            catalog: Catalog::new(),
            controller,
            delete: DeleteConfirmation::new(),
            file_picker: FilePickerState::new(start_dir),
            theme,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            visible_rows: 20,
            pending_paths: VecDeque::new(),
            event_tx: None,
        }
    }

    /// Whether the import target accepts a new file right now.
    pub fn can_import(&self) -> bool {
        !self.controller.is_busy()
    }

    /// Read `path` and hand it to the controller for a background analysis.
    pub fn start_import(&mut self, path: &Path) {
        let file = match IncomingFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read file");
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.controller
                    .notify(Notice::danger(format!("Could not read {}.", name)));
                return;
            }
        };

        let Some(tx) = self.event_tx.clone() else {
            tracing::error!("no event channel; import dropped");
            return;
        };

        match self.controller.spawn(file, &mut self.catalog, tx) {
            Ok(id) => tracing::debug!(request_id = id, "import started"),
            // Validation failures already raised a notice
            Err(ImportError::Validation(_)) => {}
            Err(ImportError::Busy { in_flight }) => {
                self.controller.notify(Notice::warning(format!(
                    "Still analyzing {}. Try again when it finishes.",
                    in_flight
                )));
            }
        }
    }

    /// Offer the next command-line file once the controller is free.
    pub fn pump_pending(&mut self) {
        if !self.can_import() {
            return;
        }
        if let Some(path) = self.pending_paths.pop_front() {
            self.start_import(&path);
        }
    }

    /// Release the in-flight slot before the UI goes away.
    pub fn shutdown(&mut self) {
        self.controller.abandon(&mut self.catalog);
    }

    pub fn view(&self, f: &mut ratatui::Frame) {
        let area = f.area();

        if self.screen == Screen::FilePicker {
            crate::view::file_picker::render_in(f, self, area);
        } else {
            let body = crate::view::nav::render_in(f, self, area);
            match self.screen {
                Screen::Imports => crate::view::imports::render_in(f, self, body),
                Screen::Dashboard => crate::view::dashboard::render_in(f, self, body),
                Screen::FilePicker => {}
            }
        }

        if let Some(notice) = self.controller.notice() {
            crate::view::toast::render(f, notice, &self.theme);
        }
        if let Some(prompt) = self.delete.prompt() {
            crate::view::confirm::render_delete(f, &prompt, &self.theme);
        } else if self.confirm_quit {
            crate::view::confirm::render_quit(f, &self.theme);
        }
    }
}
