use ratatui::style::{Color, Modifier, Style};

use text_analyzer_core::{OutcomeKind, RecordStatus, Severity};

/// Color theme for the TUI.
pub struct Theme {
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub danger: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Default dark theme.
    pub fn dark() -> Self {
        Self {
            success: Color::Rgb(40, 200, 100),
            info: Color::Rgb(60, 160, 255),
            warning: Color::Rgb(255, 190, 0),
            danger: Color::Rgb(255, 80, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(35, 45, 75),
            border: Color::Rgb(70, 70, 90),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(35, 45, 80),
            active: Color::Rgb(60, 160, 255),
            spinner: Color::Rgb(60, 160, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Light theme for bright terminal backgrounds.
    pub fn light() -> Self {
        Self {
            success: Color::Rgb(0, 130, 60),
            info: Color::Rgb(0, 90, 200),
            warning: Color::Rgb(170, 110, 0),
            danger: Color::Rgb(190, 30, 30),

            header_fg: Color::White,
            header_bg: Color::Rgb(0, 90, 200),
            border: Color::Gray,
            text: Color::Black,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(210, 225, 250),
            active: Color::Rgb(0, 90, 200),
            spinner: Color::Rgb(0, 90, 200),
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Look up a theme by name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Danger => self.danger,
        }
    }

    pub fn status_color(&self, status: RecordStatus) -> Color {
        match status {
            RecordStatus::Pending => self.spinner,
            RecordStatus::Ready => self.success,
            RecordStatus::Failed => self.danger,
        }
    }

    pub fn outcome_color(&self, kind: OutcomeKind) -> Color {
        match kind {
            OutcomeKind::Info => self.info,
            OutcomeKind::Warning => self.warning,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
