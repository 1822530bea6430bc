use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use text_analyzer_core::{Notice, Severity};

use crate::theme::Theme;

const TOAST_WIDTH: u16 = 48;

/// Render a notice as a toast anchored to the bottom-right corner.
pub fn render(f: &mut Frame, notice: &Notice, theme: &Theme) {
    let area = f.area();
    let width = TOAST_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let text_rows = notice.message.chars().count().div_ceil(inner_width).max(1) as u16;
    let height = (text_rows + 2).min(area.height);

    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    };

    let color = theme.severity_color(notice.severity);
    let title = match notice.severity {
        Severity::Success => " Success ",
        Severity::Info => " Info ",
        Severity::Warning => " Warning ",
        Severity::Danger => " Error ",
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        notice.message.as_str(),
        Style::default().fg(theme.text),
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
