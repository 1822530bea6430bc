use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the delete confirmation dialog as a centered popup.
pub fn render_delete(f: &mut Frame, prompt: &str, theme: &Theme) {
    let width = (prompt.chars().count().saturating_add(6)).clamp(40, 72) as u16;
    render_dialog(f, theme, " Confirm Delete ", prompt, "Enter/y", "delete", width);
}

/// Render the quit confirmation dialog as a centered popup.
pub fn render_quit(f: &mut Frame, theme: &Theme) {
    render_dialog(f, theme, " Confirm Quit ", "Quit text analyzer?", "q/y", "quit", 40);
}

fn render_dialog(
    f: &mut Frame,
    theme: &Theme,
    title: &str,
    prompt: &str,
    yes_key: &str,
    yes_label: &str,
    width: u16,
) {
    let popup = centered_rect(width, 6, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", prompt),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {}", yes_key),
                Style::default()
                    .fg(theme.danger)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(": {}   ", yes_label), Style::default().fg(theme.dim)),
            Span::styled(
                "Esc/n",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": cancel", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.danger))
            .title(title.to_string()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
