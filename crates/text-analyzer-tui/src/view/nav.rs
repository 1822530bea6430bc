use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Screen};

/// Render the navigation bar and footer, returning the body area between them.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) -> Rect {
    let theme = &app.theme;
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    let tab = |label: &'static str, screen: Screen| {
        if app.screen == screen {
            Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(theme.dim))
        }
    };

    let nav = Line::from(vec![
        Span::styled(" TEXT ANALYZER ", theme.header_style()),
        Span::raw(" "),
        tab("DASHBOARD", Screen::Dashboard),
        tab("IMPORTS", Screen::Imports),
    ]);
    f.render_widget(Paragraph::new(nav), chunks[0]);

    let hints = match app.screen {
        Screen::Imports => " o:open  j/k:select  Enter:view  d:delete  Tab:dashboard  x:dismiss  q:quit",
        Screen::Dashboard => " j/k:select  Esc:back  d:delete  Tab:imports  q:quit",
        Screen::FilePicker => "",
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, theme.footer_style()))),
        chunks[2],
    );

    chunks[1]
}
