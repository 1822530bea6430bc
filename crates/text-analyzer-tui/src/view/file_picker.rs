use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;

/// Render the file picker screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let picker = &app.file_picker;

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // current dir
        Constraint::Min(5),    // file list
        Constraint::Length(1), // footer
    ])
    .split(area);

    let header = Line::from(vec![
        Span::styled(" Files ", theme.header_style()),
        Span::styled(
            " > Select a text file (.txt)",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let dir_line = Line::from(vec![
        Span::styled(" \u{1F4C1} ", Style::default().fg(theme.active)),
        Span::styled(
            picker.current_dir.display().to_string(),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(dir_line), chunks[1]);

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .map(|entry| {
            let (icon, style) = if entry.is_dir {
                ("\u{1F4C1} ", Style::default().fg(theme.active))
            } else if entry.is_txt {
                ("\u{1F4C4} ", Style::default().fg(theme.text))
            } else {
                ("  ", Style::default().fg(theme.dim))
            };
            ListItem::new(Line::from(vec![
                Span::styled(icon, style),
                Span::styled(entry.name.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        )
        .highlight_style(theme.highlight_style());
    let mut state = ListState::default();
    if !picker.entries.is_empty() {
        state.select(Some(picker.cursor));
    }
    f.render_stateful_widget(list, chunks[2], &mut state);

    let footer = Line::from(Span::styled(
        " j/k:navigate  Enter:open dir / import file  Esc:back  q:quit",
        theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[3]);
}
