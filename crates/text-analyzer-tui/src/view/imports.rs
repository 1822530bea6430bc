use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use text_analyzer_core::RecordStatus;

use crate::app::App;
use crate::view::{file_type_label, format_size, spinner_char, truncate};

/// Render the Imports screen: header, drop target, and file list.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let chunks = Layout::vertical([
        Constraint::Length(3), // header
        Constraint::Length(5), // drop target
        Constraint::Min(3),    // file list
    ])
    .split(area);

    let header = vec![
        Line::from(Span::styled(
            " Imports",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " Upload and analyze text files. Manage imported files.",
            Style::default().fg(theme.dim),
        )),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    render_drop_target(f, app, chunks[1]);
    render_file_list(f, app, chunks[2]);
}

fn render_drop_target(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let lines = if let Some(filename) = app.controller.in_flight_filename() {
        vec![
            Line::from(Span::styled(
                format!("{} Analyzing", spinner_char(app.tick)),
                Style::default()
                    .fg(theme.spinner)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                filename.to_string(),
                Style::default().fg(theme.dim),
            )),
        ]
    } else {
        vec![
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(theme.text)),
                Span::styled(
                    "o",
                    Style::default()
                        .fg(theme.active)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to select a file", Style::default().fg(theme.text)),
            ]),
            Line::from(Span::styled(
                "Supported file is only .TXT",
                Style::default().fg(theme.dim),
            )),
        ]
    };

    let border = if app.can_import() {
        theme.border_style()
    } else {
        Style::default().fg(theme.spinner)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    f.render_widget(block, area);
    // Vertically center the two lines
    let [_, body, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

fn render_file_list(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let catalog = &app.catalog;

    if catalog.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No files imported yet.",
            Style::default().fg(theme.dim),
        )))
        .block(Block::default().borders(Borders::TOP).border_style(theme.border_style()));
        f.render_widget(empty, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(30).max(10);
    let items: Vec<ListItem> = catalog
        .records()
        .map(|record| {
            let label = file_type_label(record.extension().as_deref());
            let status = if record.status == RecordStatus::Pending {
                format!("{} {}", spinner_char(app.tick), record.status.label())
            } else {
                record.status.label().to_string()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<4} ", label),
                    Style::default().fg(theme.active),
                ),
                Span::styled(
                    format!("{:<w$}", truncate(&record.filename, name_width), w = name_width),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!(" {:>9} ", format_size(record.size_bytes)),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(status, Style::default().fg(theme.status_color(record.status))),
            ]))
        })
        .collect();

    let title = format!(" Imported files ({}) ", catalog.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.border_style())
                .title(Span::styled(
                    title,
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(theme.highlight_style())
        .highlight_symbol("\u{25B8}");

    let mut state = ListState::default();
    state.select(catalog.selected().and_then(|name| catalog.position(name)));
    f.render_stateful_widget(list, area, &mut state);
}
