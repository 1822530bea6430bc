use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use text_analyzer_core::{FileRecord, RecordAnalysis};

use crate::app::App;
use crate::theme::Theme;
use crate::view::format_size;

const MAX_ENTITIES: usize = 8;
const PREVIEW_CHARS: usize = 2000;

/// Render the Dashboard: the selected file's analysis and a content preview.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let Some(record) = app.catalog.selected_record() else {
        let msg = if app.catalog.is_empty() {
            "No files imported yet. Press Tab, then o to import one."
        } else {
            "No file selected. Use j/k to pick one."
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(theme.dim)))).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(" Dashboard "),
            ),
            area,
        );
        return;
    };

    let chunks =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(area);

    f.render_widget(
        Paragraph::new(summary_lines(record, theme))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(format!(" {} ", record.filename)),
            ),
        chunks[0],
    );

    let preview: String = record.content.chars().take(PREVIEW_CHARS).collect();
    f.render_widget(
        Paragraph::new(preview)
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(" Content "),
            ),
        chunks[1],
    );
}

fn field<'a>(label: &'a str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(theme.dim)),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

fn summary_lines<'a>(record: &'a FileRecord, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<12}", "Status"), Style::default().fg(theme.dim)),
            Span::styled(
                record.status.label(),
                Style::default()
                    .fg(theme.status_color(record.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        field("Size", format_size(record.size_bytes), theme),
        field(
            "Imported",
            record
                .imported_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            theme,
        ),
    ];

    match &record.analysis {
        Some(RecordAnalysis::Completed(outcome)) => {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", "Result"), Style::default().fg(theme.dim)),
                Span::styled(
                    outcome.text.clone(),
                    Style::default()
                        .fg(theme.outcome_color(outcome.kind))
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(confidence) = outcome.confidence {
                lines.push(field(
                    "Confidence",
                    format!("{:.0}%", confidence * 100.0),
                    theme,
                ));
            }
            if let Some(language) = &outcome.language {
                lines.push(field("Language", language.clone(), theme));
            }

            if !outcome.entities.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Entities",
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )));
                for entity in outcome.entities.iter().take(MAX_ENTITIES) {
                    let label = if entity.id.is_empty() {
                        entity.matched_text.clone()
                    } else {
                        entity.id.clone()
                    };
                    lines.push(Line::from(vec![
                        Span::styled("  \u{2022} ", Style::default().fg(theme.active)),
                        Span::styled(label, Style::default().fg(theme.text)),
                        Span::styled(
                            format!(" {:.2}", entity.relevance),
                            Style::default().fg(theme.dim),
                        ),
                    ]));
                }
                if outcome.entities.len() > MAX_ENTITIES {
                    lines.push(Line::from(Span::styled(
                        format!("  ... and {} more", outcome.entities.len() - MAX_ENTITIES),
                        Style::default().fg(theme.dim),
                    )));
                }
            }

            if !outcome.topics.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Topics",
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )));
                for topic in &outcome.topics {
                    lines.push(Line::from(vec![
                        Span::styled("  \u{2022} ", Style::default().fg(theme.active)),
                        Span::styled(topic.label.clone(), Style::default().fg(theme.text)),
                        Span::styled(
                            format!(" {:.2}", topic.score),
                            Style::default().fg(theme.dim),
                        ),
                    ]));
                }
            }
        }
        Some(RecordAnalysis::Failed { reason }) => {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", "Error"), Style::default().fg(theme.dim)),
                Span::styled(reason.as_str(), Style::default().fg(theme.danger)),
            ]));
        }
        None => {}
    }
    lines
}
