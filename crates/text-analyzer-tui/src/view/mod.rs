pub mod confirm;
pub mod dashboard;
pub mod file_picker;
pub mod imports;
pub mod nav;
pub mod toast;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{:.1} MB", b / (KIB * KIB))
    }
}

/// Short file-type label shown next to a file name.
pub fn file_type_label(extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => ext.to_uppercase(),
        _ => "FILE".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("notes.txt", 20), "notes.txt");
        assert_eq!(truncate("a-very-long-name.txt", 8), "a-very-\u{2026}");
        assert_eq!(truncate("\u{e9}t\u{e9}.txt", 8), "\u{e9}t\u{e9}.txt");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn sizes_and_labels() {
        assert_eq!(format_size(10), "10 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(file_type_label(Some("txt")), "TXT");
        assert_eq!(file_type_label(None), "FILE");
    }
}
