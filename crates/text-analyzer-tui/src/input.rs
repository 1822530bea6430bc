use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

use crate::action::Action;

/// Map a crossterm terminal event to a TUI action.
pub fn map_event(event: &Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }
            map_key(key)
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Action::MoveDown,
            MouseEventKind::ScrollUp => Action::MoveUp,
            _ => Action::None,
        },
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchScreen,
        KeyCode::Char('o') | KeyCode::Char('a') => Action::OpenFile,
        KeyCode::Char('d') | KeyCode::Delete => Action::Delete,
        KeyCode::Char('y') => Action::ConfirmYes,
        KeyCode::Char('n') => Action::ConfirmNo,
        KeyCode::Char('x') => Action::DismissNotice,
        _ => Action::None,
    }
}
