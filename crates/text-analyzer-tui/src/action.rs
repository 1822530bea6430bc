/// User-level actions produced by input mapping and consumed by [`App::update`](crate::app::App::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Tick,
    Resize(u16, u16),
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    /// Enter: open the selected item.
    DrillIn,
    /// Esc: close the current modal or screen.
    NavigateBack,
    /// Tab: switch between the Dashboard and Imports screens.
    SwitchScreen,
    /// Open the file picker to import a file.
    OpenFile,
    /// Ask to delete the selected file.
    Delete,
    ConfirmYes,
    ConfirmNo,
    DismissNotice,
}
