//! Key handling for the menu.
//!
//! Maps crossterm key events to menu actions. The mapping is fixed: arrow
//! keys or j/k to move, m to mount or unmount, Enter to navigate into the
//! selection, q or Esc to leave.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// User actions derived from keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the menu without navigating
    Quit,
    /// Move selection up
    Up,
    /// Move selection down
    Down,
    /// Mount or unmount the selected device
    ToggleMount,
    /// Navigate into the selected device's mount directory
    Confirm,
    /// No action
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

            KeyCode::Up | KeyCode::Char('k') => Action::Up,
            KeyCode::Down | KeyCode::Char('j') => Action::Down,

            KeyCode::Char('m') => Action::ToggleMount,
            KeyCode::Enter => Action::Confirm,

            _ => Action::None,
        }
    }
}
