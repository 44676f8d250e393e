//! Abstract input key event, independent of terminal library.
//!
//! Pages interpret [`InputKey`] values only, so brigterm-app never depends
//! on crossterm. The TUI converts terminal events at its boundary.

/// Abstract input key event, independent of terminal library.
/// Converted from crossterm::event::KeyEvent at the TUI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    // Character keys
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Character with Ctrl modifier (Ctrl+a, Ctrl+c, etc.)
    CharCtrl(char),

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    // Action keys
    Enter,
    Esc,
    Tab,
    Backspace,
    Delete,

    /// Function key (F1-F12)
    F(u8),
}

impl InputKey {
    /// Reload the current page (`F5` or `r`)
    pub fn is_reload(&self) -> bool {
        matches!(self, InputKey::F(5) | InputKey::Char('r' | 'R'))
    }

    /// Go back to the parent page
    pub fn is_back(&self) -> bool {
        matches!(self, InputKey::Left | InputKey::Backspace | InputKey::Delete)
    }

    /// Quit the dashboard (`q` or Ctrl+C)
    pub fn is_quit(&self) -> bool {
        matches!(self, InputKey::Char('q' | 'Q') | InputKey::CharCtrl('c'))
    }
}
