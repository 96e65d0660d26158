//! Keyboard shortcut constants for consistent documentation.

pub const QUIT: &str = "Esc/Ctrl+C";
pub const CLEAR_QUERY: &str = "Ctrl+U";
pub const THEME: &str = "F2";

// Suggestion panel
pub const MOVE_DOWN: &str = "Down";
pub const MOVE_UP: &str = "Up";
pub const OPEN: &str = "Enter";
pub const DISMISS: &str = "Esc";
pub const CLICK: &str = "Click";
