pub mod components;
pub mod data;
pub mod shortcuts;
pub mod tui;
