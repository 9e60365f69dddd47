//! banter-tui: Terminal UI components
//!
//! Widgets and terminal lifecycle for the chat screen, built on ratatui and
//! crossterm.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
