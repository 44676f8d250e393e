//! brigterm-tui - Terminal UI for the Brigade dashboard
//!
//! This crate provides the ratatui-based terminal interface. It drives a
//! [`brigterm_app::Router`], converts crossterm key events into
//! [`brigterm_app::InputKey`]s and renders the visible page's
//! [`brigterm_app::PageView`].

pub mod event;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use render::Chrome;
pub use runner::run;
pub use theme::icons::IconSet;
