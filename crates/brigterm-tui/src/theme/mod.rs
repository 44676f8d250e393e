//! Centralized theme for the dashboard.
//!
//! - `palette`: Raw color constants
//! - `styles`: Semantic style builder functions
//! - `icons`: Phase and chrome glyphs with Unicode fallbacks

pub mod icons;
pub mod palette;
pub mod styles;
