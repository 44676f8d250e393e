//! brigterm-app - Page navigation and refresh orchestration for the Brigade dashboard
//!
//! This crate owns everything between the API capability and the terminal:
//! the page registry, the five pages and their view models, the router with
//! its single-flight auto-refresh session, the log tailer, configuration
//! loading and signal handling. It has no terminal dependency; the TUI feeds
//! it [`InputKey`]s and draws [`PageView`]s.

pub mod config;
pub mod input_key;
pub mod log_tailer;
pub mod page_set;
pub mod pages;
pub mod pagination;
pub mod redraw;
pub mod route;
pub mod router;
pub mod signals;
pub mod view;

mod shutdown;

// Re-export primary types
pub use config::Settings;
pub use input_key::InputKey;
pub use log_tailer::{ClosedSource, DisplayBuffer, LogScope, LogSnapshot, LogTailState, LogTailer};
pub use page_set::{Identified, PageSet};
pub use pages::{build_pages, Page};
pub use pagination::CursorStack;
pub use redraw::RedrawHandle;
pub use route::{NavIntent, PageId, Route};
pub use router::{Navigator, Router};
pub use view::{InfoPane, KeyHint, LogView, PageView, TableRow, TableView, Tone};
