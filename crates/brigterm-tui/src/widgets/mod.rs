//! Custom widget components

mod header;
mod info_pane;
mod log_pane;
mod object_table;
mod usage_bar;

pub use header::MainHeader;
pub use info_pane::InfoPaneWidget;
pub use log_pane::LogPane;
pub use object_table::ObjectTable;
pub use usage_bar::UsageBar;
