//! # brigterm-core - Core Domain Types
//!
//! Foundation crate for the Brigade terminal dashboard. Provides domain types,
//! error handling, logging setup and the time formatting helpers shared by all
//! pages.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Project`], [`ProjectList`] - Brigade projects
//! - [`Event`], [`EventList`], [`Worker`], [`Job`] - Events and the work they spawned
//! - [`Phase`] - Lifecycle phase shared by workers and jobs
//! - [`LogEntry`], [`LogsSelector`] - Streamed log lines and what to stream
//! - [`ListOptions`], [`ListMeta`] - Continuation-token paging
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ### Formatting (`format`)
//! - [`short_human_duration()`] - `45s`, `12m`, `3h`, `2d`
//! - [`format_elapsed()`] - `1m30s`
//! - [`format_date_time()`] - `YYYY-MM-DD HH:MM:SS`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use brigterm_core::prelude::*;
//! ```

pub mod error;
pub mod format;
pub mod logging;
pub mod prelude;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result};
pub use format::{age_since, format_date_time, format_elapsed, short_human_duration};
pub use types::{
    ContainerSpec, Event, EventList, EventsSelector, GitConfig, Job, JobSpec, JobStatus,
    ListMeta, ListOptions, LogEntry, LogsSelector, ObjectMeta, Phase, Project, ProjectList,
    ProjectSpec, Worker, WorkerSpec, WorkerStatus,
};
