//! The API capability consumed by the pages.

use brigterm_core::prelude::*;
use brigterm_core::{Event, EventList, EventsSelector, ListOptions, LogsSelector, Project, ProjectList};

use crate::stream::LogStream;

/// Object fetch/list/stream operations against the job-execution service.
///
/// `ApiClient` is the `Send` variant used across tasks; implement it with
/// plain `async fn`s.
#[trait_variant::make(ApiClient: Send)]
pub trait LocalApiClient {
    /// List all projects.
    async fn list_projects(&self) -> Result<ProjectList>;

    /// Fetch a single project.
    async fn get_project(&self, id: &str) -> Result<Project>;

    /// List one page of events. The returned list's metadata carries the
    /// continuation token for the next page (empty when there is none).
    async fn list_events(
        &self,
        selector: &EventsSelector,
        options: &ListOptions,
    ) -> Result<EventList>;

    /// Fetch a single event including its worker and job summaries.
    async fn get_event(&self, id: &str) -> Result<Event>;

    /// Open a following log stream for an event's worker or one of its jobs.
    ///
    /// An `Err` means the stream could not be opened at all. Once opened,
    /// failures arrive on [`LogStream::errors`] and both sources close
    /// independently.
    async fn stream_logs(&self, event_id: &str, selector: &LogsSelector) -> Result<LogStream>;
}
