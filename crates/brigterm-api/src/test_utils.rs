//! Test utilities for the API capability
//!
//! Provides [`MockApiClient`], a scripted in-memory [`ApiClient`] that
//! records every call, plus helper constructors for domain objects.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use brigterm_core::prelude::*;
use brigterm_core::{
    Event, EventList, EventsSelector, Job, ListMeta, ListOptions, LogEntry, LogsSelector,
    ObjectMeta, Phase, Project, ProjectList,
};
use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;

use crate::client::ApiClient;
use crate::stream::LogStream;

/// A call observed by [`MockApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListProjects,
    GetProject(String),
    ListEvents {
        project_id: Option<String>,
        continue_token: String,
    },
    GetEvent(String),
    StreamLogs {
        event_id: String,
        job: Option<String>,
    },
}

/// Sending halves of a scripted log stream.
#[derive(Debug)]
pub struct LogFeed {
    pub entries: mpsc::Sender<LogEntry>,
    pub errors: mpsc::Sender<Error>,
}

#[derive(Debug, Default)]
struct MockState {
    projects: Vec<Project>,
    events: Vec<Event>,
    failure: Option<String>,
    failing_projects: HashSet<String>,
    latency: Option<Duration>,
    log_streams: VecDeque<LogStream>,
    calls: Vec<ApiCall>,
}

/// In-memory API client. Clones share state.
///
/// Event listing pages through the stored events in insertion order; the
/// continuation token is the offset of the next page.
#[derive(Debug, Clone, Default)]
pub struct MockApiClient {
    state: Arc<Mutex<MockState>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.state().projects = projects;
        self
    }

    pub fn with_events(self, events: Vec<Event>) -> Self {
        self.state().events = events;
        self
    }

    /// Make every call fail with `Error::Api` (or succeed again with `None`).
    pub fn set_failure(&self, message: Option<&str>) {
        self.state().failure = message.map(str::to_string);
    }

    /// Make event listing fail for one project only.
    pub fn fail_events_for(&self, project_id: &str) {
        self.state().failing_projects.insert(project_id.to_string());
    }

    /// Delay every request/response call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state().latency = latency;
    }

    pub fn set_events(&self, events: Vec<Event>) {
        self.state().events = events;
    }

    /// Prepare the stream returned by the next `stream_logs` call.
    ///
    /// Without a prepared feed, `stream_logs` returns an already closed stream.
    pub fn log_feed(&self) -> LogFeed {
        let (entries, errors, stream) = LogStream::channel();
        self.state().log_streams.push_back(stream);
        LogFeed { entries, errors }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Record the call and return the configured latency and failure.
    fn begin(&self, call: ApiCall) -> (Option<Duration>, Option<String>) {
        let mut state = self.state();
        state.calls.push(call);
        (state.latency, state.failure.clone())
    }

    async fn enter(&self, call: ApiCall) -> Result<()> {
        let (latency, failure) = self.begin(call);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(message) => Err(Error::api(message)),
            None => Ok(()),
        }
    }
}

impl ApiClient for MockApiClient {
    async fn list_projects(&self) -> Result<ProjectList> {
        self.enter(ApiCall::ListProjects).await?;
        Ok(ProjectList {
            metadata: ListMeta::default(),
            items: self.state().projects.clone(),
        })
    }

    async fn get_project(&self, id: &str) -> Result<Project> {
        self.enter(ApiCall::GetProject(id.to_string())).await?;
        self.state()
            .projects
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or_else(|| Error::not_found("project", id))
    }

    async fn list_events(
        &self,
        selector: &EventsSelector,
        options: &ListOptions,
    ) -> Result<EventList> {
        self.enter(ApiCall::ListEvents {
            project_id: selector.project_id.clone(),
            continue_token: options.continue_token.clone(),
        })
        .await?;

        let state = self.state();
        if let Some(project_id) = &selector.project_id {
            if state.failing_projects.contains(project_id) {
                return Err(Error::api(format!("events for {} unavailable", project_id)));
            }
        }

        let matching: Vec<&Event> = state
            .events
            .iter()
            .filter(|e| match &selector.project_id {
                Some(project_id) => &e.project_id == project_id,
                None => true,
            })
            .collect();

        let offset = if options.continue_token.is_empty() {
            0
        } else {
            options
                .continue_token
                .parse::<usize>()
                .map_err(|_| Error::http(400, "invalid continue token"))?
        };
        let limit = options.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let end = offset.saturating_add(limit).min(matching.len());
        let items: Vec<Event> = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|e| (*e).clone())
            .collect();
        let continue_token = if end < matching.len() {
            end.to_string()
        } else {
            String::new()
        };

        Ok(EventList {
            metadata: ListMeta {
                continue_token,
                remaining_item_count: Some((matching.len() - end) as i64),
            },
            items,
        })
    }

    async fn get_event(&self, id: &str) -> Result<Event> {
        self.enter(ApiCall::GetEvent(id.to_string())).await?;
        self.state()
            .events
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| Error::not_found("event", id))
    }

    async fn stream_logs(&self, event_id: &str, selector: &LogsSelector) -> Result<LogStream> {
        let failure = self
            .begin(ApiCall::StreamLogs {
                event_id: event_id.to_string(),
                job: selector.job.clone(),
            })
            .1;
        if let Some(message) = failure {
            return Err(Error::api(message));
        }
        Ok(self
            .state()
            .log_streams
            .pop_front()
            .unwrap_or_else(LogStream::closed))
    }
}

// ─────────────────────────────────────────────────────────────────
// Domain object helpers
// ─────────────────────────────────────────────────────────────────

/// Creates a project with a fixed creation time.
pub fn test_project(id: &str) -> Project {
    Project {
        metadata: ObjectMeta {
            id: id.to_string(),
            created: Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0).single(),
        },
        description: format!("{} project", id),
        ..Default::default()
    }
}

/// Creates an event for `project_id` whose worker is in `phase`.
pub fn test_event(id: &str, project_id: &str, phase: Phase) -> Event {
    let mut event = Event {
        metadata: ObjectMeta {
            id: id.to_string(),
            created: Utc.with_ymd_and_hms(2021, 6, 1, 10, 0, 0).single(),
        },
        project_id: project_id.to_string(),
        source: "brigade.sh/cli".to_string(),
        event_type: "exec".to_string(),
        ..Default::default()
    };
    event.worker.status.phase = phase;
    event.worker.status.started = Utc.with_ymd_and_hms(2021, 6, 1, 10, 0, 5).single();
    event
}

/// Creates a job that ran for 90 seconds.
pub fn test_job(name: &str, phase: Phase) -> Job {
    let mut job = Job {
        name: name.to_string(),
        ..Default::default()
    };
    job.spec.primary_container.image = "debian:stable".to_string();
    job.status.phase = phase;
    job.status.started = Utc.with_ymd_and_hms(2021, 6, 1, 10, 0, 10).single();
    job.status.ended = Utc.with_ymd_and_hms(2021, 6, 1, 10, 1, 40).single();
    job
}
