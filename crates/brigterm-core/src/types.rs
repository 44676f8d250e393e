//! Core domain type definitions
//!
//! These mirror the JSON documents served by a Brigade v2 API server. Every
//! field the dashboard does not strictly need is defaulted so that older or
//! newer servers still decode.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata common to every top-level API object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// List metadata carrying the continuation token for the next page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// Opaque token for the next page; empty when there are no more results
    #[serde(rename = "continue", default)]
    pub continue_token: String,
    #[serde(default)]
    pub remaining_item_count: Option<i64>,
}

impl ListMeta {
    /// Whether the server indicated that more results exist
    pub fn has_more(&self) -> bool {
        !self.continue_token.is_empty()
    }
}

/// Options for a paged list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub continue_token: String,
    pub limit: Option<u32>,
}

impl ListOptions {
    pub fn first_page(limit: u32) -> Self {
        Self {
            continue_token: String::new(),
            limit: Some(limit),
        }
    }

    pub fn page(continue_token: impl Into<String>, limit: u32) -> Self {
        Self {
            continue_token: continue_token.into(),
            limit: Some(limit),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub spec: ProjectSpec,
}

impl Project {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Git clone URL of the worker template, if one is configured
    pub fn clone_url(&self) -> Option<&str> {
        self.spec
            .worker_template
            .git
            .as_ref()
            .map(|git| git.clone_url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default)]
    pub worker_template: WorkerSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSpec {
    #[serde(default)]
    pub git: Option<GitConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GitConfig {
    #[serde(rename = "cloneURL", default)]
    pub clone_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectList {
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<Project>,
}

// ─────────────────────────────────────────────────────────────────
// Events, workers and jobs
// ─────────────────────────────────────────────────────────────────

/// Lifecycle phase shared by workers and jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Aborted,
    Canceled,
    Failed,
    Pending,
    Running,
    SchedulingFailed,
    Starting,
    Succeeded,
    TimedOut,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Phase {
    /// Whether the phase is final (nothing more will happen)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Phase::Aborted
                | Phase::Canceled
                | Phase::Failed
                | Phase::SchedulingFailed
                | Phase::Succeeded
                | Phase::TimedOut
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Aborted => "ABORTED",
            Phase::Canceled => "CANCELED",
            Phase::Failed => "FAILED",
            Phase::Pending => "PENDING",
            Phase::Running => "RUNNING",
            Phase::SchedulingFailed => "SCHEDULING_FAILED",
            Phase::Starting => "STARTING",
            Phase::Succeeded => "SUCCEEDED",
            Phase::TimedOut => "TIMED_OUT",
            Phase::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(rename = "projectID", default)]
    pub project_id: String,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub qualifiers: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub worker: Worker,
}

impl Event {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Worker {
    #[serde(default)]
    pub status: WorkerStatus,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Worker {
    /// Locate a job by name
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkerStatus {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Job {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spec: JobSpec,
    #[serde(default)]
    pub status: JobStatus,
}

impl Job {
    /// `ended - started`, `None` if either bound is missing
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.status.started, self.status.ended) {
            (Some(started), Some(ended)) => Some(ended - started),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    #[serde(default)]
    pub primary_container: ContainerSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobStatus {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventList {
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<Event>,
}

/// Filter for listing events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsSelector {
    pub project_id: Option<String>,
}

impl EventsSelector {
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Logs
// ─────────────────────────────────────────────────────────────────

/// A single streamed log line
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogEntry {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: String,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            time: None,
            message: message.into(),
        }
    }
}

/// Which logs to stream for an event. No job means the worker's logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LogsSelector {
    pub job: Option<String>,
    pub container: Option<String>,
}

impl LogsSelector {
    pub fn worker() -> Self {
        Self::default()
    }

    pub fn job(name: impl Into<String>) -> Self {
        Self {
            job: Some(name.into()),
            container: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_decodes_known_and_unknown_values() {
        let phase: Phase = serde_json::from_str("\"SCHEDULING_FAILED\"").unwrap();
        assert_eq!(phase, Phase::SchedulingFailed);

        let phase: Phase = serde_json::from_str("\"TIMED_OUT\"").unwrap();
        assert_eq!(phase, Phase::TimedOut);

        let phase: Phase = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(phase, Phase::Unknown);
    }

    #[test]
    fn test_phase_terminal() {
        assert!(Phase::Succeeded.is_terminal());
        assert!(Phase::TimedOut.is_terminal());
        assert!(!Phase::Running.is_terminal());
        assert!(!Phase::Pending.is_terminal());
        assert!(!Phase::Unknown.is_terminal());
    }

    #[test]
    fn test_event_decodes_brigade_document() {
        let json = r#"{
            "apiVersion": "brigade.sh/v2",
            "kind": "Event",
            "metadata": {"id": "evt-1", "created": "2021-06-01T10:00:00Z"},
            "projectID": "demo",
            "source": "brigade.sh/cli",
            "type": "exec",
            "qualifiers": {"repo": "demo"},
            "worker": {
                "status": {"phase": "RUNNING", "started": "2021-06-01T10:00:05Z"},
                "jobs": [
                    {
                        "name": "build",
                        "spec": {"primaryContainer": {"image": "rust:1"}},
                        "status": {
                            "phase": "SUCCEEDED",
                            "started": "2021-06-01T10:00:10Z",
                            "ended": "2021-06-01T10:01:40Z"
                        }
                    }
                ]
            }
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id(), "evt-1");
        assert_eq!(event.project_id, "demo");
        assert_eq!(event.event_type, "exec");
        assert_eq!(event.qualifiers.get("repo").map(String::as_str), Some("demo"));
        assert_eq!(event.worker.status.phase, Phase::Running);
        assert!(event.worker.status.ended.is_none());

        let job = event.worker.job("build").unwrap();
        assert_eq!(job.spec.primary_container.image, "rust:1");
        assert_eq!(job.duration(), Some(chrono::Duration::seconds(90)));
        assert!(event.worker.job("lint").is_none());
    }

    #[test]
    fn test_job_duration_requires_both_bounds() {
        let mut job = Job::default();
        assert_eq!(job.duration(), None);
        job.status.started = Some(Utc::now());
        assert_eq!(job.duration(), None);
    }

    #[test]
    fn test_list_meta_continue_token() {
        let list: EventList =
            serde_json::from_str(r#"{"metadata": {"continue": "abc"}, "items": []}"#).unwrap();
        assert!(list.metadata.has_more());
        assert_eq!(list.metadata.continue_token, "abc");

        let list: EventList = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(!list.metadata.has_more());
    }

    #[test]
    fn test_project_clone_url() {
        let json = r#"{
            "metadata": {"id": "demo"},
            "description": "Demo project",
            "spec": {"workerTemplate": {"git": {"cloneURL": "https://github.com/x/y.git"}}}
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id(), "demo");
        assert_eq!(project.clone_url(), Some("https://github.com/x/y.git"));
        assert_eq!(Project::default().clone_url(), None);
    }
}
