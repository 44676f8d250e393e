//! Page identities and navigation targets

use std::fmt;

/// Identity of one of the registered pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Projects,
    Project,
    Event,
    Job,
    Log,
}

impl PageId {
    pub const ALL: [PageId; 5] = [
        PageId::Projects,
        PageId::Project,
        PageId::Event,
        PageId::Job,
        PageId::Log,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Projects => "projects",
            PageId::Project => "project",
            PageId::Event => "event",
            PageId::Job => "job",
            PageId::Log => "log",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page together with the parameters it is refreshed with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Projects,
    Project {
        project_id: String,
    },
    Event {
        event_id: String,
    },
    Job {
        event_id: String,
        job_name: String,
    },
    /// Worker logs when `job_name` is `None`
    Log {
        event_id: String,
        job_name: Option<String>,
    },
}

impl Route {
    pub fn page_id(&self) -> PageId {
        match self {
            Route::Projects => PageId::Projects,
            Route::Project { .. } => PageId::Project,
            Route::Event { .. } => PageId::Event,
            Route::Job { .. } => PageId::Job,
            Route::Log { .. } => PageId::Log,
        }
    }

    pub fn project(project_id: impl Into<String>) -> Self {
        Route::Project {
            project_id: project_id.into(),
        }
    }

    pub fn event(event_id: impl Into<String>) -> Self {
        Route::Event {
            event_id: event_id.into(),
        }
    }

    pub fn job(event_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        Route::Job {
            event_id: event_id.into(),
            job_name: job_name.into(),
        }
    }

    pub fn worker_log(event_id: impl Into<String>) -> Self {
        Route::Log {
            event_id: event_id.into(),
            job_name: None,
        }
    }

    pub fn job_log(event_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        Route::Log {
            event_id: event_id.into(),
            job_name: Some(job_name.into()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Projects => write!(f, "projects"),
            Route::Project { project_id } => write!(f, "project/{}", project_id),
            Route::Event { event_id } => write!(f, "event/{}", event_id),
            Route::Job { event_id, job_name } => write!(f, "event/{}/job/{}", event_id, job_name),
            Route::Log {
                event_id,
                job_name: Some(job_name),
            } => write!(f, "event/{}/job/{}/logs", event_id, job_name),
            Route::Log {
                event_id,
                job_name: None,
            } => write!(f, "event/{}/logs", event_id),
        }
    }
}

/// What a page asks for in response to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIntent {
    Navigate(Route),
    Exit,
}
