//! Job page: details of one job of an event

use std::sync::{Arc, Mutex};

use brigterm_api::ApiClient;
use brigterm_core::prelude::*;
use brigterm_core::{format_date_time, format_elapsed, Job};

use super::{lock, refresh_failed};
use crate::input_key::InputKey;
use crate::route::{NavIntent, Route};
use crate::view::{InfoPane, KeyHint, PageView, HINT_BACK, HINT_HOME, HINT_QUIT, HINT_RELOAD};

#[derive(Debug, Default)]
struct State {
    /// `(event_id, job_name)` the page is showing
    target: Option<(String, String)>,
    job: Option<Job>,
    error: Option<String>,
}

#[derive(Debug)]
pub struct JobPage<C> {
    client: Arc<C>,
    state: Mutex<State>,
}

impl<C> JobPage<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: Mutex::new(State::default()),
        }
    }

    fn is_target(state: &State, event_id: &str, job_name: &str) -> bool {
        matches!(&state.target, Some((e, j)) if e == event_id && j == job_name)
    }

    pub(super) async fn refresh(&self, event_id: &str, job_name: &str) {
        {
            let mut state = lock(&self.state);
            if !Self::is_target(&state, event_id, job_name) {
                *state = State {
                    target: Some((event_id.to_string(), job_name.to_string())),
                    ..Default::default()
                };
            }
        }

        let result = self.fetch_job(event_id, job_name).await;

        let mut state = lock(&self.state);
        if !Self::is_target(&state, event_id, job_name) {
            return;
        }
        match result {
            Ok(job) => {
                state.job = Some(job);
                state.error = None;
            }
            Err(e) => {
                state.error = Some(refresh_failed(
                    format_args!("Failed to load job {} of event {}", job_name, event_id),
                    &e,
                ));
            }
        }
    }

    async fn fetch_job(&self, event_id: &str, job_name: &str) -> Result<Job> {
        let event = self.client.get_event(event_id).await?;
        event
            .worker
            .job(job_name)
            .cloned()
            .ok_or_else(|| Error::not_found("job", job_name))
    }

    pub(super) fn handle_key(&self, key: &InputKey) -> Option<NavIntent> {
        let state = lock(&self.state);
        let (event_id, job_name) = state.target.clone()?;

        if key.is_reload() {
            return Some(NavIntent::Navigate(Route::job(event_id, job_name)));
        }
        if key.is_back() {
            return Some(NavIntent::Navigate(Route::event(event_id)));
        }
        match key {
            InputKey::Esc => Some(NavIntent::Navigate(Route::Projects)),
            InputKey::Char('l' | 'L') => {
                Some(NavIntent::Navigate(Route::job_log(event_id, job_name)))
            }
            _ => None,
        }
    }

    pub(super) fn view(&self) -> PageView {
        let state = lock(&self.state);
        let (event_id, job_name) = state.target.clone().unwrap_or_default();

        let mut panes = Vec::new();
        if let Some(job) = &state.job {
            let mut pane = InfoPane::new(format!("{}: {}", event_id, job.name))
                .field("Primary Image", job.spec.primary_container.image.clone())
                .field("Phase", job.status.phase.to_string())
                .field("Started", format_date_time(job.status.started))
                .field("Ended", format_date_time(job.status.ended));
            if let Some(duration) = job.duration() {
                pane = pane.field("Duration", format_elapsed(duration));
            }
            panes.push(pane.with_phase(job.status.phase));
        }

        PageView {
            title: format!("Job {} / {}", event_id, job_name),
            panes,
            hints: vec![
                HINT_RELOAD,
                HINT_BACK,
                HINT_HOME,
                KeyHint::new("L", "Logs"),
                HINT_QUIT,
            ],
            error: state.error.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigterm_api::test_utils::{test_event, test_job, ApiCall, MockApiClient};
    use brigterm_core::Phase;

    fn client() -> MockApiClient {
        let mut event = test_event("e1", "demo", Phase::Running);
        event.worker.jobs = vec![test_job("build", Phase::Succeeded)];
        MockApiClient::new().with_events(vec![event])
    }

    #[tokio::test]
    async fn test_refresh_shows_job_detail() {
        let client = client();
        let page = JobPage::new(Arc::new(client.clone()));
        page.refresh("e1", "build").await;

        let view = page.view();
        assert!(view.error.is_none());
        let pane = &view.panes[0];
        assert_eq!(pane.title, "e1: build");
        assert_eq!(pane.phase, Some(Phase::Succeeded));
        assert!(pane
            .fields
            .contains(&("Duration".to_string(), "1m30s".to_string())));
        assert!(view.log.is_none());
        assert_eq!(client.calls(), vec![ApiCall::GetEvent("e1".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let page = JobPage::new(Arc::new(client()));
        page.refresh("e1", "lint").await;

        let view = page.view();
        assert_eq!(view.error.as_deref(), Some("job not found: lint"));
        assert!(view.panes.is_empty());
        // The page is still usable
        assert_eq!(
            page.handle_key(&InputKey::Left),
            Some(NavIntent::Navigate(Route::event("e1")))
        );
    }

    #[tokio::test]
    async fn test_log_key_opens_job_logs() {
        let page = JobPage::new(Arc::new(client()));
        page.refresh("e1", "build").await;
        assert_eq!(
            page.handle_key(&InputKey::Char('l')),
            Some(NavIntent::Navigate(Route::job_log("e1", "build")))
        );
        assert_eq!(
            page.handle_key(&InputKey::Esc),
            Some(NavIntent::Navigate(Route::Projects))
        );
    }
}
