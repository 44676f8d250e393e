//! Event page: event and worker details plus the job table

use std::sync::{Arc, Mutex};

use brigterm_api::ApiClient;
use brigterm_core::{age_since, format_date_time, format_elapsed, Event};
use chrono::Utc;

use super::{lock, move_selection, refresh_failed, selection};
use crate::input_key::InputKey;
use crate::route::{NavIntent, Route};
use crate::view::{
    InfoPane, KeyHint, PageView, TableRow, TableView, HINT_BACK, HINT_HOME, HINT_QUIT, HINT_RELOAD,
};

#[derive(Debug, Default)]
struct State {
    event_id: Option<String>,
    event: Option<Event>,
    selected: usize,
    error: Option<String>,
}

#[derive(Debug)]
pub struct EventPage<C> {
    client: Arc<C>,
    state: Mutex<State>,
}

impl<C> EventPage<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: Mutex::new(State::default()),
        }
    }

    pub(super) async fn refresh(&self, event_id: &str) {
        {
            let mut state = lock(&self.state);
            if state.event_id.as_deref() != Some(event_id) {
                *state = State {
                    event_id: Some(event_id.to_string()),
                    ..Default::default()
                };
            }
        }

        let result = self.client.get_event(event_id).await;

        let mut state = lock(&self.state);
        if state.event_id.as_deref() != Some(event_id) {
            return;
        }
        match result {
            Ok(event) => {
                state.event = Some(event);
                state.error = None;
            }
            Err(e) => {
                state.error = Some(refresh_failed(
                    format_args!("Failed to get event {}", event_id),
                    &e,
                ));
            }
        }
    }

    pub(super) fn handle_key(&self, key: &InputKey) -> Option<NavIntent> {
        let mut state = lock(&self.state);
        let event_id = state.event_id.clone()?;

        if key.is_reload() {
            return Some(NavIntent::Navigate(Route::event(event_id)));
        }
        if *key == InputKey::Esc {
            return Some(NavIntent::Navigate(Route::Projects));
        }
        if key.is_back() {
            let back = match &state.event {
                Some(event) => Route::project(event.project_id.clone()),
                None => Route::Projects,
            };
            return Some(NavIntent::Navigate(back));
        }

        let jobs = state.event.as_ref().map_or(0, |e| e.worker.jobs.len());
        if move_selection(&mut state.selected, jobs, key) {
            return None;
        }
        match key {
            InputKey::Char('l' | 'L') => Some(NavIntent::Navigate(Route::worker_log(event_id))),
            InputKey::Enter => {
                let event = state.event.as_ref()?;
                let i = selection(state.selected, jobs)?;
                Some(NavIntent::Navigate(Route::job(
                    event_id,
                    event.worker.jobs[i].name.clone(),
                )))
            }
            _ => None,
        }
    }

    pub(super) fn view(&self) -> PageView {
        let state = lock(&self.state);
        let now = Utc::now();
        let event_id = state.event_id.clone().unwrap_or_default();

        let mut panes = Vec::new();
        let mut table = TableView {
            title: "Jobs".to_string(),
            header: vec!["Name", "Image", "Started", "Ended", "Duration"],
            ..Default::default()
        };

        if let Some(event) = &state.event {
            let phase = event.worker.status.phase;

            let mut info = InfoPane::new(format!("Event: {}", event.id()))
                .field("Source", event.source.clone())
                .field("Type", event.event_type.clone())
                .field("Time Created", format_date_time(event.metadata.created));
            for (key, value) in event.qualifiers.iter().chain(event.labels.iter()) {
                info = info.field(key.clone(), value.clone());
            }
            panes.push(info.with_phase(phase));

            panes.push(
                InfoPane::new("Worker")
                    .field("Worker Phase", phase.to_string())
                    .field("Worker Started", format_date_time(event.worker.status.started))
                    .field("Worker Ended", format_date_time(event.worker.status.ended))
                    .with_phase(phase),
            );

            table.rows = event
                .worker
                .jobs
                .iter()
                .map(|job| TableRow {
                    key: job.name.clone(),
                    phase: Some(job.status.phase),
                    cells: vec![
                        job.name.clone(),
                        job.spec.primary_container.image.clone(),
                        age_since(job.status.started, now),
                        age_since(job.status.ended, now),
                        job.duration().map(format_elapsed).unwrap_or_default(),
                    ],
                })
                .collect();
            table.phase = Some(phase);
        }
        table.selected = selection(state.selected, table.rows.len());

        PageView {
            title: format!("Event {}", event_id),
            panes,
            table: Some(table),
            hints: vec![
                HINT_RELOAD,
                HINT_BACK,
                HINT_HOME,
                KeyHint::new("Enter", "Job"),
                KeyHint::new("L", "Worker Logs"),
                HINT_QUIT,
            ],
            error: state.error.clone(),
            ..Default::default()
        }
    }
}
