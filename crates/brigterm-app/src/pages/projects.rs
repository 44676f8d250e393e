//! Projects page: every project with the status of its most recent event

use std::sync::{Arc, Mutex};

use brigterm_api::ApiClient;
use brigterm_core::prelude::*;
use brigterm_core::{age_since, Event, EventsSelector, ListOptions, Project};
use chrono::Utc;

use super::{lock, move_selection, refresh_failed, selection};
use crate::input_key::InputKey;
use crate::route::{NavIntent, Route};
use crate::view::{KeyHint, PageView, TableRow, TableView, HINT_QUIT, HINT_RELOAD};

#[derive(Debug, Clone)]
struct ProjectRow {
    project: Project,
    /// `None` when the project has no events or the lookup failed
    last_event: Option<Event>,
}

#[derive(Debug, Default)]
struct State {
    rows: Vec<ProjectRow>,
    selected: usize,
    error: Option<String>,
}

#[derive(Debug)]
pub struct ProjectsPage<C> {
    client: Arc<C>,
    state: Mutex<State>,
}

impl<C> ProjectsPage<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: Mutex::new(State::default()),
        }
    }

    pub(super) async fn refresh(&self) {
        let projects = match self.client.list_projects().await {
            Ok(list) => list.items,
            Err(e) => {
                lock(&self.state).error =
                    Some(refresh_failed(format_args!("Failed to list projects"), &e));
                return;
            }
        };

        let mut rows = Vec::with_capacity(projects.len());
        for project in projects {
            let last_event = self.most_recent_event(project.id()).await;
            rows.push(ProjectRow {
                project,
                last_event,
            });
        }

        let mut state = lock(&self.state);
        state.rows = rows;
        state.error = None;
    }

    async fn most_recent_event(&self, project_id: &str) -> Option<Event> {
        let selector = EventsSelector::for_project(project_id);
        match self
            .client
            .list_events(&selector, &ListOptions::first_page(1))
            .await
        {
            Ok(list) => list.items.into_iter().next(),
            Err(e) => {
                debug!("No recent event for project {}: {}", project_id, e);
                None
            }
        }
    }

    pub(super) fn handle_key(&self, key: &InputKey) -> Option<NavIntent> {
        if key.is_reload() {
            return Some(NavIntent::Navigate(Route::Projects));
        }
        let mut state = lock(&self.state);
        let len = state.rows.len();
        if move_selection(&mut state.selected, len, key) {
            return None;
        }
        match key {
            InputKey::Enter => selection(state.selected, len)
                .map(|i| NavIntent::Navigate(Route::project(state.rows[i].project.id()))),
            _ => None,
        }
    }

    pub(super) fn view(&self) -> PageView {
        let state = lock(&self.state);
        let now = Utc::now();
        let rows = state
            .rows
            .iter()
            .map(|row| {
                let last_started = row
                    .last_event
                    .as_ref()
                    .and_then(|e| e.worker.status.started.or(e.metadata.created));
                TableRow {
                    key: row.project.id().to_string(),
                    phase: row.last_event.as_ref().map(|e| e.worker.status.phase),
                    cells: vec![
                        row.project.id().to_string(),
                        row.project.description.clone(),
                        age_since(last_started, now),
                    ],
                }
            })
            .collect::<Vec<_>>();

        PageView {
            title: "Projects".to_string(),
            table: Some(TableView {
                title: "Projects".to_string(),
                header: vec!["ID", "Description", "Last Event"],
                selected: selection(state.selected, rows.len()),
                rows,
                phase: None,
            }),
            hints: vec![HINT_RELOAD, KeyHint::new("Enter", "Open"), HINT_QUIT],
            error: state.error.clone(),
            ..Default::default()
        }
    }
}
