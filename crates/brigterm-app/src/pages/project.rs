//! Project page: project details and a paged table of its events

use std::sync::{Arc, Mutex};

use brigterm_api::ApiClient;
use brigterm_core::{
    age_since, format_date_time, format_elapsed, Event, EventsSelector, ListOptions, Project,
};
use chrono::Utc;

use super::{lock, move_selection, refresh_failed, selection};
use crate::input_key::InputKey;
use crate::pagination::CursorStack;
use crate::route::{NavIntent, Route};
use crate::view::{
    InfoPane, KeyHint, PageView, TableRow, TableView, HINT_BACK, HINT_HOME, HINT_QUIT, HINT_RELOAD,
};

#[derive(Debug, Default)]
struct State {
    project_id: Option<String>,
    project: Option<Project>,
    events: Vec<Event>,
    /// Continuation token returned with the current page
    next_token: String,
    cursor: CursorStack,
    selected: usize,
    error: Option<String>,
}

#[derive(Debug)]
pub struct ProjectPage<C> {
    client: Arc<C>,
    page_size: u32,
    state: Mutex<State>,
}

impl<C> ProjectPage<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            state: Mutex::new(State::default()),
        }
    }

    pub(super) async fn refresh(&self, project_id: &str) {
        let token = {
            let mut state = lock(&self.state);
            if state.project_id.as_deref() != Some(project_id) {
                *state = State {
                    project_id: Some(project_id.to_string()),
                    ..Default::default()
                };
            }
            state.cursor.current().to_string()
        };

        let project = self.client.get_project(project_id).await;
        let events = self
            .client
            .list_events(
                &EventsSelector::for_project(project_id),
                &ListOptions::page(token, self.page_size),
            )
            .await;

        let mut state = lock(&self.state);
        if state.project_id.as_deref() != Some(project_id) {
            return;
        }
        let mut error = None;
        match project {
            Ok(project) => state.project = Some(project),
            Err(e) => {
                error = Some(refresh_failed(
                    format_args!("Failed to get project {}", project_id),
                    &e,
                ));
            }
        }
        match events {
            Ok(list) => {
                state.next_token = list.metadata.continue_token;
                state.events = list.items;
            }
            Err(e) => {
                let message = refresh_failed(
                    format_args!("Failed to list events of {}", project_id),
                    &e,
                );
                error.get_or_insert(message);
            }
        }
        state.error = error;
    }

    pub(super) fn handle_key(&self, key: &InputKey) -> Option<NavIntent> {
        let mut state = lock(&self.state);
        let project_id = state.project_id.clone()?;
        let reload = NavIntent::Navigate(Route::project(project_id));

        if key.is_reload() {
            return Some(reload);
        }
        if key.is_back() || *key == InputKey::Esc {
            return Some(NavIntent::Navigate(Route::Projects));
        }
        let len = state.events.len();
        if move_selection(&mut state.selected, len, key) {
            return None;
        }
        match key {
            // The token belongs to the page currently shown; the reload
            // fetches the one for the new page.
            InputKey::Char('n' | 'N') => {
                let next = std::mem::take(&mut state.next_token);
                if state.cursor.push(next) {
                    state.selected = 0;
                    Some(reload)
                } else {
                    None
                }
            }
            InputKey::Char('p' | 'P') => {
                if state.cursor.pop() {
                    state.next_token.clear();
                    state.selected = 0;
                    Some(reload)
                } else {
                    None
                }
            }
            InputKey::Enter => selection(state.selected, len)
                .map(|i| NavIntent::Navigate(Route::event(state.events[i].id()))),
            _ => None,
        }
    }

    /// Tokens of the page's cursor stack, first page first
    pub fn cursor_tokens(&self) -> Vec<String> {
        lock(&self.state).cursor.tokens().to_vec()
    }

    pub(super) fn view(&self) -> PageView {
        let state = lock(&self.state);
        let now = Utc::now();
        let title = state.project_id.clone().unwrap_or_default();

        let mut panes = Vec::new();
        if let Some(project) = &state.project {
            let mut pane =
                InfoPane::new(project.id()).field("Description", project.description.clone());
            if let Some(url) = project.clone_url() {
                pane = pane.field("Clone URL", url);
            }
            panes.push(pane.field("Created", format_date_time(project.metadata.created)));
        }

        let rows = state
            .events
            .iter()
            .map(|event| {
                let status = &event.worker.status;
                let duration = match (status.started, status.ended) {
                    (Some(started), Some(ended)) => format_elapsed(ended - started),
                    _ => String::new(),
                };
                TableRow {
                    key: event.id().to_string(),
                    phase: Some(status.phase),
                    cells: vec![
                        event.id().to_string(),
                        event.source.clone(),
                        event.event_type.clone(),
                        age_since(event.metadata.created, now),
                        age_since(status.started, now),
                        age_since(status.ended, now),
                        duration,
                    ],
                }
            })
            .collect::<Vec<_>>();

        let mut hints = vec![
            HINT_RELOAD,
            HINT_BACK,
            HINT_HOME,
            KeyHint::new("Enter", "Open"),
        ];
        if state.cursor.has_previous() {
            hints.push(KeyHint::new("P", "Previous Page"));
        }
        if !state.next_token.is_empty() {
            hints.push(KeyHint::new("N", "Next Page"));
        }
        hints.push(HINT_QUIT);

        PageView {
            title: format!("Project {}", title),
            panes,
            table: Some(TableView {
                title: format!("Events (page {})", state.cursor.page_number()),
                header: vec![
                    "ID", "Source", "Type", "Age", "Started", "Ended", "Duration",
                ],
                selected: selection(state.selected, rows.len()),
                rows,
                phase: None,
            }),
            hints,
            error: state.error.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigterm_api::test_utils::{test_event, test_project, ApiCall, MockApiClient};
    use brigterm_core::Phase;

    fn client(events: usize) -> MockApiClient {
        let events = (0..events)
            .map(|i| test_event(&format!("e{}", i), "demo", Phase::Succeeded))
            .collect();
        MockApiClient::new()
            .with_projects(vec![test_project("demo"), test_project("other")])
            .with_events(events)
    }

    fn hint_keys(view: &PageView) -> Vec<&'static str> {
        view.hints.iter().map(|h| h.key).collect()
    }

    #[tokio::test]
    async fn test_refresh_shows_project_and_first_page() {
        let client = client(5);
        let page = ProjectPage::new(Arc::new(client.clone()), 2);
        page.refresh("demo").await;

        let view = page.view();
        assert_eq!(view.panes[0].title, "demo");
        assert_eq!(view.panes[0].fields[0], ("Description".to_string(), "demo project".to_string()));
        let table = view.table.as_ref().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[6], "");
        assert!(hint_keys(&view).contains(&"N"));
        assert!(!hint_keys(&view).contains(&"P"));

        assert!(client.calls().contains(&ApiCall::ListEvents {
            project_id: Some("demo".to_string()),
            continue_token: String::new(),
        }));
    }

    #[tokio::test]
    async fn test_next_and_previous_walk_the_cursor_stack() {
        let client = client(5);
        let page = ProjectPage::new(Arc::new(client.clone()), 2);
        page.refresh("demo").await;

        let reload = Some(NavIntent::Navigate(Route::project("demo")));
        assert_eq!(page.handle_key(&InputKey::Char('n')), reload);
        page.refresh("demo").await;
        assert_eq!(page.handle_key(&InputKey::Char('n')), reload);
        page.refresh("demo").await;
        assert_eq!(page.cursor_tokens(), vec!["", "2", "4"]);

        let view = page.view();
        assert_eq!(view.table.as_ref().unwrap().rows.len(), 1);
        assert!(!hint_keys(&view).contains(&"N"));
        assert!(hint_keys(&view).contains(&"P"));

        // Last page: nothing to push
        assert_eq!(page.handle_key(&InputKey::Char('n')), None);

        assert_eq!(page.handle_key(&InputKey::Char('p')), reload);
        assert_eq!(page.handle_key(&InputKey::Char('p')), reload);
        assert_eq!(page.handle_key(&InputKey::Char('p')), None);
        assert_eq!(page.cursor_tokens(), vec![""]);
    }

    #[tokio::test]
    async fn test_repeated_next_before_reload_pushes_once() {
        let page = ProjectPage::new(Arc::new(client(5)), 2);
        page.refresh("demo").await;

        let reload = Some(NavIntent::Navigate(Route::project("demo")));
        assert_eq!(page.handle_key(&InputKey::Char('n')), reload);
        assert_eq!(page.handle_key(&InputKey::Char('n')), None);
        assert_eq!(page.cursor_tokens(), vec!["", "2"]);
        assert!(!hint_keys(&page.view()).contains(&"N"));

        page.refresh("demo").await;
        assert_eq!(page.handle_key(&InputKey::Char('n')), reload);
        assert_eq!(page.cursor_tokens(), vec!["", "2", "4"]);

        // Previous, then next before the reload lands: no stale token pushed
        assert_eq!(page.handle_key(&InputKey::Char('p')), reload);
        assert_eq!(page.handle_key(&InputKey::Char('n')), None);
        assert_eq!(page.cursor_tokens(), vec!["", "2"]);
        page.refresh("demo").await;
        assert_eq!(page.view().table.unwrap().title, "Events (page 2)");
    }

    #[tokio::test]
    async fn test_switching_project_resets_cursor() {
        let page = ProjectPage::new(Arc::new(client(5)), 2);
        page.refresh("demo").await;
        page.handle_key(&InputKey::Char('n'));
        page.refresh("demo").await;
        assert_eq!(page.cursor_tokens().len(), 2);

        page.refresh("other").await;
        assert_eq!(page.cursor_tokens(), vec![""]);
        assert_eq!(page.view().table.unwrap().rows.len(), 0);
    }

    #[tokio::test]
    async fn test_back_and_home_go_to_projects() {
        let page = ProjectPage::new(Arc::new(client(1)), 20);
        page.refresh("demo").await;
        let home = Some(NavIntent::Navigate(Route::Projects));
        assert_eq!(page.handle_key(&InputKey::Left), home);
        assert_eq!(page.handle_key(&InputKey::Esc), home);
        assert_eq!(
            page.handle_key(&InputKey::Enter),
            Some(NavIntent::Navigate(Route::event("e0")))
        );
    }

    #[tokio::test]
    async fn test_missing_project_sets_error() {
        let page = ProjectPage::new(Arc::new(client(1)), 20);
        page.refresh("ghost").await;
        let view = page.view();
        assert!(view.error.unwrap().contains("not found"));
        assert!(view.panes.is_empty());
    }

    #[test]
    fn test_keys_before_first_refresh_are_ignored() {
        let page = ProjectPage::new(Arc::new(MockApiClient::new()), 20);
        assert_eq!(page.handle_key(&InputKey::F(5)), None);
    }
}
