//! Log page: live tail of a worker's or a job's logs

use std::sync::{Arc, Mutex};

use brigterm_api::ApiClient;

use super::lock;
use crate::input_key::InputKey;
use crate::log_tailer::{LogScope, LogSnapshot, LogTailer};
use crate::redraw::RedrawHandle;
use crate::route::{NavIntent, Route};
use crate::view::{KeyHint, LogView, PageView, HINT_BACK, HINT_HOME, HINT_QUIT, HINT_RELOAD};

/// Lines moved by PageUp/PageDown
const PAGE_SCROLL: usize = 20;

#[derive(Debug, Default)]
struct State {
    scope: Option<LogScope>,
    /// Lines scrolled back from the tail; 0 follows new output
    scroll_back: usize,
}

#[derive(Debug)]
pub struct LogPage<C> {
    tailer: LogTailer<C>,
    state: Mutex<State>,
}

impl<C> LogPage<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>, redraw: RedrawHandle) -> Self {
        Self {
            tailer: LogTailer::new(client, redraw),
            state: Mutex::new(State::default()),
        }
    }

    /// Make sure a tail for the scope is running. Periodic refreshes of the
    /// same scope leave the running activation alone.
    pub(super) async fn refresh(&self, event_id: &str, job_name: Option<&str>) {
        let scope = LogScope::new(event_id, job_name.map(str::to_string));
        {
            let mut state = lock(&self.state);
            if state.scope.as_ref() != Some(&scope) {
                state.scope = Some(scope.clone());
                state.scroll_back = 0;
            }
        }
        self.tailer.ensure_active(scope).await;
    }

    pub(super) async fn on_hide(&self) {
        self.tailer.deactivate().await;
    }

    pub fn snapshot(&self) -> LogSnapshot {
        self.tailer.snapshot()
    }

    pub(super) fn handle_key(&self, key: &InputKey) -> Option<NavIntent> {
        let mut state = lock(&self.state);
        let scope = state.scope.clone()?;

        if key.is_reload() {
            return Some(NavIntent::Navigate(Route::Log {
                event_id: scope.event_id,
                job_name: scope.job_name,
            }));
        }
        if key.is_back() {
            let back = match scope.job_name {
                Some(job_name) => Route::job(scope.event_id, job_name),
                None => Route::event(scope.event_id),
            };
            return Some(NavIntent::Navigate(back));
        }

        let lines = self.tailer.snapshot().buffer.line_count();
        match key {
            InputKey::Esc => return Some(NavIntent::Navigate(Route::Projects)),
            InputKey::Up => state.scroll_back = (state.scroll_back + 1).min(lines),
            InputKey::Down => state.scroll_back = state.scroll_back.saturating_sub(1),
            InputKey::PageUp => state.scroll_back = (state.scroll_back + PAGE_SCROLL).min(lines),
            InputKey::PageDown => state.scroll_back = state.scroll_back.saturating_sub(PAGE_SCROLL),
            InputKey::Home => state.scroll_back = lines,
            InputKey::End => state.scroll_back = 0,
            _ => {}
        }
        None
    }

    pub(super) fn view(&self) -> PageView {
        let state = lock(&self.state);
        let snapshot = self.tailer.snapshot();

        let (title, back_hint) = match &state.scope {
            Some(LogScope {
                event_id,
                job_name: Some(job_name),
            }) => (format!("Logs {} / {}", event_id, job_name), "Job"),
            Some(LogScope { event_id, .. }) => (format!("Worker logs {}", event_id), "Event"),
            None => ("Logs".to_string(), "Back"),
        };

        let mut status = snapshot.state.label().to_string();
        if state.scroll_back > 0 {
            status.push_str(" | scrolled");
        }
        if let Some(error) = &snapshot.last_error {
            status.push_str(" | ");
            status.push_str(error);
        }

        PageView {
            title: title.clone(),
            log: Some(LogView {
                title,
                line_count: snapshot.buffer.line_count(),
                text: snapshot.buffer.text().to_string(),
                scroll_back: state.scroll_back,
                status,
            }),
            hints: vec![
                HINT_RELOAD,
                KeyHint { key: HINT_BACK.key, action: back_hint },
                HINT_HOME,
                KeyHint::new("Up/Down", "Scroll"),
                KeyHint::new("End", "Follow"),
                HINT_QUIT,
            ],
            ..Default::default()
        }
    }
}
