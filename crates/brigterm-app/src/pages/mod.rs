//! The dashboard pages.
//!
//! Each page is created once, refreshed in place with the parameters of the
//! route it is shown for, and turns key presses into navigation intents.
//! Failed refreshes keep the previous content and set an error indicator
//! that clears on the next successful refresh.

mod event;
mod job;
mod log;
mod project;
mod projects;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use brigterm_api::ApiClient;
use brigterm_core::prelude::*;

pub use event::EventPage;
pub use job::JobPage;
pub use log::LogPage;
pub use project::ProjectPage;
pub use projects::ProjectsPage;

use crate::input_key::InputKey;
use crate::page_set::{Identified, PageSet};
use crate::redraw::RedrawHandle;
use crate::route::{NavIntent, PageId, Route};
use crate::view::PageView;

/// One registered page, dispatched by [`PageId`]
#[derive(Debug)]
pub enum Page<C> {
    Projects(ProjectsPage<C>),
    Project(ProjectPage<C>),
    Event(EventPage<C>),
    Job(JobPage<C>),
    Log(LogPage<C>),
}

impl<C> Identified for Page<C> {
    fn page_id(&self) -> PageId {
        match self {
            Page::Projects(_) => PageId::Projects,
            Page::Project(_) => PageId::Project,
            Page::Event(_) => PageId::Event,
            Page::Job(_) => PageId::Job,
            Page::Log(_) => PageId::Log,
        }
    }
}

impl<C> Page<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn id(&self) -> PageId {
        self.page_id()
    }

    /// Reload the page's content for `route`.
    ///
    /// Never fails: API errors land on the page's error indicator. A route
    /// meant for another page is ignored.
    pub async fn refresh(&self, route: &Route) {
        match (self, route) {
            (Page::Projects(page), Route::Projects) => page.refresh().await,
            (Page::Project(page), Route::Project { project_id }) => page.refresh(project_id).await,
            (Page::Event(page), Route::Event { event_id }) => page.refresh(event_id).await,
            (Page::Job(page), Route::Job { event_id, job_name }) => {
                page.refresh(event_id, job_name).await
            }
            (Page::Log(page), Route::Log { event_id, job_name }) => {
                page.refresh(event_id, job_name.as_deref()).await
            }
            (page, route) => {
                warn!("Page {} cannot be refreshed with route {}", page.id(), route);
            }
        }
    }

    pub fn handle_key(&self, key: &InputKey) -> Option<NavIntent> {
        if key.is_quit() {
            return Some(NavIntent::Exit);
        }
        match self {
            Page::Projects(page) => page.handle_key(key),
            Page::Project(page) => page.handle_key(key),
            Page::Event(page) => page.handle_key(key),
            Page::Job(page) => page.handle_key(key),
            Page::Log(page) => page.handle_key(key),
        }
    }

    pub fn view(&self) -> PageView {
        match self {
            Page::Projects(page) => page.view(),
            Page::Project(page) => page.view(),
            Page::Event(page) => page.view(),
            Page::Job(page) => page.view(),
            Page::Log(page) => page.view(),
        }
    }

    /// Called when the page stops being the visible one
    pub async fn on_hide(&self) {
        if let Page::Log(page) = self {
            page.on_hide().await;
        }
    }
}

/// Build the full page set sharing one client.
pub fn build_pages<C>(
    client: Arc<C>,
    redraw: RedrawHandle,
    page_size: u32,
) -> Result<PageSet<Page<C>>>
where
    C: ApiClient + Send + Sync + 'static,
{
    let mut pages = PageSet::new();
    pages.register(Page::Projects(ProjectsPage::new(client.clone())))?;
    pages.register(Page::Project(ProjectPage::new(client.clone(), page_size)))?;
    pages.register(Page::Event(EventPage::new(client.clone())))?;
    pages.register(Page::Job(JobPage::new(client.clone())))?;
    pages.register(Page::Log(LogPage::new(client, redraw)))?;
    Ok(pages)
}

// ─────────────────────────────────────────────────────────────────
// Shared helpers
// ─────────────────────────────────────────────────────────────────

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Move a table selection with Up/Down/Home/End. Returns whether the key
/// was a selection key.
fn move_selection(selected: &mut usize, len: usize, key: &InputKey) -> bool {
    let last = len.saturating_sub(1);
    match key {
        InputKey::Up => *selected = selected.saturating_sub(1),
        InputKey::Down => *selected = (*selected + 1).min(last),
        InputKey::Home => *selected = 0,
        InputKey::End => *selected = last,
        _ => return false,
    }
    true
}

/// Log a failed refresh and return the text for the page's error line.
///
/// Recoverable failures are retried by the next tick, so they only warn.
fn refresh_failed(context: std::fmt::Arguments<'_>, e: &Error) -> String {
    if e.is_recoverable() {
        warn!("{}: {}", context, e);
    } else {
        error!("{}: {}", context, e);
    }
    e.to_string()
}

/// Table selection for display, `None` when the table is empty
fn selection(selected: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| selected.min(len - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigterm_api::test_utils::{ApiCall, MockApiClient};

    #[test]
    fn test_refresh_failed_returns_display_text() {
        let e = Error::not_found("event", "e9");
        assert_eq!(
            refresh_failed(format_args!("Failed to get event {}", "e9"), &e),
            "event not found: e9"
        );
        let e = Error::config_invalid("bad address");
        assert_eq!(
            refresh_failed(format_args!("Failed to list projects"), &e),
            "Invalid configuration: bad address"
        );
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut selected = 0;
        assert!(move_selection(&mut selected, 3, &InputKey::Up));
        assert_eq!(selected, 0);
        move_selection(&mut selected, 3, &InputKey::Down);
        move_selection(&mut selected, 3, &InputKey::Down);
        move_selection(&mut selected, 3, &InputKey::Down);
        assert_eq!(selected, 2);
        assert!(!move_selection(&mut selected, 3, &InputKey::Enter));
        move_selection(&mut selected, 0, &InputKey::End);
        assert_eq!(selected, 0);
    }

    #[test]
    fn test_selection_for_display() {
        assert_eq!(selection(0, 0), None);
        assert_eq!(selection(5, 3), Some(2));
        assert_eq!(selection(1, 3), Some(1));
    }

    #[tokio::test]
    async fn test_build_pages_registers_every_page() {
        let pages = build_pages(Arc::new(MockApiClient::new()), RedrawHandle::new(), 20).unwrap();
        assert_eq!(pages.len(), PageId::ALL.len());
        for id in PageId::ALL {
            assert_eq!(pages.get(id).unwrap().id(), id);
        }
    }

    #[tokio::test]
    async fn test_mismatched_route_is_ignored() {
        let client = MockApiClient::new();
        let page = Page::Projects(ProjectsPage::new(Arc::new(client.clone())));
        page.refresh(&Route::event("e1")).await;
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_quit_is_handled_on_every_page() {
        let client = Arc::new(MockApiClient::new());
        let page = Page::Event(EventPage::new(client));
        assert_eq!(page.handle_key(&InputKey::Char('q')), Some(NavIntent::Exit));
    }

    #[tokio::test]
    async fn test_refresh_dispatches_route_params() {
        let client = MockApiClient::new();
        let page = Page::Event(EventPage::new(Arc::new(client.clone())));
        page.refresh(&Route::event("e9")).await;
        assert_eq!(client.calls(), vec![ApiCall::GetEvent("e9".to_string())]);
    }
}
