//! Main TUI runner - entry point and event loop
//!
//! `run` owns the terminal for the lifetime of the dashboard. The loop
//! redraws whenever the router or the log tailer asks for it, forwards key
//! presses to the visible page and exits once the router's exit signal is
//! raised (by the quit key or by SIGINT/SIGTERM).

use std::sync::Arc;

use brigterm_api::ApiClient;
use brigterm_app::{signals, InputKey, NavIntent, Navigator, PageView, Route, Router};
use brigterm_core::prelude::*;
use crossterm::event::{Event as TermEvent, EventStream};
use futures_util::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::event::key_event_to_input;
use crate::render::{self, Chrome};
use crate::terminal;

/// Run the dashboard, starting at `initial`.
pub async fn run<C>(router: Arc<Router<C>>, initial: Route, chrome: Chrome) -> Result<()>
where
    C: ApiClient + Send + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    let result = run_loop(&mut term, router, initial, &chrome).await;

    ratatui::restore();
    result
}

async fn run_loop<B, C>(
    term: &mut Terminal<B>,
    router: Arc<Router<C>>,
    initial: Route,
    chrome: &Chrome,
) -> Result<()>
where
    B: Backend,
    C: ApiClient + Send + Sync + 'static,
{
    let (navigator, nav_handle) = Navigator::spawn(router.clone());
    signals::spawn_signal_handler(router.clone());
    navigator.navigate(initial)?;

    let redraw = router.redraw_handle();
    let mut exit_rx = router.subscribe_exit();
    let mut events = EventStream::new();

    draw(term, &router, chrome)?;

    loop {
        tokio::select! {
            changed = exit_rx.changed() => {
                if changed.is_err() || *exit_rx.borrow() {
                    break;
                }
            }
            _ = redraw.requested() => {}
            event = events.next() => match event {
                Some(Ok(TermEvent::Key(key))) => {
                    if let Some(input) = key_event_to_input(key) {
                        handle_key(&router, &navigator, &input);
                    }
                }
                Some(Ok(TermEvent::Resize(..))) => {}
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    error!("Terminal event error: {}", e);
                    router.exit();
                    break;
                }
                None => break,
            },
        }

        if router.is_exiting() {
            break;
        }
        draw(term, &router, chrome)?;
    }

    info!("Shutting down");
    nav_handle.abort();
    Ok(())
}

/// Route a key press to the visible page and act on its intent.
fn handle_key<C>(router: &Router<C>, navigator: &Navigator, key: &InputKey)
where
    C: ApiClient + Send + Sync + 'static,
{
    let intent = match router.visible_page() {
        Some(page) => page.handle_key(key),
        // Nothing shown yet: quitting still works
        None if key.is_quit() => Some(NavIntent::Exit),
        None => None,
    };

    match intent {
        Some(NavIntent::Navigate(route)) => {
            debug!("Navigating to {}", route);
            if let Err(e) = navigator.navigate(route) {
                warn!("{}", e);
            }
        }
        Some(NavIntent::Exit) => router.exit(),
        None => {}
    }
}

fn draw<B, C>(term: &mut Terminal<B>, router: &Router<C>, chrome: &Chrome) -> Result<()>
where
    B: Backend,
    C: ApiClient + Send + Sync + 'static,
{
    let page = current_view(router);
    term.draw(|frame| render::view(frame, &page, chrome))
        .map_err(|e| Error::terminal(format!("Failed to draw frame: {}", e)))?;
    Ok(())
}

/// View of the visible page, or an empty view before the first navigation.
pub fn current_view<C>(router: &Router<C>) -> PageView
where
    C: ApiClient + Send + Sync + 'static,
{
    router
        .visible_page()
        .map(|page| page.view())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use brigterm_api::test_utils::{test_project, MockApiClient};
    use brigterm_app::{build_pages, PageId, RedrawHandle};
    use std::time::Duration;

    fn router() -> Arc<Router<MockApiClient>> {
        let client = MockApiClient::new().with_projects(vec![test_project("demo")]);
        let redraw = RedrawHandle::new();
        let pages = build_pages(Arc::new(client), redraw.clone(), 20).unwrap();
        Arc::new(Router::new(pages, Duration::from_secs(2), redraw))
    }

    #[tokio::test]
    async fn test_quit_before_first_page() {
        let router = router();
        let (navigator, _handle) = Navigator::spawn(router.clone());

        handle_key(&router, &navigator, &InputKey::Char('x'));
        assert!(!router.is_exiting());
        handle_key(&router, &navigator, &InputKey::Char('q'));
        assert!(router.is_exiting());
    }

    #[tokio::test]
    async fn test_enter_opens_selected_project() {
        let router = router();
        let (navigator, _handle) = Navigator::spawn(router.clone());
        router.navigate(Route::Projects).await;

        handle_key(&router, &navigator, &InputKey::Enter);
        for _ in 0..200 {
            if router.visible() == Some(PageId::Project) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(router.visible(), Some(PageId::Project));
        assert_eq!(current_view(&router).title, "Project demo");
        router.exit();
    }

    #[tokio::test]
    async fn test_draw_renders_visible_page() {
        let router = router();
        router.navigate(Route::Projects).await;

        let mut term = TestTerminal::new();
        draw(&mut term.terminal, &router, &Chrome::default()).unwrap();
        assert!(term.buffer_contains("demo project"));
        router.exit();
    }
}
