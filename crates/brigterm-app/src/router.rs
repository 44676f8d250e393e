//! Page navigation with a single-flight auto-refresh session.
//!
//! Every navigation cancels the running refresh session, switches the
//! visible page, refreshes it once before returning and then starts a new
//! periodic session for the same route. The cancel-then-create sequence runs
//! under one async mutex, so at most one session is ever alive.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use brigterm_api::ApiClient;
use brigterm_core::prelude::*;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::page_set::PageSet;
use crate::pages::Page;
use crate::redraw::RedrawHandle;
use crate::route::{PageId, Route};
use crate::shutdown::cancelled;

/// The one active periodic refresh task
struct RefreshSession {
    route: Route,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshSession {
    /// Signal the task and wait for it to leave. The task races every wait
    /// against the signal, so an in-flight refresh is dropped, not awaited.
    async fn cancel(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("Refresh session for {} ended abnormally: {}", self.route, e);
        }
    }
}

/// Decrements the live-session counter when the session task ends
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Router<C> {
    pages: Arc<PageSet<Page<C>>>,
    session: tokio::sync::Mutex<Option<RefreshSession>>,
    refresh_interval: Duration,
    redraw: RedrawHandle,
    exit_tx: watch::Sender<bool>,
    live_sessions: Arc<AtomicUsize>,
}

impl<C> std::fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("refresh_interval", &self.refresh_interval)
            .field("live_sessions", &self.live_sessions.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<C> Router<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(pages: PageSet<Page<C>>, refresh_interval: Duration, redraw: RedrawHandle) -> Self {
        let (exit_tx, _) = watch::channel(false);
        Self {
            pages: Arc::new(pages),
            session: tokio::sync::Mutex::new(None),
            refresh_interval,
            redraw,
            exit_tx,
            live_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Show `route`'s page, refresh it once and keep refreshing it until the
    /// next navigation.
    pub async fn navigate(&self, route: Route) {
        let mut session = self.session.lock().await;

        if let Some(prior) = session.take() {
            trace!("Cancelling refresh session for {}", prior.route);
            prior.cancel().await;
        }

        if let Some(previous) = self.pages.visible_page() {
            previous.on_hide().await;
        }

        let id = route.page_id();
        let Some(page) = self.pages.get(id) else {
            warn!("No page registered for {}", route);
            return;
        };
        self.pages.show(id);
        debug!("Navigating to {}", route);

        page.refresh(&route).await;
        self.redraw.request();

        *session = Some(self.spawn_session(page, route));
    }

    fn spawn_session(&self, page: Arc<Page<C>>, route: Route) -> RefreshSession {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let guard = LiveGuard::new(self.live_sessions.clone());
        let redraw = self.redraw.clone();
        let period = self.refresh_interval;
        let task_route = route.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled(&mut shutdown_rx) => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            biased;
                            _ = cancelled(&mut shutdown_rx) => break,
                            _ = page.refresh(&task_route) => redraw.request(),
                        }
                    }
                }
            }
            trace!("Refresh session for {} stopped", task_route);
        });

        RefreshSession {
            route,
            shutdown_tx,
            handle,
        }
    }

    /// Ask the UI loop to shut the dashboard down
    pub fn exit(&self) {
        info!("Exit requested");
        self.exit_tx.send_replace(true);
    }

    pub fn subscribe_exit(&self) -> watch::Receiver<bool> {
        self.exit_tx.subscribe()
    }

    pub fn is_exiting(&self) -> bool {
        *self.exit_tx.borrow()
    }

    /// Number of refresh session tasks currently alive
    pub fn live_sessions(&self) -> usize {
        self.live_sessions.load(Ordering::SeqCst)
    }

    pub fn pages(&self) -> &PageSet<Page<C>> {
        &self.pages
    }

    pub fn visible(&self) -> Option<PageId> {
        self.pages.visible()
    }

    pub fn visible_page(&self) -> Option<Arc<Page<C>>> {
        self.pages.visible_page()
    }

    /// Route of the running refresh session
    pub async fn current_route(&self) -> Option<Route> {
        self.session.lock().await.as_ref().map(|s| s.route.clone())
    }

    pub fn redraw_handle(&self) -> RedrawHandle {
        self.redraw.clone()
    }
}

/// Queue in front of [`Router::navigate`].
///
/// The UI loop submits routes without waiting for the first refresh. One
/// consumer task applies them in submission order; routes that pile up while
/// a navigation is running collapse to the most recent one.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    pub fn spawn<C>(router: Arc<Router<C>>) -> (Navigator, JoinHandle<()>)
    where
        C: ApiClient + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Route>();
        let mut exit_rx = router.subscribe_exit();

        let handle = tokio::spawn(async move {
            loop {
                let mut route = tokio::select! {
                    biased;
                    _ = cancelled(&mut exit_rx) => break,
                    route = rx.recv() => match route {
                        Some(route) => route,
                        None => break,
                    },
                };
                while let Ok(newer) = rx.try_recv() {
                    trace!("Skipping navigation to {} in favour of {}", route, newer);
                    route = newer;
                }
                router.navigate(route).await;
            }
            debug!("Navigator stopped");
        });

        (Navigator { tx }, handle)
    }

    pub fn navigate(&self, route: Route) -> Result<()> {
        self.tx
            .send(route)
            .map_err(|e| Error::channel_send(format!("navigation to {} dropped", e.0)))
    }
}
