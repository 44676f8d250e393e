//! Redraw requests from background tasks to the UI loop

use std::sync::Arc;

use tokio::sync::Notify;

/// Cloneable handle used to ask the UI task for a redraw.
///
/// Requests coalesce: many calls before the UI wakes produce one redraw.
#[derive(Debug, Clone, Default)]
pub struct RedrawHandle {
    notify: Arc<Notify>,
}

impl RedrawHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.notify.notify_one();
    }

    /// Wait for the next redraw request
    pub async fn requested(&self) {
        self.notify.notified().await;
    }
}
