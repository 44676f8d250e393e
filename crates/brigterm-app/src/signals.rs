//! OS signal handling for graceful shutdown

use std::sync::Arc;

use brigterm_api::ApiClient;
use brigterm_core::prelude::*;

use crate::router::Router;

/// Spawn a task that listens for OS signals and asks the router to exit
pub fn spawn_signal_handler<C>(router: Arc<Router<C>>)
where
    C: ApiClient + Send + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!("Signal handler error: {}", e);
            return;
        }

        info!("Shutdown signal received");
        router.exit();
    });
}

/// Wait for a termination signal
async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::terminal(format!("Failed to create SIGINT handler: {}", e)))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::terminal(format!("Failed to create SIGTERM handler: {}", e)))?;

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
        }

        Ok(())
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::terminal(format!("Failed to listen for Ctrl+C: {}", e)))?;
        info!("Received Ctrl+C");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::build_pages;
    use crate::redraw::RedrawHandle;
    use brigterm_api::test_utils::MockApiClient;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_handler_spawn() {
        let redraw = RedrawHandle::new();
        let pages = build_pages(Arc::new(MockApiClient::new()), redraw.clone(), 20).unwrap();
        let router = Arc::new(Router::new(pages, Duration::from_secs(2), redraw));

        spawn_signal_handler(router.clone());
        tokio::time::sleep(Duration::from_millis(10)).await;

        // No signal sent yet
        assert!(!router.is_exiting());
    }
}
