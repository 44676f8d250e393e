//! Live log tailing.
//!
//! A [`LogTailer`] owns at most one activation: a task that opens a
//! following log stream and merges its entry source and error source into a
//! [`DisplayBuffer`]. The two sources close independently; the activation
//! ends when both are closed or when it is cancelled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use brigterm_api::{ApiClient, LogStream};
use brigterm_core::prelude::*;
use brigterm_core::LogsSelector;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::redraw::RedrawHandle;
use crate::shutdown::cancelled;

/// Which source of a log stream has closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedSource {
    Data,
    Errors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTailState {
    #[default]
    Idle,
    Streaming,
    HalfClosed(ClosedSource),
    Closed,
}

impl LogTailState {
    fn after_close(data_closed: bool, errors_closed: bool) -> Self {
        match (data_closed, errors_closed) {
            (true, true) => LogTailState::Closed,
            (true, false) => LogTailState::HalfClosed(ClosedSource::Data),
            (false, true) => LogTailState::HalfClosed(ClosedSource::Errors),
            (false, false) => LogTailState::Streaming,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogTailState::Idle => "connecting",
            LogTailState::Streaming => "streaming",
            LogTailState::HalfClosed(ClosedSource::Data) => "log ended, awaiting errors",
            LogTailState::HalfClosed(ClosedSource::Errors) => "streaming (error channel closed)",
            LogTailState::Closed => "closed",
        }
    }
}

/// Accumulated log text, newest at the end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    text: String,
    lines: usize,
}

impl DisplayBuffer {
    pub fn append(&mut self, message: &str) {
        self.text.push_str(message);
        self.text.push('\n');
        self.lines += 1;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.lines = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }
}

/// The `(event, job)` pair an activation streams
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogScope {
    pub event_id: String,
    /// Worker logs when `None`
    pub job_name: Option<String>,
}

impl LogScope {
    pub fn new(event_id: impl Into<String>, job_name: Option<String>) -> Self {
        Self {
            event_id: event_id.into(),
            job_name,
        }
    }

    fn selector(&self) -> LogsSelector {
        match &self.job_name {
            Some(job) => LogsSelector::job(job.clone()),
            None => LogsSelector::worker(),
        }
    }
}

/// Point-in-time copy of the tailer output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSnapshot {
    pub buffer: DisplayBuffer,
    pub state: LogTailState,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct TailOutput {
    buffer: DisplayBuffer,
    state: LogTailState,
    last_error: Option<String>,
    /// The stream never opened; the activation is worth retrying
    open_failed: bool,
}

/// Output shared between the activation task (sole writer) and readers
#[derive(Debug, Clone, Default)]
struct SharedOutput(Arc<Mutex<TailOutput>>);

impl SharedOutput {
    fn lock(&self) -> MutexGuard<'_, TailOutput> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LogTailState) {
        self.lock().state = state;
    }
}

struct Activation {
    scope: LogScope,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Activation {
    async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("Log activation for {:?} ended abnormally: {}", self.scope, e);
        }
    }
}

pub struct LogTailer<C> {
    client: Arc<C>,
    redraw: RedrawHandle,
    output: SharedOutput,
    activation: tokio::sync::Mutex<Option<Activation>>,
}

impl<C> std::fmt::Debug for LogTailer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTailer")
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl<C> LogTailer<C>
where
    C: ApiClient + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>, redraw: RedrawHandle) -> Self {
        Self {
            client,
            redraw,
            output: SharedOutput::default(),
            activation: tokio::sync::Mutex::new(None),
        }
    }

    /// Start streaming `scope`, cancelling any prior activation and clearing
    /// the buffer.
    pub async fn activate(&self, scope: LogScope) {
        let mut slot = self.activation.lock().await;
        self.start(&mut slot, scope).await;
    }

    /// Start streaming `scope` unless an activation for it already exists.
    ///
    /// An activation whose stream has ended still counts, so its buffer is
    /// kept. One whose stream failed to open is replaced. Returns whether a
    /// new activation was started.
    pub async fn ensure_active(&self, scope: LogScope) -> bool {
        let mut slot = self.activation.lock().await;
        let open_failed = self.output.lock().open_failed;
        if !open_failed && slot.as_ref().is_some_and(|a| a.scope == scope) {
            return false;
        }
        self.start(&mut slot, scope).await;
        true
    }

    /// Cancel the current activation, if any, and wait for it to stop.
    pub async fn deactivate(&self) {
        let previous = self.activation.lock().await.take();
        if let Some(previous) = previous {
            debug!("Deactivating log tail for {:?}", previous.scope);
            previous.stop().await;
        }
    }

    pub async fn current_scope(&self) -> Option<LogScope> {
        self.activation.lock().await.as_ref().map(|a| a.scope.clone())
    }

    pub fn snapshot(&self) -> LogSnapshot {
        let output = self.output.lock();
        LogSnapshot {
            buffer: output.buffer.clone(),
            state: output.state,
            last_error: output.last_error.clone(),
        }
    }

    async fn start(&self, slot: &mut Option<Activation>, scope: LogScope) {
        if let Some(previous) = slot.take() {
            previous.stop().await;
        }

        {
            let mut output = self.output.lock();
            output.buffer.clear();
            output.state = LogTailState::Idle;
            output.last_error = None;
            output.open_failed = false;
        }
        self.redraw.request();

        debug!("Activating log tail for {:?}", scope);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_activation(
            self.client.clone(),
            scope.clone(),
            self.output.clone(),
            self.redraw.clone(),
            shutdown_rx,
        ));
        *slot = Some(Activation {
            scope,
            shutdown_tx,
            handle,
        });
    }
}

async fn run_activation<C>(
    client: Arc<C>,
    scope: LogScope,
    output: SharedOutput,
    redraw: RedrawHandle,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    C: ApiClient + Send + Sync + 'static,
{
    let selector = scope.selector();
    let opened = tokio::select! {
        biased;
        _ = cancelled(&mut shutdown_rx) => {
            output.set_state(LogTailState::Closed);
            return;
        }
        opened = client.stream_logs(&scope.event_id, &selector) => opened,
    };

    match opened {
        Ok(stream) => {
            output.set_state(LogTailState::Streaming);
            redraw.request();
            merge(stream, shutdown_rx, &output, &redraw).await;
            debug!("Log tail for {:?} finished", scope);
        }
        Err(e) => {
            warn!("Failed to open log stream for {:?}: {}", scope, e);
            let mut out = output.lock();
            out.last_error = Some(e.to_string());
            out.state = LogTailState::Closed;
            out.open_failed = true;
        }
    }
    redraw.request();
}

/// Merge both sources into the buffer until both close or cancellation.
async fn merge(
    stream: LogStream,
    mut shutdown_rx: watch::Receiver<bool>,
    output: &SharedOutput,
    redraw: &RedrawHandle,
) {
    let LogStream {
        mut entries,
        mut errors,
    } = stream;
    let mut data_closed = false;
    let mut errors_closed = false;

    loop {
        tokio::select! {
            biased;
            _ = cancelled(&mut shutdown_rx) => {
                output.set_state(LogTailState::Closed);
                return;
            }
            entry = entries.recv(), if !data_closed => match entry {
                Some(entry) => {
                    output.lock().buffer.append(&entry.message);
                    redraw.request();
                }
                None => {
                    data_closed = true;
                    output.set_state(LogTailState::after_close(data_closed, errors_closed));
                    redraw.request();
                }
            },
            err = errors.recv(), if !errors_closed => match err {
                Some(e) => {
                    warn!("Log stream error: {}", e);
                    output.lock().last_error = Some(e.to_string());
                    redraw.request();
                }
                None => {
                    errors_closed = true;
                    output.set_state(LogTailState::after_close(data_closed, errors_closed));
                }
            },
        }

        if data_closed && errors_closed {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigterm_api::test_utils::{ApiCall, MockApiClient};
    use brigterm_core::LogEntry;
    use std::time::Duration;

    fn tailer(client: &MockApiClient) -> LogTailer<MockApiClient> {
        LogTailer::new(Arc::new(client.clone()), RedrawHandle::new())
    }

    fn scope(job: Option<&str>) -> LogScope {
        LogScope::new("e1", job.map(str::to_string))
    }

    async fn wait_for(
        tailer: &LogTailer<MockApiClient>,
        predicate: impl Fn(&LogSnapshot) -> bool,
    ) -> LogSnapshot {
        for _ in 0..200 {
            let snapshot = tailer.snapshot();
            if predicate(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached: {:?}", tailer.snapshot());
    }

    #[test]
    fn test_display_buffer_appends_lines() {
        let mut buffer = DisplayBuffer::default();
        buffer.append("one");
        buffer.append("two");
        assert_eq!(buffer.text(), "one\ntwo\n");
        assert_eq!(buffer.line_count(), 2);
        buffer.clear();
        assert_eq!(buffer, DisplayBuffer::default());
    }

    #[tokio::test]
    async fn test_entries_are_appended_in_order() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);

        tailer.activate(scope(Some("build"))).await;
        feed.entries.send(LogEntry::new("a")).await.unwrap();
        feed.entries.send(LogEntry::new("b")).await.unwrap();

        let snapshot = wait_for(&tailer, |s| s.buffer.line_count() == 2).await;
        assert_eq!(snapshot.buffer.text(), "a\nb\n");
        assert_eq!(snapshot.state, LogTailState::Streaming);
        assert_eq!(
            client.calls(),
            vec![ApiCall::StreamLogs {
                event_id: "e1".to_string(),
                job: Some("build".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_three_entries_then_both_sources_close() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);
        tailer.activate(scope(None)).await;

        drop(feed.errors);
        for message in ["one", "two", "three"] {
            feed.entries.send(LogEntry::new(message)).await.unwrap();
        }
        drop(feed.entries);

        let snapshot = wait_for(&tailer, |s| s.state == LogTailState::Closed).await;
        assert_eq!(snapshot.buffer.text(), "one\ntwo\nthree\n");
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn test_cancel_after_two_entries_stops_appending() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);
        tailer.activate(scope(None)).await;

        feed.entries.send(LogEntry::new("one")).await.unwrap();
        feed.entries.send(LogEntry::new("two")).await.unwrap();
        wait_for(&tailer, |s| s.buffer.line_count() == 2).await;

        tailer.deactivate().await;
        assert!(feed.entries.send(LogEntry::new("three")).await.is_err());
        tokio::time::sleep(Duration::from_millis(20)).await;

        let snapshot = tailer.snapshot();
        assert_eq!(snapshot.buffer.text(), "one\ntwo\n");
        assert_eq!(snapshot.state, LogTailState::Closed);
    }

    #[tokio::test]
    async fn test_error_is_recorded_and_streaming_continues() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);
        tailer.activate(scope(None)).await;

        feed.entries.send(LogEntry::new("before")).await.unwrap();
        wait_for(&tailer, |s| s.buffer.line_count() == 1).await;
        feed.errors.send(Error::log_stream("hiccup")).await.unwrap();
        wait_for(&tailer, |s| s.last_error.is_some()).await;
        feed.entries.send(LogEntry::new("after")).await.unwrap();

        let snapshot = wait_for(&tailer, |s| s.buffer.line_count() == 2).await;
        assert_eq!(snapshot.buffer.text(), "before\nafter\n");
        assert!(snapshot.last_error.unwrap().contains("hiccup"));
    }

    #[tokio::test]
    async fn test_half_close_then_close() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);
        tailer.activate(scope(None)).await;

        feed.entries.send(LogEntry::new("x")).await.unwrap();
        drop(feed.entries);
        wait_for(&tailer, |s| {
            s.state == LogTailState::HalfClosed(ClosedSource::Data)
        })
        .await;

        // Errors are still delivered while half-closed
        feed.errors.send(Error::log_stream("late")).await.unwrap();
        wait_for(&tailer, |s| s.last_error.is_some()).await;

        drop(feed.errors);
        let snapshot = wait_for(&tailer, |s| s.state == LogTailState::Closed).await;
        assert_eq!(snapshot.buffer.text(), "x\n");
    }

    #[tokio::test]
    async fn test_error_source_closing_first_keeps_streaming_entries() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);
        tailer.activate(scope(None)).await;

        drop(feed.errors);
        wait_for(&tailer, |s| {
            s.state == LogTailState::HalfClosed(ClosedSource::Errors)
        })
        .await;
        feed.entries.send(LogEntry::new("still here")).await.unwrap();
        wait_for(&tailer, |s| s.buffer.line_count() == 1).await;
    }

    #[tokio::test]
    async fn test_reactivation_clears_buffer() {
        let client = MockApiClient::new();
        let first = client.log_feed();
        let second = client.log_feed();
        let tailer = tailer(&client);

        tailer.activate(scope(Some("build"))).await;
        first.entries.send(LogEntry::new("old")).await.unwrap();
        wait_for(&tailer, |s| s.buffer.line_count() == 1).await;

        tailer.activate(scope(Some("test"))).await;
        assert_eq!(tailer.snapshot().buffer.line_count(), 0);
        assert!(first.entries.is_closed());

        second.entries.send(LogEntry::new("new")).await.unwrap();
        let snapshot = wait_for(&tailer, |s| s.buffer.line_count() == 1).await;
        assert_eq!(snapshot.buffer.text(), "new\n");
    }

    #[tokio::test]
    async fn test_cancellation_closes_and_stops_consuming() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);
        tailer.activate(scope(None)).await;
        wait_for(&tailer, |s| s.state == LogTailState::Streaming).await;

        tailer.deactivate().await;
        assert_eq!(tailer.snapshot().state, LogTailState::Closed);
        assert!(feed.entries.is_closed());
        assert!(tailer.current_scope().await.is_none());
    }

    #[tokio::test]
    async fn test_ensure_active_keeps_existing_activation() {
        let client = MockApiClient::new();
        let feed = client.log_feed();
        let tailer = tailer(&client);

        assert!(tailer.ensure_active(scope(None)).await);
        feed.entries.send(LogEntry::new("kept")).await.unwrap();
        drop(feed);
        wait_for(&tailer, |s| s.state == LogTailState::Closed).await;

        assert!(!tailer.ensure_active(scope(None)).await);
        assert_eq!(tailer.snapshot().buffer.text(), "kept\n");
        assert_eq!(
            client.count_calls(|c| matches!(c, ApiCall::StreamLogs { .. })),
            1
        );
    }

    #[tokio::test]
    async fn test_open_failure_records_error_and_closes() {
        let client = MockApiClient::new();
        client.set_failure(Some("no such event"));
        let tailer = tailer(&client);

        tailer.activate(scope(None)).await;
        let snapshot = wait_for(&tailer, |s| s.state == LogTailState::Closed).await;
        assert!(snapshot.last_error.unwrap().contains("no such event"));
        assert!(snapshot.buffer.text().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_active_retries_after_open_failure() {
        let client = MockApiClient::new();
        client.set_failure(Some("server unavailable"));
        let tailer = tailer(&client);

        assert!(tailer.ensure_active(scope(Some("build"))).await);
        wait_for(&tailer, |s| s.last_error.is_some()).await;

        client.set_failure(None);
        let feed = client.log_feed();
        assert!(tailer.ensure_active(scope(Some("build"))).await);
        feed.entries.send(LogEntry::new("recovered")).await.unwrap();

        let snapshot = wait_for(&tailer, |s| s.buffer.line_count() == 1).await;
        assert_eq!(snapshot.state, LogTailState::Streaming);
        assert!(snapshot.last_error.is_none());
        assert_eq!(
            client.count_calls(|c| matches!(c, ApiCall::StreamLogs { .. })),
            2
        );

        // A healthy activation is kept again
        assert!(!tailer.ensure_active(scope(Some("build"))).await);
    }
}
