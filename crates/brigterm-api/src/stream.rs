//! Log stream plumbing: two independently-closing sources fed by one reader task.

use std::fmt::Display;

use brigterm_core::prelude::*;
use brigterm_core::LogEntry;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;

/// Buffer size of each log source.
pub const LOG_CHANNEL_CAPACITY: usize = 256;

/// The two sources of a streaming log call.
///
/// Each source closes on its own; a consumer must treat the stream as
/// finished only once both report closure.
#[derive(Debug)]
pub struct LogStream {
    pub entries: mpsc::Receiver<LogEntry>,
    pub errors: mpsc::Receiver<Error>,
}

impl LogStream {
    /// Create a stream together with the sending halves that feed it.
    pub fn channel() -> (mpsc::Sender<LogEntry>, mpsc::Sender<Error>, LogStream) {
        let (entries_tx, entries) = mpsc::channel(LOG_CHANNEL_CAPACITY);
        let (errors_tx, errors) = mpsc::channel(LOG_CHANNEL_CAPACITY);
        (entries_tx, errors_tx, LogStream { entries, errors })
    }

    /// A stream whose sources are both already closed.
    pub fn closed() -> LogStream {
        let (_, _, stream) = Self::channel();
        stream
    }
}

/// Splits a byte stream into newline-terminated records.
#[derive(Debug, Default)]
pub(crate) struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    /// Feed a chunk and return every record completed by it.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if !line.iter().all(u8::is_ascii_whitespace) {
                lines.push(line);
            }
        }
        lines
    }

    /// Flush the unterminated tail at end of stream.
    pub(crate) fn finish(self) -> Option<Vec<u8>> {
        if self.pending.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(self.pending)
        }
    }
}

/// Spawn the task that decodes a newline-delimited JSON body into a [`LogStream`].
///
/// Undecodable records and transport errors are sent on the error source.
/// Both sources close when the body ends. The task stops, dropping the
/// body, once the entry source's receiver is dropped, even while the body
/// is idle.
pub(crate) fn spawn_log_reader<S, B, E>(body: S) -> LogStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let (entries_tx, errors_tx, stream) = LogStream::channel();

    tokio::spawn(async move {
        let mut body = Box::pin(body);
        let mut decoder = LineDecoder::default();

        loop {
            // A quiet follow stream may never yield again; stop as soon as
            // the consumer is gone.
            let chunk = tokio::select! {
                biased;
                _ = entries_tx.closed() => {
                    debug!("Log stream consumer went away, stopping reader");
                    return;
                }
                chunk = body.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            match chunk {
                Ok(bytes) => {
                    for line in decoder.push(bytes.as_ref()) {
                        if !forward_record(&line, &entries_tx, &errors_tx).await {
                            debug!("Log stream consumer went away, stopping reader");
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = errors_tx
                        .send(Error::log_stream(format!("reading log stream: {}", e)))
                        .await;
                    return;
                }
            }
        }

        if let Some(tail) = decoder.finish() {
            forward_record(&tail, &entries_tx, &errors_tx).await;
        }
        debug!("Log stream body ended");
    });

    stream
}

/// Decode one record and route it. Returns `false` once the entry consumer is gone.
async fn forward_record(
    line: &[u8],
    entries_tx: &mpsc::Sender<LogEntry>,
    errors_tx: &mpsc::Sender<Error>,
) -> bool {
    match serde_json::from_slice::<LogEntry>(line) {
        Ok(entry) => entries_tx.send(entry).await.is_ok(),
        Err(e) => {
            let _ = errors_tx
                .send(Error::log_stream(format!("undecodable log record: {}", e)))
                .await;
            true
        }
    }
}
