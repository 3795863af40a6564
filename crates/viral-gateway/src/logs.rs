//! Consumer for the backend's `/ws/logs` push channel.
//!
//! The stream is independent of the job state machine: it delivers
//! operational log lines while agents work. The client keeps the last N
//! frames in a ring buffer and fans new frames out on a broadcast channel.
//! An unexpected close triggers a reconnect after a fixed delay; a
//! deliberate [`LogStreamHandle::close`] suppresses any further reconnect.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::GatewayError;

/// One log line pushed by the backend.
///
/// `timestamp` stays a string: like `phase`, it is a backend-controlled
/// display hint with no format contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFrame {
    pub level: String,
    pub message: String,
    pub timestamp: String,
}

/// Raw wire frame; only `type == "log"` frames become [`LogFrame`]s.
#[derive(Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    level: Option<String>,
    message: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

fn decode_frame(text: &str) -> Option<LogFrame> {
    let frame: WireFrame = serde_json::from_str(text).ok()?;
    if frame.kind != "log" {
        return None;
    }
    Some(LogFrame {
        level: frame.level.unwrap_or_else(|| "INFO".to_string()),
        message: frame.message?,
        timestamp: frame.timestamp.unwrap_or_default(),
    })
}

/// Derives the log-stream URL from an HTTP(S) backend origin:
/// `http → ws`, `https → wss`, path fixed at `/ws/logs`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidBaseUrl`] if `base` does not parse or
/// cannot carry a WebSocket scheme.
pub fn ws_logs_url(base: &str) -> Result<String, GatewayError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| GatewayError::InvalidBaseUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|()| GatewayError::InvalidBaseUrl {
            url: base.to_owned(),
            reason: format!("cannot switch scheme to {scheme}"),
        })?;
    url.set_path("/ws/logs");
    url.set_query(None);
    Ok(url.to_string())
}

/// Fixed-capacity ring buffer of recent log frames; the oldest frame is
/// discarded once the cap is reached.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    entries: VecDeque<LogFrame>,
}

impl LogBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: LogFrame) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(frame);
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<LogFrame> {
        self.entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Connector for the backend log stream.
pub struct LogStream;

impl LogStream {
    /// Spawns the reader task and returns its handle.
    ///
    /// The task connects to `url`, decodes `{"type":"log",...}` text frames
    /// into the buffer and broadcast channel, and reconnects after
    /// `reconnect_delay` whenever the socket ends without
    /// [`LogStreamHandle::close`] having been called.
    #[must_use]
    pub fn connect(url: String, reconnect_delay: Duration, capacity: usize) -> LogStreamHandle {
        let buffer = Arc::new(Mutex::new(LogBuffer::new(capacity)));
        let (frames, _) = broadcast::channel(256);
        let shutdown = Arc::new(AtomicBool::new(false));
        let connected = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(run_stream(
            url,
            Arc::clone(&buffer),
            frames.clone(),
            Arc::clone(&shutdown),
            Arc::clone(&connected),
            reconnect_delay,
        ));

        LogStreamHandle {
            buffer,
            frames,
            shutdown,
            connected,
            task: Mutex::new(Some(task)),
        }
    }
}

/// Handle owning the log-stream reader task.
pub struct LogStreamHandle {
    buffer: Arc<Mutex<LogBuffer>>,
    frames: broadcast::Sender<LogFrame>,
    shutdown: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LogStreamHandle {
    /// The buffered recent frames, oldest first.
    #[must_use]
    pub fn recent(&self) -> Vec<LogFrame> {
        lock_unpoisoned(&self.buffer).snapshot()
    }

    /// Subscribe to frames arriving after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogFrame> {
        self.frames.subscribe()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Shuts the stream down. Synchronous and idempotent; once called, no
    /// reconnect will ever be attempted.
    pub fn close(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        if let Some(task) = lock_unpoisoned(&self.task).take() {
            task.abort();
        }
    }
}

impl Drop for LogStreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_stream(
    url: String,
    buffer: Arc<Mutex<LogBuffer>>,
    frames: broadcast::Sender<LogFrame>,
    shutdown: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
    reconnect_delay: Duration,
) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return;
        }
        match connect_async(url.as_str()).await {
            Ok((mut socket, _)) => {
                connected.store(true, Ordering::SeqCst);
                tracing::debug!(url = %url, "log stream connected");
                while let Some(message) = socket.next().await {
                    if shutdown.load(Ordering::SeqCst) {
                        return;
                    }
                    match message {
                        Ok(Message::Text(text)) => {
                            if let Some(frame) = decode_frame(text.as_str()) {
                                lock_unpoisoned(&buffer).push(frame.clone());
                                // Err just means nobody is subscribed right now.
                                let _ = frames.send(frame);
                            }
                        }
                        Ok(_) => {}
                        Err(err) => {
                            tracing::debug!(error = %err, "log stream read failed");
                            break;
                        }
                    }
                }
                connected.store(false, Ordering::SeqCst);
                tracing::debug!(url = %url, "log stream disconnected");
            }
            Err(err) => {
                tracing::debug!(error = %err, "log stream connect failed");
            }
        }
        if shutdown.load(Ordering::SeqCst) {
            return;
        }
        tokio::time::sleep(reconnect_delay).await;
    }
}
