//! # Stream Supervisor
//!
//! Owns the connection lifecycle of the relay: open the upstream stream,
//! consume messages, recover from disconnects with a bounded reconnect
//! schedule, and shut down cleanly on request. Exactly one worker runs per
//! relay instance.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::application::relay::backoff::ReconnectSchedule;
use crate::application::relay::classify::classify;
use crate::application::relay::fanout::Broadcaster;
use crate::application::relay::memory::SharedMemory;
use crate::domain::traits::{MessageStream, StreamSource};
use crate::domain::types::StreamEvent;
use crate::strings::messages;

/// Wait between polls when the stream is alive but idle.
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

pub struct StreamSupervisor {
    source: Arc<dyn StreamSource>,
    memory: SharedMemory,
    broadcaster: Arc<Broadcaster>,
    status_url_base: String,
    reconnect_seconds: Vec<u64>,
    /// The single worker slot. Held across stop+start in `restart`, so
    /// overlapping restarts cannot both launch workers.
    worker: Mutex<Option<WorkerHandle>>,
}

struct WorkerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl StreamSupervisor {
    pub fn new(
        source: Arc<dyn StreamSource>,
        memory: SharedMemory,
        broadcaster: Arc<Broadcaster>,
        status_url_base: String,
        reconnect_seconds: Vec<u64>,
    ) -> Self {
        Self {
            source,
            memory,
            broadcaster,
            status_url_base,
            reconnect_seconds,
            worker: Mutex::new(None),
        }
    }

    /// Spawn the background worker. Fails if one is already running.
    pub async fn start(&self) -> Result<()> {
        let mut slot = self.worker.lock().await;
        if slot.is_some() {
            anyhow::bail!("stream worker is already running");
        }
        *slot = Some(self.spawn_worker());
        tracing::info!("Stream worker started");
        Ok(())
    }

    /// Signal the worker to stop and wait for it to exit.
    pub async fn stop(&self) {
        let handle = self.worker.lock().await.take();
        join_worker(handle).await;
        tracing::info!("Stream worker stopped");
    }

    /// Stop the current worker (if any) and start a fresh one, as a single
    /// logical operation.
    pub async fn restart(&self) {
        let mut slot = self.worker.lock().await;
        join_worker(slot.take()).await;
        *slot = Some(self.spawn_worker());
        tracing::info!("Stream worker restarted");
    }

    pub async fn is_running(&self) -> bool {
        self.worker.lock().await.is_some()
    }

    fn spawn_worker(&self) -> WorkerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let worker = Worker {
            source: self.source.clone(),
            memory: self.memory.clone(),
            broadcaster: self.broadcaster.clone(),
            status_url_base: self.status_url_base.clone(),
            schedule: ReconnectSchedule::new(&self.reconnect_seconds),
            stop: stop_rx,
        };
        WorkerHandle {
            stop: stop_tx,
            task: tokio::spawn(worker.run()),
        }
    }
}

async fn join_worker(handle: Option<WorkerHandle>) {
    if let Some(handle) = handle {
        let _ = handle.stop.send(true);
        if let Err(e) = handle.task.await {
            tracing::error!("Stream worker task failed: {e}");
        }
    }
}

/// How one connection cycle ended.
enum CycleEnd {
    Stopped,
    Ended,
    Failed(String),
}

struct Worker {
    source: Arc<dyn StreamSource>,
    memory: SharedMemory,
    broadcaster: Arc<Broadcaster>,
    status_url_base: String,
    schedule: ReconnectSchedule,
    stop: watch::Receiver<bool>,
}

impl Worker {
    async fn run(mut self) {
        loop {
            if self.stopping() {
                return;
            }

            let end = match self.source.open().await {
                Ok(stream) => self.pump(stream).await,
                Err(e) => CycleEnd::Failed(e.to_string()),
            };

            let wait = self.schedule.current_secs();
            match end {
                CycleEnd::Stopped => return,
                CycleEnd::Ended => {
                    self.broadcaster.announce(&messages::stream_lost(wait)).await;
                }
                CycleEnd::Failed(err) => {
                    tracing::warn!("Stream cycle failed: {err}");
                    self.broadcaster
                        .announce(&messages::stream_failed(wait))
                        .await;
                    self.broadcaster
                        .announce(&messages::error_detail(&err))
                        .await;
                }
            }

            if !self.sleep(self.schedule.current()).await {
                return;
            }
            self.schedule.advance();
        }
    }

    /// Consume one open stream until it ends, fails, or stop is requested.
    /// The stop flag is re-checked after every message, so shutdown latency
    /// is bounded by one message's processing time.
    async fn pump(&mut self, mut stream: MessageStream) -> CycleEnd {
        loop {
            let next = tokio::select! {
                item = stream.next() => item,
                changed = self.stop.changed() => {
                    if changed.is_err() || self.stopping() {
                        return CycleEnd::Stopped;
                    }
                    continue;
                }
            };

            match next {
                None => return CycleEnd::Ended,
                Some(Err(e)) => return CycleEnd::Failed(e.to_string()),
                Some(Ok(msg)) => self.handle_message(&msg).await,
            }

            if self.stopping() {
                return CycleEnd::Stopped;
            }
        }
    }

    async fn handle_message(&mut self, msg: &serde_json::Value) {
        match classify(msg) {
            StreamEvent::Connected => {
                self.broadcaster.announce(messages::STREAM_LIVE).await;
                self.schedule.reset();
            }
            StreamEvent::Item(post) => {
                // State first, announcement second: a "reply to last" racing
                // this notice must already see the post.
                self.memory.lock().await.observe(&post);
                let line = messages::post_announcement(&post, &self.status_url_base);
                self.broadcaster.announce(&line).await;
            }
            StreamEvent::Empty => {
                self.sleep(IDLE_INTERVAL).await;
            }
            StreamEvent::Unrecognized => {
                tracing::debug!("Ignoring unrecognized stream message: {msg}");
            }
        }
    }

    fn stopping(&self) -> bool {
        *self.stop.borrow()
    }

    /// Sleep that wakes early when stop is requested; returns false if the
    /// worker should exit.
    async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            changed = self.stop.changed() => changed.is_ok() && !self.stopping(),
        }
    }
}
