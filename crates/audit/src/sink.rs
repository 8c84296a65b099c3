//! AuditSink - Queued single-writer delivery of audit records

use crate::{AuditRecord, AuditStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Queue capacity used by [`AuditSink::spawn`]
pub const DEFAULT_QUEUE_DEPTH: usize = 1024;

/// Drain budget suggested for [`AuditSink::close`]
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget front of the audit trail
///
/// Records travel over a bounded queue to a single writer task that feeds
/// the store in FIFO order, so [`record`](Self::record) never blocks message
/// processing. A full queue sheds the new record with a warning rather than
/// applying backpressure.
///
/// Clones share the same queue and writer.
#[derive(Debug, Clone)]
pub struct AuditSink {
    tx: mpsc::Sender<AuditRecord>,
    shared: Arc<SinkShared>,
}

#[derive(Debug)]
struct SinkShared {
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    queued: Arc<AtomicUsize>,
}

impl AuditSink {
    /// Spawn a sink with the default queue depth
    pub fn spawn(store: Arc<dyn AuditStore>) -> Self {
        Self::with_queue_depth(store, DEFAULT_QUEUE_DEPTH)
    }

    /// Spawn a sink with an explicit queue depth (clamped to at least 1)
    pub fn with_queue_depth(store: Arc<dyn AuditStore>, depth: usize) -> Self {
        let (tx, rx) = mpsc::channel(depth.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let queued = Arc::new(AtomicUsize::new(0));
        let worker = tokio::spawn(write_loop(rx, shutdown_rx, store, queued.clone()));

        Self {
            tx,
            shared: Arc::new(SinkShared {
                shutdown: Mutex::new(Some(shutdown_tx)),
                worker: Mutex::new(Some(worker)),
                queued,
            }),
        }
    }

    /// Queue a record for delivery; never blocks
    pub fn record(&self, record: AuditRecord) {
        // Counted before the send so the writer's decrement never runs first
        self.shared.queued.fetch_add(1, Ordering::Relaxed);
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(record)) => {
                self.shared.queued.fetch_sub(1, Ordering::Relaxed);
                warn!(actor_id = %record.actor_id, "audit queue full, record dropped");
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                self.shared.queued.fetch_sub(1, Ordering::Relaxed);
                warn!(actor_id = %record.actor_id, "audit sink closed, record dropped");
            }
        }
    }

    /// Records accepted but not yet written to the store
    pub fn queue_depth(&self) -> usize {
        self.shared.queued.load(Ordering::Relaxed)
    }

    /// Stop accepting records, drain the queue, and wait for the writer
    ///
    /// Records still queued when `drain_timeout` expires are lost. Only the
    /// first caller drives the drain; later calls return immediately.
    pub async fn close(&self, drain_timeout: Duration) {
        if let Some(tx) = take_slot(&self.shared.shutdown) {
            // Send fails only if the writer already stopped on its own
            let _ = tx.send(());
        }

        let Some(worker) = take_slot(&self.shared.worker) else {
            return;
        };

        let abort = worker.abort_handle();
        match tokio::time::timeout(drain_timeout, worker).await {
            Ok(Ok(())) => info!("audit sink drained"),
            Ok(Err(e)) => warn!(error = %e, "audit writer task failed"),
            Err(_) => {
                abort.abort();
                let dropped = self.shared.queued.load(Ordering::Relaxed);
                warn!(dropped, ?drain_timeout, "audit sink drain timed out, queued records lost");
            }
        }
    }
}

fn take_slot<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

async fn write_loop(
    mut rx: mpsc::Receiver<AuditRecord>,
    mut shutdown: oneshot::Receiver<()>,
    store: Arc<dyn AuditStore>,
    queued: Arc<AtomicUsize>,
) {
    let mut draining = false;
    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(record) => {
                    if let Err(e) = store.insert(record).await {
                        warn!(error = %e, "audit insert failed");
                    }
                    queued.fetch_sub(1, Ordering::Relaxed);
                }
                None => break,
            },
            // Also fires when the last sink clone is dropped without close
            _ = &mut shutdown, if !draining => {
                rx.close();
                draining = true;
            }
        }
    }
    debug!("audit writer stopped");
}
