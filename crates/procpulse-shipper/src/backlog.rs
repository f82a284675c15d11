//! Bounded FIFO backlog between report production and network shipping.
//!
//! The backlog decouples the sampling cadence from collector availability:
//! when the collector is slow or down, up to `capacity` serialized reports
//! are retained and the producer blocks on the next push (backpressure,
//! never dropping). Order is preserved end to end; one producer, one
//! consumer.

use tokio::sync::mpsc;

/// Default backlog depth, in whole reports.
pub const DEFAULT_CAPACITY: usize = 20;

/// The consumer half was dropped; no further payloads can be shipped.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("backlog: consumer side closed")]
pub struct BacklogClosed;

/// Producer half of the backlog.
pub struct BacklogSender {
    tx: mpsc::Sender<String>,
}

impl BacklogSender {
    /// Enqueues one serialized report, waiting while the backlog is full.
    pub async fn push(&self, payload: String) -> Result<(), BacklogClosed> {
        self.tx.send(payload).await.map_err(|_| BacklogClosed)
    }
}

/// Consumer half of the backlog.
pub struct BacklogReceiver {
    rx: mpsc::Receiver<String>,
}

impl BacklogReceiver {
    /// Dequeues the oldest payload, waiting while the backlog is empty.
    /// Returns `None` once the producer is gone and the backlog is drained.
    pub async fn pop(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Creates a backlog holding at most `capacity` payloads.
pub fn bounded(capacity: usize) -> (BacklogSender, BacklogReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (BacklogSender { tx }, BacklogReceiver { rx })
}
