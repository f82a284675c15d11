//! Double-buffered snapshot store shared between the sampler task (writer)
//! and the derive loop (reader).
//!
//! The store holds exactly two snapshots, previous and current. A reader
//! either sees the fully published pair or the prior fully published pair,
//! never a mix. Derivation is gated until two snapshots have ever been
//! published; after that one-time transition [`SampleStore::read_pair`]
//! never waits again.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use procpulse_common::types::RawSnapshot;
use tokio::sync::{Notify, RwLock};

/// A consistent (previous, current) snapshot pair.
///
/// Both snapshots are immutable; the `Arc`s stay valid for the whole
/// derivation pass regardless of concurrent publishes.
#[derive(Debug, Clone)]
pub struct SamplePair {
    pub previous: Arc<RawSnapshot>,
    pub current: Arc<RawSnapshot>,
}

#[derive(Default)]
struct Slots {
    previous: Option<Arc<RawSnapshot>>,
    current: Option<Arc<RawSnapshot>>,
}

/// Shared sample store. Constructed once at startup and passed by `Arc` to
/// the sampler and derive tasks; no other mutable state is shared between
/// them.
#[derive(Default)]
pub struct SampleStore {
    slots: RwLock<Slots>,
    ready: AtomicBool,
    gate: Notify,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a freshly captured snapshot: the old current snapshot is
    /// demoted to previous and the previous-previous one is dropped.
    ///
    /// On the one-time transition from one snapshot ever published to two,
    /// all gate waiters are woken. The wake is level-triggered: late readers
    /// observe the ready flag and never park.
    pub async fn publish(&self, snapshot: RawSnapshot) {
        let became_ready = {
            let mut slots = self.slots.write().await;
            slots.previous = slots.current.take();
            slots.current = Some(Arc::new(snapshot));
            slots.previous.is_some() && !self.ready.swap(true, Ordering::AcqRel)
        };
        if became_ready {
            self.gate.notify_waiters();
        }
    }

    /// True once `publish` has been called at least twice.
    pub fn has_pair(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Returns the current snapshot pair, waiting for the warm-up period to
    /// end if fewer than two snapshots exist. After the first return this
    /// only ever takes the shared lock.
    pub async fn read_pair(&self) -> SamplePair {
        loop {
            // Register with the gate before checking the slots, otherwise a
            // publish between the check and the await would be missed.
            let mut notified = pin!(self.gate.notified());
            notified.as_mut().enable();
            {
                let slots = self.slots.read().await;
                if let (Some(previous), Some(current)) = (&slots.previous, &slots.current) {
                    return SamplePair {
                        previous: Arc::clone(previous),
                        current: Arc::clone(current),
                    };
                }
            }
            notified.await;
        }
    }
}
