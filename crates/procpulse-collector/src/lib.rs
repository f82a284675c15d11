//! Snapshot capture and metric derivation for the procpulse agent.
//!
//! The [`SnapshotSource`] boundary produces one immutable [`RawSnapshot`] of
//! OS counters per sampling tick. Successive snapshots are retained pairwise
//! by the [`store::SampleStore`], and the [`report`] module turns one
//! previous/current pair into a [`MetricReport`] using plain counter deltas.

pub mod error;
pub mod proc;
pub mod report;
pub mod store;

use procpulse_common::types::RawSnapshot;

pub use error::CaptureError;
pub use proc::ProcSource;

/// A source of raw OS counter snapshots.
///
/// Implementations are called once per sampling interval. A failed capture
/// skips that cycle; the last good snapshot pair stays visible to readers.
pub trait SnapshotSource: Send + Sync {
    /// Returns the source name, used for logging.
    fn name(&self) -> &str;

    /// Captures all monitored counters at one instant.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing any counter file fails.
    fn capture(&self) -> Result<RawSnapshot, CaptureError>;
}

#[cfg(test)]
mod tests;
