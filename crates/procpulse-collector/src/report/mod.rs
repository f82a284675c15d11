//! Metric derivation: turns one snapshot pair into a [`MetricReport`].
//!
//! Every rate in the report is a plain delta between the current and
//! previous value of a monotonic counter, every percentage a ratio of two
//! such deltas. All families are computed against the same immutable
//! [`SamplePair`], once per sampling cycle.

mod basic;
pub mod delta;
mod disks;
mod network;
mod processes;
mod vmstat;

use procpulse_common::report::MetricReport;

use crate::store::SamplePair;

/// Builds the full report for one cycle.
pub fn build(pair: &SamplePair) -> MetricReport {
    let previous = pair.previous.as_ref();
    let current = pair.current.as_ref();
    MetricReport {
        kind: MetricReport::KIND.to_string(),
        hostname: current.hostname.clone(),
        basic: basic::build(previous, current),
        vmstat: vmstat::build(previous, current),
        network: network::build(previous, current),
        processes: processes::build(previous, current),
        disks: disks::build(previous, current),
    }
}
