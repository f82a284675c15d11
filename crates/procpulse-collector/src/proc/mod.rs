//! Parsers for the proc filesystem.
//!
//! Every parser takes the proc root as a parameter instead of hardcoding
//! `/proc`, both for the `proc_path` config override and so tests can point
//! the source at a fixture tree.

mod diskstats;
mod process;
mod snmp;
mod sockets;
mod stat;
mod vmstat;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use procpulse_common::types::RawSnapshot;

use crate::error::{CaptureError, Result};
use crate::SnapshotSource;

/// Snapshot source backed by the Linux proc filesystem.
pub struct ProcSource {
    root: PathBuf,
}

impl ProcSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn hostname(&self) -> String {
        match fs::read_to_string(self.root.join("sys/kernel/hostname")) {
            Ok(name) => name.trim_end_matches('\n').to_string(),
            Err(_) => "unknown".to_string(),
        }
    }
}

impl SnapshotSource for ProcSource {
    fn name(&self) -> &str {
        "proc"
    }

    fn capture(&self) -> Result<RawSnapshot> {
        Ok(RawSnapshot {
            captured_at: Utc::now(),
            hostname: self.hostname(),
            kernel: stat::read(&self.root)?,
            vm: vmstat::read(&self.root)?,
            snmp: snmp::read(&self.root)?,
            tcp: sockets::read(&self.root)?,
            disks: diskstats::read(&self.root)?,
            processes: process::read(&self.root)?,
        })
    }
}

/// Reads a whole counter file, mapping I/O failures to a capture error.
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CaptureError::io(path, e))
}

/// Parses one counter field. Counters are unsigned, but a few gauges in
/// `/proc/net/snmp` (e.g. `MaxConn`) are reported as `-1`; negative values
/// are clamped to zero rather than failing the capture.
fn parse_counter(path: &Path, token: &str) -> Result<u64> {
    if let Ok(v) = token.parse::<u64>() {
        return Ok(v);
    }
    token
        .parse::<i64>()
        .map(|v| v.max(0) as u64)
        .map_err(|_| CaptureError::parse(path, format!("expected counter, got '{token}'")))
}
