//! `/proc/diskstats`: per-device I/O counters. All fields are cumulative
//! since boot except the in-flight count.

use std::path::Path;

use procpulse_common::types::DiskCounters;

use crate::error::{CaptureError, Result};

use super::{parse_counter, read_file};

pub(super) fn read(root: &Path) -> Result<Vec<DiskCounters>> {
    let path = root.join("diskstats");
    let content = read_file(&path)?;

    let mut disks = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        // major minor name then at least the 11 classic stat fields
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 14 {
            return Err(CaptureError::parse(
                &path,
                format!("short diskstats row '{line}'"),
            ));
        }
        let v = |i: usize| parse_counter(&path, fields[i]);
        disks.push(DiskCounters {
            name: fields[2].to_string(),
            reads_completed: v(3)?,
            reads_merged: v(4)?,
            sectors_read: v(5)?,
            writes_completed: v(7)?,
            writes_merged: v(8)?,
            sectors_written: v(9)?,
            in_flight: v(11)?,
            io_ticks: v(12)?,
            time_in_queue: v(13)?,
        });
    }
    Ok(disks)
}
