use procpulse_common::report::DiskReport;
use procpulse_common::types::RawSnapshot;

use super::delta::delta;

/// Above the block layer the sector unit is always 512 bytes, regardless of
/// the device's physical sector size.
const SECTOR_SIZE: u64 = 512;

const MEGABYTE: u64 = 1024 * 1024;

pub(super) fn build(previous: &RawSnapshot, current: &RawSnapshot) -> Vec<DiskReport> {
    let mut reports = Vec::with_capacity(current.disks.len());
    for disk in &current.disks {
        // A device that appeared mid-interval has no previous counters to
        // difference against; it joins the report next cycle.
        let Some(prev) = previous.disks.iter().find(|p| p.name == disk.name) else {
            continue;
        };
        reports.push(DiskReport {
            name: disk.name.clone(),
            read_io: delta(prev.reads_completed, disk.reads_completed),
            write_io: delta(prev.writes_completed, disk.writes_completed),
            read_io_merged: delta(prev.reads_merged, disk.reads_merged),
            write_io_merged: delta(prev.writes_merged, disk.writes_merged),
            io_ticks: disk.io_ticks,
            queue_size: disk.in_flight,
            time_in_queue: delta(prev.time_in_queue, disk.time_in_queue),
            read_mbps: megabytes(delta(prev.sectors_read, disk.sectors_read)),
            write_mbps: megabytes(delta(prev.sectors_written, disk.sectors_written)),
        });
    }
    reports
}

/// Whole megabytes represented by a sector delta.
fn megabytes(sectors: u64) -> u64 {
    sectors.saturating_mul(SECTOR_SIZE) / MEGABYTE
}
