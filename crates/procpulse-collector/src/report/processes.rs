use procpulse_common::report::ProcessReport;
use procpulse_common::types::{ProcessCounters, RawSnapshot};

use super::delta::{cap_to_i64, component_percent, delta};

pub(super) fn build(previous: &RawSnapshot, current: &RawSnapshot) -> Vec<ProcessReport> {
    // Process CPU usage is measured against the host-wide jiffy delta over
    // the same interval.
    let total_jiffies = delta(
        previous.kernel.cpu_all.total(),
        current.kernel.cpu_all.total(),
    );

    let mut reports = Vec::with_capacity(current.processes.len());
    for process in &current.processes {
        // Started after the previous snapshot (or a recycled pid): no
        // counters to difference against, skip this cycle.
        let Some(prev) = previous.processes.iter().find(|p| p.pid == process.pid) else {
            continue;
        };
        reports.push(build_one(prev, process, total_jiffies));
    }
    reports
}

fn build_one(prev: &ProcessCounters, curr: &ProcessCounters, total_jiffies: u64) -> ProcessReport {
    ProcessReport {
        cmdline: curr.cmdline.clone(),
        pid: curr.pid,
        state: curr.state.clone(),
        mem_virtual_size: curr.vm_size_pages,
        mem_rss_size: curr.rss_pages,
        mem_lock_size: curr.locked_kb,
        mem_swap_size: curr.swap_kb,
        threads: curr.threads,
        fd_used: curr.fd_size,
        sig_ignored: cap_to_i64(delta(prev.sig_ignored, curr.sig_ignored)),
        sig_caught: cap_to_i64(delta(prev.sig_caught, curr.sig_caught)),
        voluntary_contextswitches: cap_to_i64(delta(
            prev.voluntary_ctxt_switches,
            curr.voluntary_ctxt_switches,
        )),
        nonvoluntary_contextswitches: cap_to_i64(delta(
            prev.nonvoluntary_ctxt_switches,
            curr.nonvoluntary_ctxt_switches,
        )),
        io_read_bytes: delta(prev.io_read_bytes, curr.io_read_bytes),
        io_write_bytes: delta(prev.io_write_bytes, curr.io_write_bytes),
        user_cpu_usage: component_percent(delta(prev.utime, curr.utime), total_jiffies),
        system_cpu_usage: component_percent(delta(prev.stime, curr.stime), total_jiffies),
    }
}
