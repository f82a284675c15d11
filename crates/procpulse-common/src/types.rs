use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative CPU time counters for one core (or the aggregate `cpu` line),
/// in jiffies, from `/proc/stat`. Monotonic since boot; on a very busy or
/// long-lived host they may wrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTimes {
    /// Line prefix in `/proc/stat` (`cpu0`, `cpu1`, ... or `cpu` for the
    /// aggregate row).
    pub id: String,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Total activity denominator used by the utilization percentage: the
    /// sum of every accounted state, busy and idle alike.
    pub fn total(&self) -> u64 {
        self.user
            .wrapping_add(self.nice)
            .wrapping_add(self.system)
            .wrapping_add(self.idle)
            .wrapping_add(self.iowait)
            .wrapping_add(self.irq)
            .wrapping_add(self.softirq)
            .wrapping_add(self.steal)
    }
}

/// Scheduler-level counters from `/proc/stat` (the non-cpu rows).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelCounters {
    /// Per-core rows, in file order.
    pub cpus: Vec<CpuTimes>,
    /// The aggregate `cpu` row.
    pub cpu_all: CpuTimes,
    /// `processes` row: forks since boot.
    pub processes: u64,
    /// `ctxt` row: context switches since boot.
    pub context_switches: u64,
    /// `intr` row, first field: interrupts serviced since boot.
    pub interrupts: u64,
}

/// Virtual memory counters from `/proc/vmstat`. The `pg*`/`pswp*` fields are
/// cumulative event counts, the `nr_*` fields are point-in-time page counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmCounters {
    pub pgfree: u64,
    pub pgpgin: u64,
    pub pgpgout: u64,
    pub pswpin: u64,
    pub pswpout: u64,
    pub pgfault: u64,
    pub pgmajfault: u64,
    pub nr_mlock: u64,
    pub nr_shmem: u64,
    pub nr_dirty: u64,
    pub nr_page_table_pages: u64,
    pub nr_slab: u64,
    pub nr_mapped: u64,
    pub nr_free_pages: u64,
    pub nr_anon_pages: u64,
}

/// IP and TCP counters from `/proc/net/snmp` (MIB-II, RFC 1213). All are
/// cumulative except where noted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpCounters {
    /// Gauge: 1 when the host forwards datagrams.
    pub ip_forwarding: u64,
    pub ip_forw_datagrams: u64,
    pub ip_in_receives: u64,
    pub ip_in_hdr_errors: u64,
    pub ip_in_addr_errors: u64,
    pub ip_in_discards: u64,
    pub ip_in_unknown_protos: u64,
    pub ip_in_delivers: u64,
    pub ip_out_requests: u64,
    pub ip_out_no_routes: u64,
    pub ip_out_discards: u64,
    /// Gauge.
    pub tcp_rto_max: u64,
    /// Gauge.
    pub tcp_max_conn: u64,
    pub tcp_active_opens: u64,
    pub tcp_passive_opens: u64,
    /// Gauge: connections in ESTABLISHED or CLOSE-WAIT.
    pub tcp_curr_estab: u64,
    pub tcp_estab_resets: u64,
    pub tcp_retrans_segs: u64,
    pub tcp_in_segs: u64,
    pub tcp_out_segs: u64,
    pub tcp_in_errs: u64,
    pub tcp_out_rsts: u64,
}

/// Aggregated view over every socket row in `/proc/net/tcp`: socket count
/// and the summed receive/transmit queue depths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpSocketSummary {
    pub sockets: u64,
    pub rx_queue: u64,
    pub tx_queue: u64,
}

/// One row of `/proc/diskstats`. All counters are cumulative since boot
/// except `in_flight`, which drops back toward zero as I/Os complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskCounters {
    pub name: String,
    pub reads_completed: u64,
    pub reads_merged: u64,
    pub sectors_read: u64,
    pub writes_completed: u64,
    pub writes_merged: u64,
    pub sectors_written: u64,
    /// Gauge: I/Os currently in flight.
    pub in_flight: u64,
    pub io_ticks: u64,
    pub time_in_queue: u64,
}

/// Counters for one user-level process, gathered from
/// `/proc/<pid>/{cmdline,status,statm,stat,io}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCounters {
    pub pid: u64,
    pub cmdline: String,
    pub state: String,
    /// `statm` field 1: total program size, pages.
    pub vm_size_pages: u64,
    /// `statm` field 2: resident set size, pages.
    pub rss_pages: u64,
    /// `VmLck` from `status`, kB.
    pub locked_kb: u64,
    /// `VmSwap` from `status`, kB.
    pub swap_kb: u64,
    pub threads: u64,
    /// `FDSize` from `status`.
    pub fd_size: u64,
    /// `SigIgn`/`SigCgt` bitmasks from `status`, differenced as-is by the
    /// report layer.
    pub sig_ignored: u64,
    pub sig_caught: u64,
    pub voluntary_ctxt_switches: u64,
    pub nonvoluntary_ctxt_switches: u64,
    /// `read_bytes`/`write_bytes` from `/proc/<pid>/io`.
    pub io_read_bytes: u64,
    pub io_write_bytes: u64,
    /// `utime`/`stime` from `/proc/<pid>/stat`, jiffies.
    pub utime: u64,
    pub stime: u64,
}

/// One atomic capture of every monitored OS counter. Immutable once built;
/// the sample store only ever swaps whole snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub captured_at: DateTime<Utc>,
    pub hostname: String,
    pub kernel: KernelCounters,
    pub vm: VmCounters,
    pub snmp: SnmpCounters,
    pub tcp: TcpSocketSummary,
    pub disks: Vec<DiskCounters>,
    pub processes: Vec<ProcessCounters>,
}
