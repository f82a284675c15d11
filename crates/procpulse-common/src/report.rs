//! Outgoing report payload.
//!
//! These structs define the JSON document shipped to the collector once per
//! sampling cycle. Field names are part of the wire contract consumed by the
//! downstream pipeline and must not be renamed.

use serde::{Deserialize, Serialize};

/// Per-core (or aggregate) CPU report entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorReport {
    pub cpu: String,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub iowait: u64,
    #[serde(rename = "percentageUtil")]
    pub percentage_util: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicReport {
    pub processors: Vec<ProcessorReport>,
    #[serde(rename = "allProcessors")]
    pub all_processors: ProcessorReport,
    /// Forks during the interval.
    pub processes: u64,
    #[serde(rename = "contextSwitches")]
    pub context_switches: u64,
    pub interrupts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmReport {
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkReport {
    pub ip_forwarding: u64,
    pub ip_forwarded: u64,
    pub ip_in_received: u64,
    pub ip_in_header_errors: u64,
    pub ip_in_addr_errors: u64,
    pub ip_in_discarded: u64,
    pub ip_in_unknown: u64,
    pub ip_in_delivered: u64,
    pub ip_out_requests: u64,
    pub ip_out_noroute: u64,
    pub ip_out_discarded: u64,
    pub tcp_rto_max: u64,
    pub tcp_max_connections: u64,
    pub tcp_active_opened: u64,
    pub tcp_passive_opened: u64,
    pub tcp_current_established: u64,
    pub tcp_established_reset: u64,
    pub tcp_retransmited_seg: u64,
    pub tcp_in_seg: u64,
    pub tcp_out_seg: u64,
    pub tcp_in_error: u64,
    pub tcp_out_rst: u64,
    pub total_tcp_sockets: u64,
    pub total_tcp_rx_queue: u64,
    pub total_tcp_tx_queue: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskReport {
    pub name: String,
    pub read_io: u64,
    pub write_io: u64,
    pub read_io_merged: u64,
    pub write_io_merged: u64,
    pub io_ticks: u64,
    pub queue_size: u64,
    pub time_in_queue: u64,
    /// Whole megabytes transferred during the interval.
    pub read_mbps: u64,
    pub write_mbps: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub cmdline: String,
    pub pid: u64,
    pub state: String,
    pub mem_virtual_size: u64,
    pub mem_rss_size: u64,
    pub mem_lock_size: u64,
    pub mem_swap_size: u64,
    pub threads: u64,
    pub fd_used: u64,
    pub sig_ignored: u64,
    pub sig_caught: u64,
    pub voluntary_contextswitches: u64,
    pub nonvoluntary_contextswitches: u64,
    pub io_read_bytes: u64,
    pub io_write_bytes: u64,
    pub user_cpu_usage: u64,
    pub system_cpu_usage: u64,
}

/// One full metric report for one sampling cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricReport {
    #[serde(rename = "type")]
    pub kind: String,
    pub hostname: String,
    pub basic: BasicReport,
    pub vmstat: VmReport,
    pub network: NetworkReport,
    pub processes: Vec<ProcessReport>,
    pub disks: Vec<DiskReport>,
}

impl MetricReport {
    /// Document type tag expected by the downstream pipeline.
    pub const KIND: &'static str = "osmetrics";
}
