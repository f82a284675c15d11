use procpulse_common::report::NetworkReport;
use procpulse_common::types::RawSnapshot;

use super::delta::delta;

pub(super) fn build(previous: &RawSnapshot, current: &RawSnapshot) -> NetworkReport {
    let (prev, curr) = (&previous.snmp, &current.snmp);
    NetworkReport {
        // Gauges pass through; everything else is an interval delta.
        ip_forwarding: curr.ip_forwarding,
        ip_forwarded: delta(prev.ip_forw_datagrams, curr.ip_forw_datagrams),
        ip_in_received: delta(prev.ip_in_receives, curr.ip_in_receives),
        ip_in_header_errors: delta(prev.ip_in_hdr_errors, curr.ip_in_hdr_errors),
        ip_in_addr_errors: delta(prev.ip_in_addr_errors, curr.ip_in_addr_errors),
        ip_in_discarded: delta(prev.ip_in_discards, curr.ip_in_discards),
        ip_in_unknown: delta(prev.ip_in_unknown_protos, curr.ip_in_unknown_protos),
        ip_in_delivered: delta(prev.ip_in_delivers, curr.ip_in_delivers),
        ip_out_requests: delta(prev.ip_out_requests, curr.ip_out_requests),
        ip_out_noroute: delta(prev.ip_out_no_routes, curr.ip_out_no_routes),
        ip_out_discarded: delta(prev.ip_out_discards, curr.ip_out_discards),
        tcp_rto_max: curr.tcp_rto_max,
        tcp_max_connections: curr.tcp_max_conn,
        tcp_active_opened: delta(prev.tcp_active_opens, curr.tcp_active_opens),
        tcp_passive_opened: delta(prev.tcp_passive_opens, curr.tcp_passive_opens),
        tcp_current_established: curr.tcp_curr_estab,
        tcp_established_reset: delta(prev.tcp_estab_resets, curr.tcp_estab_resets),
        tcp_retransmited_seg: delta(prev.tcp_retrans_segs, curr.tcp_retrans_segs),
        tcp_in_seg: delta(prev.tcp_in_segs, curr.tcp_in_segs),
        tcp_out_seg: delta(prev.tcp_out_segs, curr.tcp_out_segs),
        tcp_in_error: delta(prev.tcp_in_errs, curr.tcp_in_errs),
        tcp_out_rst: delta(prev.tcp_out_rsts, curr.tcp_out_rsts),
        total_tcp_sockets: current.tcp.sockets,
        total_tcp_rx_queue: current.tcp.rx_queue,
        total_tcp_tx_queue: current.tcp.tx_queue,
    }
}
