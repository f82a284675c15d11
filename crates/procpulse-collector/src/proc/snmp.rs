//! `/proc/net/snmp`: MIB-II counters. Each protocol contributes two lines
//! with the same prefix, a header row naming the columns and a value row.

use std::collections::HashMap;
use std::path::Path;

use procpulse_common::types::SnmpCounters;

use crate::error::{CaptureError, Result};

use super::{parse_counter, read_file};

pub(super) fn read(root: &Path) -> Result<SnmpCounters> {
    let path = root.join("net/snmp");
    let content = read_file(&path)?;

    let ip = protocol_table(&path, &content, "Ip:")?;
    let tcp = protocol_table(&path, &content, "Tcp:")?;

    let get = |table: &HashMap<String, u64>, column: &str| table.get(column).copied().unwrap_or(0);

    Ok(SnmpCounters {
        ip_forwarding: get(&ip, "Forwarding"),
        ip_forw_datagrams: get(&ip, "ForwDatagrams"),
        ip_in_receives: get(&ip, "InReceives"),
        ip_in_hdr_errors: get(&ip, "InHdrErrors"),
        ip_in_addr_errors: get(&ip, "InAddrErrors"),
        ip_in_discards: get(&ip, "InDiscards"),
        ip_in_unknown_protos: get(&ip, "InUnknownProtos"),
        ip_in_delivers: get(&ip, "InDelivers"),
        ip_out_requests: get(&ip, "OutRequests"),
        ip_out_no_routes: get(&ip, "OutNoRoutes"),
        ip_out_discards: get(&ip, "OutDiscards"),
        tcp_rto_max: get(&tcp, "RtoMax"),
        tcp_max_conn: get(&tcp, "MaxConn"),
        tcp_active_opens: get(&tcp, "ActiveOpens"),
        tcp_passive_opens: get(&tcp, "PassiveOpens"),
        tcp_curr_estab: get(&tcp, "CurrEstab"),
        tcp_estab_resets: get(&tcp, "EstabResets"),
        tcp_retrans_segs: get(&tcp, "RetransSegs"),
        tcp_in_segs: get(&tcp, "InSegs"),
        tcp_out_segs: get(&tcp, "OutSegs"),
        tcp_in_errs: get(&tcp, "InErrs"),
        tcp_out_rsts: get(&tcp, "OutRsts"),
    })
}

/// Pairs the header and value rows for one protocol prefix into a
/// column-name → value map.
fn protocol_table(path: &Path, content: &str, prefix: &str) -> Result<HashMap<String, u64>> {
    let mut rows = content.lines().filter(|l| l.starts_with(prefix));
    let (Some(header), Some(values)) = (rows.next(), rows.next()) else {
        return Err(CaptureError::parse(
            path,
            format!("missing '{prefix}' header/value rows"),
        ));
    };

    let mut table = HashMap::new();
    let columns = header.split_whitespace().skip(1);
    let mut fields = values.split_whitespace().skip(1);
    for column in columns {
        let Some(token) = fields.next() else {
            return Err(CaptureError::parse(
                path,
                format!("'{prefix}' value row shorter than header"),
            ));
        };
        table.insert(column.to_string(), parse_counter(path, token)?);
    }
    Ok(table)
}
