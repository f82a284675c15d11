//! `/proc/net/tcp`: per-socket rows. The report only carries the socket
//! count and the receive/transmit queue depths summed over all sockets, so
//! the aggregation happens here at capture time.

use std::path::Path;

use procpulse_common::types::TcpSocketSummary;

use crate::error::{CaptureError, Result};

use super::read_file;

pub(super) fn read(root: &Path) -> Result<TcpSocketSummary> {
    let path = root.join("net/tcp");
    let content = read_file(&path)?;

    let mut summary = TcpSocketSummary::default();
    // First line is the column header.
    for line in content.lines().skip(1) {
        let mut fields = line.split_whitespace();
        if fields.next().is_none() {
            continue;
        }
        // sl local_address rem_address st tx_queue:rx_queue ...
        let queues = fields
            .nth(3)
            .ok_or_else(|| CaptureError::parse(&path, format!("short socket row '{line}'")))?;
        let (tx, rx) = queues
            .split_once(':')
            .ok_or_else(|| CaptureError::parse(&path, format!("bad queue field '{queues}'")))?;
        summary.tx_queue += parse_hex(&path, tx)?;
        summary.rx_queue += parse_hex(&path, rx)?;
        summary.sockets += 1;
    }
    Ok(summary)
}

fn parse_hex(path: &Path, token: &str) -> Result<u64> {
    u64::from_str_radix(token, 16)
        .map_err(|_| CaptureError::parse(path, format!("expected hex counter, got '{token}'")))
}
