//! `/proc/stat`: per-core and aggregate CPU jiffy counters plus the
//! scheduler event rows (`ctxt`, `intr`, `processes`).

use std::path::Path;

use procpulse_common::types::{CpuTimes, KernelCounters};

use crate::error::{CaptureError, Result};

use super::{parse_counter, read_file};

pub(super) fn read(root: &Path) -> Result<KernelCounters> {
    let path = root.join("stat");
    let content = read_file(&path)?;

    let mut counters = KernelCounters::default();
    let mut saw_aggregate = false;

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        match label {
            "cpu" => {
                counters.cpu_all = parse_cpu_row(&path, label, fields)?;
                saw_aggregate = true;
            }
            _ if label.starts_with("cpu") => {
                counters.cpus.push(parse_cpu_row(&path, label, fields)?);
            }
            "ctxt" => counters.context_switches = first_value(&path, line, fields)?,
            // Only the leading total; the per-IRQ columns are not reported.
            "intr" => counters.interrupts = first_value(&path, line, fields)?,
            "processes" => counters.processes = first_value(&path, line, fields)?,
            _ => {}
        }
    }

    if !saw_aggregate || counters.cpus.is_empty() {
        return Err(CaptureError::parse(&path, "no cpu rows"));
    }
    Ok(counters)
}

fn parse_cpu_row<'a>(
    path: &Path,
    label: &str,
    fields: impl Iterator<Item = &'a str>,
) -> Result<CpuTimes> {
    let mut values = [0u64; 8];
    let mut filled = 0;
    for (slot, token) in values.iter_mut().zip(fields) {
        *slot = parse_counter(path, token)?;
        filled += 1;
    }
    // user nice system idle are mandatory; iowait and later appeared in
    // newer kernels and default to zero.
    if filled < 4 {
        return Err(CaptureError::parse(
            path,
            format!("cpu row '{label}' has {filled} fields"),
        ));
    }
    let [user, nice, system, idle, iowait, irq, softirq, steal] = values;
    Ok(CpuTimes {
        id: label.to_string(),
        user,
        nice,
        system,
        idle,
        iowait,
        irq,
        softirq,
        steal,
    })
}

fn first_value<'a>(
    path: &Path,
    line: &str,
    mut fields: impl Iterator<Item = &'a str>,
) -> Result<u64> {
    let token = fields
        .next()
        .ok_or_else(|| CaptureError::parse(path, format!("missing value in '{line}'")))?;
    parse_counter(path, token)
}
