//! Per-process counters from `/proc/<pid>/{cmdline,status,statm,stat,io}`.
//!
//! Only user-level processes are reported, detected the same way the rest of
//! the pipeline expects them: a pid whose `exe` link resolves to a binary.
//! Kernel threads have no backing binary and are skipped.

use std::fs;
use std::path::Path;

use procpulse_common::types::ProcessCounters;

use crate::error::Result;

use super::read_file;

pub(super) fn read(root: &Path) -> Result<Vec<ProcessCounters>> {
    let mut processes = Vec::new();
    let entries = fs::read_dir(root).map_err(|e| crate::error::CaptureError::io(root, e))?;
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u64>().ok())
        else {
            continue;
        };
        if fs::metadata(entry.path().join("exe")).is_err() {
            continue;
        }
        // A process may exit between the directory listing and these reads;
        // that drops it from this snapshot instead of failing the capture.
        if let Ok(process) = read_one(root, pid) {
            processes.push(process);
        }
    }
    processes.sort_unstable_by_key(|p| p.pid);
    Ok(processes)
}

fn read_one(root: &Path, pid: u64) -> Result<ProcessCounters> {
    let dir = root.join(pid.to_string());

    let mut process = ProcessCounters {
        pid,
        cmdline: read_cmdline(&dir)?,
        ..ProcessCounters::default()
    };
    read_status(&dir, &mut process)?;
    read_statm(&dir, &mut process)?;
    read_stat(&dir, &mut process)?;
    read_io(&dir, &mut process)?;
    Ok(process)
}

fn read_cmdline(dir: &Path) -> Result<String> {
    let raw = read_file(&dir.join("cmdline"))?;
    // NUL-separated argv
    Ok(raw
        .split('\0')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

fn read_status(dir: &Path, process: &mut ProcessCounters) -> Result<()> {
    let path = dir.join("status");
    let content = read_file(&path)?;
    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = rest.trim();
        match key {
            "State" => process.state = value.chars().next().unwrap_or('?').to_string(),
            "VmLck" => process.locked_kb = kb_value(value),
            "VmSwap" => process.swap_kb = kb_value(value),
            "Threads" => process.threads = dec_value(value),
            "FDSize" => process.fd_size = dec_value(value),
            "SigIgn" => process.sig_ignored = hex_value(value),
            "SigCgt" => process.sig_caught = hex_value(value),
            "voluntary_ctxt_switches" => process.voluntary_ctxt_switches = dec_value(value),
            "nonvoluntary_ctxt_switches" => process.nonvoluntary_ctxt_switches = dec_value(value),
            _ => {}
        }
    }
    Ok(())
}

fn read_statm(dir: &Path, process: &mut ProcessCounters) -> Result<()> {
    let path = dir.join("statm");
    let content = read_file(&path)?;
    let mut fields = content.split_whitespace();
    process.vm_size_pages = fields.next().map(dec_value).unwrap_or(0);
    process.rss_pages = fields.next().map(dec_value).unwrap_or(0);
    Ok(())
}

fn read_stat(dir: &Path, process: &mut ProcessCounters) -> Result<()> {
    let path = dir.join("stat");
    let content = read_file(&path)?;
    // comm may contain spaces and parentheses; fields resume after the
    // last ')'. utime and stime are overall fields 14 and 15.
    let rest = content.rsplit_once(')').map(|(_, r)| r).unwrap_or("");
    let fields: Vec<&str> = rest.split_whitespace().collect();
    process.utime = fields.get(11).map(|v| dec_value(v)).unwrap_or(0);
    process.stime = fields.get(12).map(|v| dec_value(v)).unwrap_or(0);
    Ok(())
}

fn read_io(dir: &Path, process: &mut ProcessCounters) -> Result<()> {
    let path = dir.join("io");
    let content = read_file(&path)?;
    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key {
            "read_bytes" => process.io_read_bytes = dec_value(value.trim()),
            "write_bytes" => process.io_write_bytes = dec_value(value.trim()),
            _ => {}
        }
    }
    Ok(())
}

fn dec_value(token: &str) -> u64 {
    token.trim().parse().unwrap_or(0)
}

fn hex_value(token: &str) -> u64 {
    u64::from_str_radix(token.trim(), 16).unwrap_or(0)
}

/// Parses a `status` size such as `VmLck:       0 kB`.
fn kb_value(token: &str) -> u64 {
    token
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
