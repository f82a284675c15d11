use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use procpulse_common::types::{CpuTimes, DiskCounters, ProcessCounters, RawSnapshot};
use tempfile::TempDir;

use crate::report::{self, delta};
use crate::store::{SamplePair, SampleStore};
use crate::{ProcSource, SnapshotSource};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Builds a minimal but complete proc tree with one user-level process.
fn fixture_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "sys/kernel/hostname", "testhost\n");
    write(
        root,
        "stat",
        "cpu  200 20 100 600 40 10 10 20\n\
         cpu0 100 10 50 300 20 5 5 10\n\
         cpu1 100 10 50 300 20 5 5 10\n\
         intr 5000 1 2 3\n\
         ctxt 8000\n\
         btime 1700000000\n\
         processes 400\n\
         procs_running 2\n\
         procs_blocked 0\n",
    );
    write(
        root,
        "vmstat",
        "nr_free_pages 1000\n\
         nr_anon_pages 222\n\
         nr_mapped 333\n\
         nr_dirty 11\n\
         nr_mlock 1\n\
         nr_shmem 44\n\
         nr_slab 77\n\
         nr_page_table_pages 55\n\
         pgpgin 100\n\
         pgpgout 200\n\
         pswpin 5\n\
         pswpout 6\n\
         pgfree 900\n\
         pgfault 1234\n\
         pgmajfault 12\n",
    );
    write(
        root,
        "net/snmp",
        "Ip: Forwarding DefaultTTL InReceives InHdrErrors InAddrErrors ForwDatagrams InUnknownProtos InDiscards InDelivers OutRequests OutDiscards OutNoRoutes\n\
         Ip: 1 64 1000 1 2 3 4 5 990 800 6 7\n\
         Icmp: InMsgs InErrors\n\
         Icmp: 0 0\n\
         Tcp: RtoAlgorithm RtoMin RtoMax MaxConn ActiveOpens PassiveOpens AttemptFails EstabResets CurrEstab InSegs OutSegs RetransSegs InErrs OutRsts\n\
         Tcp: 1 200 120000 -1 10 20 1 2 5 500 600 7 8 9\n",
    );
    write(
        root,
        "net/tcp",
        "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt uid timeout inode\n\
         0: 0100007F:0016 00000000:0000 0A 00000002:00000003 00:00000000 00000000 0 0 100 1 0 100 0 0 10 0\n\
         1: 0100007F:0050 00000000:0000 0A 00000001:00000004 00:00000000 00000000 0 0 101 1 0 100 0 0 10 0\n",
    );
    write(
        root,
        "diskstats",
        "   8       0 sda 1000 10 8000 100 500 5 4000 200 2 300 400\n\
         8 1 sda1 100 1 800 10 50 1 400 20 0 30 40\n",
    );

    write(root, "42/exe", "");
    write(root, "42/cmdline", "/usr/bin/myapp\0--flag\0");
    write(
        root,
        "42/status",
        "Name:\tmyapp\n\
         State:\tS (sleeping)\n\
         Pid:\t42\n\
         FDSize:\t64\n\
         VmLck:\t       0 kB\n\
         VmSwap:\t      12 kB\n\
         Threads:\t3\n\
         SigIgn:\t0000000000001000\n\
         SigCgt:\t0000000180014a07\n\
         voluntary_ctxt_switches:\t100\n\
         nonvoluntary_ctxt_switches:\t5\n",
    );
    write(root, "42/statm", "2500 600 300 50 0 1500 0\n");
    write(
        root,
        "42/stat",
        "42 (myapp) S 1 42 42 0 -1 4194304 100 0 0 0 250 120 0 0 20 0 3 0 12345 1024000 600\n",
    );
    write(
        root,
        "42/io",
        "rchar: 100\nwchar: 200\nread_bytes: 4096\nwrite_bytes: 8192\n",
    );
    // Kernel thread: numeric dir without a readable exe, must be skipped.
    write(root, "7/status", "Name:\tkworker\n");

    dir
}

#[test]
fn capture_reads_full_fixture_tree() {
    let dir = fixture_tree();
    let source = ProcSource::new(dir.path());
    let snapshot = source.capture().unwrap();

    assert_eq!(snapshot.hostname, "testhost");
    assert_eq!(snapshot.kernel.cpus.len(), 2);
    assert_eq!(snapshot.kernel.cpu_all.user, 200);
    assert_eq!(snapshot.kernel.cpu_all.total(), 1000);
    assert_eq!(snapshot.kernel.context_switches, 8000);
    assert_eq!(snapshot.kernel.interrupts, 5000);
    assert_eq!(snapshot.kernel.processes, 400);

    assert_eq!(snapshot.vm.pgfault, 1234);
    assert_eq!(snapshot.vm.nr_free_pages, 1000);

    assert_eq!(snapshot.snmp.ip_in_receives, 1000);
    assert_eq!(snapshot.snmp.tcp_rto_max, 120_000);
    // MaxConn is -1 (unlimited) and clamps to zero.
    assert_eq!(snapshot.snmp.tcp_max_conn, 0);

    assert_eq!(snapshot.tcp.sockets, 2);
    assert_eq!(snapshot.tcp.tx_queue, 3);
    assert_eq!(snapshot.tcp.rx_queue, 7);

    assert_eq!(snapshot.disks.len(), 2);
    assert_eq!(snapshot.disks[0].name, "sda");
    assert_eq!(snapshot.disks[0].sectors_read, 8000);
    assert_eq!(snapshot.disks[0].in_flight, 2);

    assert_eq!(snapshot.processes.len(), 1);
    let process = &snapshot.processes[0];
    assert_eq!(process.pid, 42);
    assert_eq!(process.cmdline, "/usr/bin/myapp --flag");
    assert_eq!(process.state, "S");
    assert_eq!(process.vm_size_pages, 2500);
    assert_eq!(process.rss_pages, 600);
    assert_eq!(process.swap_kb, 12);
    assert_eq!(process.threads, 3);
    assert_eq!(process.fd_size, 64);
    assert_eq!(process.sig_ignored, 0x1000);
    assert_eq!(process.utime, 250);
    assert_eq!(process.stime, 120);
    assert_eq!(process.io_read_bytes, 4096);
}

#[test]
fn capture_fails_when_a_counter_file_is_missing() {
    let dir = fixture_tree();
    fs::remove_file(dir.path().join("stat")).unwrap();
    let source = ProcSource::new(dir.path());
    let err = source.capture().unwrap_err();
    assert!(err.to_string().contains("stat"));
}

#[test]
fn capture_falls_back_to_unknown_hostname() {
    let dir = fixture_tree();
    fs::remove_file(dir.path().join("sys/kernel/hostname")).unwrap();
    let source = ProcSource::new(dir.path());
    assert_eq!(source.capture().unwrap().hostname, "unknown");
}

fn snapshot(tag: &str) -> RawSnapshot {
    RawSnapshot {
        hostname: tag.to_string(),
        ..RawSnapshot::default()
    }
}

#[tokio::test]
async fn gate_opens_after_exactly_two_publishes() {
    let store = SampleStore::new();
    assert!(!store.has_pair());
    store.publish(snapshot("a")).await;
    assert!(!store.has_pair());
    store.publish(snapshot("b")).await;
    assert!(store.has_pair());
    store.publish(snapshot("c")).await;
    assert!(store.has_pair());
}

#[tokio::test]
async fn read_pair_waits_through_warmup_then_never_again() {
    let store = Arc::new(SampleStore::new());

    // Warm-up: no pair yet, the reader must park instead of busy-polling.
    let pending = tokio::time::timeout(Duration::from_millis(50), store.read_pair()).await;
    assert!(pending.is_err());

    let reader = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.read_pair().await })
    };
    store.publish(snapshot("a")).await;
    store.publish(snapshot("b")).await;

    let pair = tokio::time::timeout(Duration::from_secs(1), reader)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pair.previous.hostname, "a");
    assert_eq!(pair.current.hostname, "b");

    // Once ready, read_pair returns immediately for the store's lifetime.
    let pair = tokio::time::timeout(Duration::from_millis(50), store.read_pair())
        .await
        .unwrap();
    assert_eq!(pair.current.hostname, "b");
}

#[tokio::test]
async fn publishes_demote_current_to_previous() {
    let store = SampleStore::new();
    store.publish(snapshot("a")).await;
    store.publish(snapshot("b")).await;
    store.publish(snapshot("c")).await;

    let pair = store.read_pair().await;
    assert_eq!(pair.previous.hostname, "b");
    assert_eq!(pair.current.hostname, "c");
}

#[tokio::test]
async fn readers_observe_monotonic_current() {
    let store = Arc::new(SampleStore::new());
    store.publish(snapshot("0")).await;
    store.publish(snapshot("1")).await;

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 2..200u32 {
                store.publish(snapshot(&i.to_string())).await;
            }
        })
    };

    let mut last: u32 = 0;
    for _ in 0..500 {
        let pair = store.read_pair().await;
        let current: u32 = pair.current.hostname.parse().unwrap();
        let previous: u32 = pair.previous.hostname.parse().unwrap();
        // Never a torn pair, never a step backwards.
        assert_eq!(previous + 1, current);
        assert!(current >= last);
        last = current;
    }
    writer.await.unwrap();
}

#[test]
fn delta_of_monotonic_counter() {
    assert_eq!(delta::delta(100, 150), 50);
}

#[test]
fn delta_wraps_without_correction() {
    assert_eq!(delta::delta(u64::MAX - 9, 5), 15);
}

#[test]
fn zero_total_delta_yields_zero_percent() {
    assert_eq!(delta::busy_percent(0, 0), 0);
    assert_eq!(delta::component_percent(50, 0), 0);
}

#[test]
fn busy_percent_rounds_up() {
    // 25 idle of 100 total: 75% busy.
    assert_eq!(delta::busy_percent(25, 100), 75);
    // 2 idle of 3 total: ceil(33.3..) = 34.
    assert_eq!(delta::busy_percent(2, 3), 34);
}

#[test]
fn component_percent_rounds_up() {
    assert_eq!(delta::component_percent(1, 3), 34);
    assert_eq!(delta::component_percent(0, 100), 0);
}

#[test]
fn cap_to_i64_clamps_bitmask_deltas() {
    assert_eq!(delta::cap_to_i64(u64::MAX), i64::MAX as u64);
    assert_eq!(delta::cap_to_i64(42), 42);
}

fn cpu(id: &str, user: u64, idle: u64) -> CpuTimes {
    CpuTimes {
        id: id.to_string(),
        user,
        idle,
        ..CpuTimes::default()
    }
}

fn pair(previous: RawSnapshot, current: RawSnapshot) -> SamplePair {
    SamplePair {
        previous: Arc::new(previous),
        current: Arc::new(current),
    }
}

#[test]
fn report_derives_core_and_aggregate_utilization() {
    let mut prev = snapshot("host");
    let mut curr = snapshot("host");
    prev.kernel.cpus = vec![cpu("cpu0", 0, 0), cpu("cpu1", 0, 0)];
    // cpu0: 100 busy of 100 total; cpu1: 50 idle of 100 total.
    curr.kernel.cpus = vec![cpu("cpu0", 100, 0), cpu("cpu1", 50, 50)];
    prev.kernel.cpu_all = cpu("cpu", 0, 0);
    curr.kernel.cpu_all = cpu("cpu", 150, 50);
    prev.kernel.context_switches = 100;
    curr.kernel.context_switches = 350;

    let report = report::build(&pair(prev, curr));
    assert_eq!(report.basic.processors[0].percentage_util, 100);
    assert_eq!(report.basic.processors[1].percentage_util, 50);
    // Aggregate is the mean of per-core percentages.
    assert_eq!(report.basic.all_processors.percentage_util, 75);
    assert_eq!(report.basic.context_switches, 250);
    assert_eq!(report.hostname, "host");
}

#[test]
fn report_skips_disks_and_processes_without_previous_counters() {
    let mut prev = snapshot("host");
    let mut curr = snapshot("host");
    prev.disks = vec![DiskCounters {
        name: "sda".to_string(),
        sectors_read: 0,
        ..DiskCounters::default()
    }];
    curr.disks = vec![
        DiskCounters {
            name: "sda".to_string(),
            sectors_read: 4096,
            ..DiskCounters::default()
        },
        DiskCounters {
            name: "sdb".to_string(),
            ..DiskCounters::default()
        },
    ];
    prev.processes = vec![ProcessCounters {
        pid: 10,
        ..ProcessCounters::default()
    }];
    curr.processes = vec![
        ProcessCounters {
            pid: 10,
            ..ProcessCounters::default()
        },
        ProcessCounters {
            pid: 11,
            ..ProcessCounters::default()
        },
    ];

    let report = report::build(&pair(prev, curr));
    assert_eq!(report.disks.len(), 1);
    // 4096 sectors * 512 bytes = 2 MiB.
    assert_eq!(report.disks[0].read_mbps, 2);
    assert_eq!(report.processes.len(), 1);
    assert_eq!(report.processes[0].pid, 10);
}

#[test]
fn report_process_cpu_uses_host_jiffy_delta() {
    let mut prev = snapshot("host");
    let mut curr = snapshot("host");
    prev.kernel.cpu_all = cpu("cpu", 0, 0);
    curr.kernel.cpu_all = cpu("cpu", 100, 100);
    prev.processes = vec![ProcessCounters {
        pid: 1,
        utime: 0,
        stime: 0,
        ..ProcessCounters::default()
    }];
    curr.processes = vec![ProcessCounters {
        pid: 1,
        utime: 50,
        stime: 20,
        ..ProcessCounters::default()
    }];

    let report = report::build(&pair(prev, curr));
    // 50 of 200 jiffies user, 20 of 200 system.
    assert_eq!(report.processes[0].user_cpu_usage, 25);
    assert_eq!(report.processes[0].system_cpu_usage, 10);
}
