use procpulse_common::report::{BasicReport, ProcessorReport};
use procpulse_common::types::{CpuTimes, RawSnapshot};

use super::delta::{busy_percent, delta};

pub(super) fn build(previous: &RawSnapshot, current: &RawSnapshot) -> BasicReport {
    let mut report = BasicReport::default();
    let mut percent_sum = 0u64;

    for cpu in &current.kernel.cpus {
        let Some(prev_cpu) = previous.kernel.cpus.iter().find(|p| p.id == cpu.id) else {
            continue;
        };
        let percentage = core_utilization(prev_cpu, cpu);
        percent_sum += percentage;
        report.processors.push(ProcessorReport {
            cpu: cpu.id.clone(),
            user: cpu.user,
            nice: cpu.nice,
            system: cpu.system,
            iowait: cpu.iowait,
            percentage_util: percentage,
        });
    }

    // /proc/stat has no independent all-core utilization; the aggregate is
    // the arithmetic mean of the per-core percentages.
    let all = &current.kernel.cpu_all;
    report.all_processors = ProcessorReport {
        cpu: all.id.clone(),
        user: all.user,
        nice: all.nice,
        system: all.system,
        iowait: all.iowait,
        percentage_util: if report.processors.is_empty() {
            0
        } else {
            percent_sum / report.processors.len() as u64
        },
    };

    report.processes = delta(previous.kernel.processes, current.kernel.processes);
    report.context_switches = delta(
        previous.kernel.context_switches,
        current.kernel.context_switches,
    );
    report.interrupts = delta(previous.kernel.interrupts, current.kernel.interrupts);
    report
}

/// <https://rosettacode.org/wiki/Linux_CPU_utilization>
fn core_utilization(previous: &CpuTimes, current: &CpuTimes) -> u64 {
    let delta_idle = delta(previous.idle, current.idle);
    let delta_total = delta(previous.total(), current.total());
    busy_percent(delta_idle, delta_total)
}
