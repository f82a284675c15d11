//! The delta-computation pattern shared by every report family.

/// Interval delta of a monotonically increasing counter.
///
/// Counters are unsigned and may wrap on long-lived or very busy hosts.
/// Wraparound is a known, accepted inaccuracy: the subtraction simply wraps
/// too, it is not detected or corrected.
pub fn delta(previous: u64, current: u64) -> u64 {
    current.wrapping_sub(previous)
}

/// Utilization percentage from an idle-time delta: `ceil(100 * (1 -
/// idle/total))`. A zero total delta means nothing was accounted during the
/// interval and yields 0 rather than a division fault.
pub fn busy_percent(delta_idle: u64, delta_total: u64) -> u64 {
    if delta_total == 0 {
        return 0;
    }
    let ratio = delta_idle as f64 / delta_total as f64;
    ((1.0 - ratio) * 100.0).ceil() as u64
}

/// Percentage of a component delta against a total delta:
/// `ceil(100 * component/total)`, 0 when the total delta is 0.
pub fn component_percent(delta_component: u64, delta_total: u64) -> u64 {
    if delta_total == 0 {
        return 0;
    }
    (100.0 * delta_component as f64 / delta_total as f64).ceil() as u64
}

/// Clamps a delta to `i64::MAX` for JSON consumers that parse numbers into
/// signed longs. Bitmask fields (`SigIgn`, `SigCgt`) routinely exceed that
/// range after a wrapping subtraction.
pub fn cap_to_i64(value: u64) -> u64 {
    value.min(i64::MAX as u64)
}
