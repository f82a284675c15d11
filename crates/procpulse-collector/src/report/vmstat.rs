use procpulse_common::report::VmReport;
use procpulse_common::types::RawSnapshot;

use super::delta::delta;

pub(super) fn build(previous: &RawSnapshot, current: &RawSnapshot) -> VmReport {
    let (prev, curr) = (&previous.vm, &current.vm);
    VmReport {
        pgfree: delta(prev.pgfree, curr.pgfree),
        pgpgin: delta(prev.pgpgin, curr.pgpgin),
        pgpgout: delta(prev.pgpgout, curr.pgpgout),
        pswpin: delta(prev.pswpin, curr.pswpin),
        pswpout: delta(prev.pswpout, curr.pswpout),
        pgfault: delta(prev.pgfault, curr.pgfault),
        pgmajfault: delta(prev.pgmajfault, curr.pgmajfault),
        // The nr_* fields are page-count gauges, reported as-is.
        nr_mlock: curr.nr_mlock,
        nr_shmem: curr.nr_shmem,
        nr_dirty: curr.nr_dirty,
        nr_page_table_pages: curr.nr_page_table_pages,
        nr_slab: curr.nr_slab,
        nr_mapped: curr.nr_mapped,
        nr_free_pages: curr.nr_free_pages,
        nr_anon_pages: curr.nr_anon_pages,
    }
}
