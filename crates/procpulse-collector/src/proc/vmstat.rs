//! `/proc/vmstat`: one `name value` pair per line. Only the fields carried
//! in the report are kept; unknown rows are ignored.

use std::path::Path;

use procpulse_common::types::VmCounters;

use crate::error::Result;

use super::{parse_counter, read_file};

pub(super) fn read(root: &Path) -> Result<VmCounters> {
    let path = root.join("vmstat");
    let content = read_file(&path)?;

    let mut vm = VmCounters::default();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let slot = match name {
            "pgfree" => &mut vm.pgfree,
            "pgpgin" => &mut vm.pgpgin,
            "pgpgout" => &mut vm.pgpgout,
            "pswpin" => &mut vm.pswpin,
            "pswpout" => &mut vm.pswpout,
            "pgfault" => &mut vm.pgfault,
            "pgmajfault" => &mut vm.pgmajfault,
            "nr_mlock" => &mut vm.nr_mlock,
            "nr_shmem" => &mut vm.nr_shmem,
            "nr_dirty" => &mut vm.nr_dirty,
            "nr_page_table_pages" => &mut vm.nr_page_table_pages,
            "nr_slab" => &mut vm.nr_slab,
            "nr_mapped" => &mut vm.nr_mapped,
            "nr_free_pages" => &mut vm.nr_free_pages,
            "nr_anon_pages" => &mut vm.nr_anon_pages,
            _ => continue,
        };
        *slot = parse_counter(&path, value)?;
    }
    Ok(vm)
}
