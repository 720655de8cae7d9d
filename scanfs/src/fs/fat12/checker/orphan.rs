// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::format;

use scanio::prelude::*;

use crate::core::checker::{Finding, FsCheckerResult, VerifyReport, VisitedClusters};
use crate::fs::fat12::{
    constant::*, dir::DirRegion, fat::chain, meta::*, types::Fat12Entry, utils::to_short_name,
};

use super::Fat12CheckOptions;
use super::chain::measure_chain;

/// Exclusive upper bound of the orphan scan. A configured limit can only narrow
/// the data cluster range, never widen it.
pub fn scan_end(meta: &Fat12Meta, limit: Option<u32>) -> u16 {
    let end = meta.cluster_end();
    match limit {
        Some(l) => l.clamp(FAT12_CLUST_FIRST as u32, end as u32) as u16,
        None => end,
    }
}

/// In use according to the FAT (anything but FREE, bad markers included) yet never visited.
#[inline]
pub fn is_orphan<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    visited: &VisitedClusters,
    cluster: u16,
) -> ScanIOResult<bool> {
    if visited.is_marked(cluster) {
        return Ok(false);
    }
    Ok(chain::read_entry(io, meta, cluster, 0)? != FAT12_CLUST_FREE)
}

/// Lists orphan clusters before anything is recovered.
pub fn report_orphans<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    visited: &VisitedClusters,
    end: u16,
    sample_limit: usize,
    rep: &mut VerifyReport,
) -> FsCheckerResult<usize> {
    let mut orphans = 0usize;
    for c in visited.unmarked(FAT12_CLUST_FIRST..end) {
        if chain::read_entry(io, meta, c, 0)? != FAT12_CLUST_FREE {
            orphans += 1;
            if orphans <= sample_limit {
                rep.push(Finding::warn(
                    "ORPHAN.FOUND",
                    format!("Orphan cluster found; cluster number {c}"),
                ));
            }
        }
    }

    if orphans == 0 {
        rep.push(Finding::info("ORPHAN.FOUND", "No orphan clusters"));
    } else if orphans > sample_limit {
        rep.push(Finding::warn(
            "ORPHAN.FOUND",
            format!("{orphans} orphan clusters ({sample_limit} listed)"),
        ));
    } else {
        rep.push(Finding::info(
            "ORPHAN.FOUND",
            format!("{orphans} orphan clusters"),
        ));
    }
    Ok(orphans)
}

/// Adopts every orphan chain into the root directory as `<prefix>N<suffix>`.
///
/// The scan runs once, in ascending cluster order. Each orphan found starts a
/// chain that is measured (marking all of it visited) and given a new root
/// entry whose size is the measured byte count. N starts at 1. Returns the
/// number of chains found.
pub fn recover_orphans<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    visited: &mut VisitedClusters,
    opt: &Fat12CheckOptions,
    rep: &mut VerifyReport,
) -> FsCheckerResult<usize> {
    let end = scan_end(meta, opt.scan_limit);
    let root = DirRegion::root(meta);
    let mut found = 0usize;

    for c in FAT12_CLUST_FIRST..end {
        if !is_orphan(io, meta, visited, c)? {
            continue;
        }
        found += 1;

        let m = measure_chain(io, meta, c, visited)?;
        if m.hit_bad {
            rep.push(Finding::warn(
                "CHAIN.BAD",
                format!("Bad cluster in orphan chain at cluster {c}"),
            ));
        }
        if m.looped {
            rep.push(Finding::warn(
                "CHAIN.LOOP",
                format!("Orphan chain at cluster {c} does not terminate"),
            ));
        }

        if !opt.repair {
            rep.push(Finding::err(
                "ORPHAN.ADOPT",
                format!("Orphan chain at cluster {c} ({} bytes) not recovered", m.bytes),
            ));
            continue;
        }

        let name = format!("{}{}{}", opt.orphan_name_prefix, found, opt.orphan_name_suffix);
        let short = to_short_name(&name);
        if short.ext_defaulted {
            rep.push(Finding::warn(
                "NAME.EXT",
                "No filename extension given - defaulting to .___",
            ));
        }

        let entry = Fat12Entry::file(&short, c, m.bytes);
        let slot = root.allocate_entry(io, &entry)?;
        rep.push(Finding::fixed(
            "ORPHAN.ADOPT",
            format!(
                "Orphan chain at cluster {c} ({} bytes) recovered as {} in root slot {slot}",
                m.bytes,
                entry.display_name()
            ),
        ));
    }
    Ok(found)
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;

    #[test]
    fn test_scan_end_bounds() {
        let meta = Fat12Meta::floppy_1440k();
        assert_eq!(scan_end(&meta, None), 2849);
        assert_eq!(scan_end(&meta, Some(2880)), 2849);
        assert_eq!(scan_end(&meta, Some(100)), 100);
        assert_eq!(scan_end(&meta, Some(0)), 2);
    }

    #[test]
    fn test_is_orphan() {
        let meta = Fat12Meta::floppy_1440k();
        let mut buf = vec![0u8; meta.size_bytes() as usize];
        let mut io = MemScanIO::new(&mut buf);
        let mut visited = VisitedClusters::new(FAT12_CLUSTER_SPACE);

        chain::write_entry(&mut io, &meta, 7, FAT12_CLUST_EOF).unwrap();
        chain::write_entry(&mut io, &meta, 8, FAT12_CLUST_BAD).unwrap();

        assert!(!is_orphan(&mut io, &meta, &visited, 6).unwrap());
        assert!(is_orphan(&mut io, &meta, &visited, 7).unwrap());
        assert!(is_orphan(&mut io, &meta, &visited, 8).unwrap());
        visited.mark(7);
        assert!(!is_orphan(&mut io, &meta, &visited, 7).unwrap());
    }

    #[test]
    fn test_report_lists_every_orphan_by_default() {
        let meta = Fat12Meta::floppy_1440k();
        let mut buf = vec![0u8; meta.size_bytes() as usize];
        let mut io = MemScanIO::new(&mut buf);
        let visited = VisitedClusters::new(FAT12_CLUSTER_SPACE);
        for c in 10..22u16 {
            chain::write_entry(&mut io, &meta, c, FAT12_CLUST_EOF).unwrap();
        }

        let limit = Fat12CheckOptions::default().orphan_sample_limit;
        let mut rep = VerifyReport::default();
        let n = report_orphans(&mut io, &meta, &visited, meta.cluster_end(), limit, &mut rep).unwrap();
        assert_eq!(n, 12);
        let listed: Vec<&str> = rep
            .with_code("ORPHAN.FOUND")
            .filter(|f| f.msg.starts_with("Orphan cluster found"))
            .map(|f| f.msg.as_str())
            .collect();
        assert_eq!(listed.len(), 12);
        assert_eq!(listed[11], "Orphan cluster found; cluster number 21");

        let mut rep = VerifyReport::default();
        report_orphans(&mut io, &meta, &visited, meta.cluster_end(), 4, &mut rep).unwrap();
        let last = rep.with_code("ORPHAN.FOUND").last().unwrap();
        assert_eq!(last.msg, "12 orphan clusters (4 listed)");
        assert_eq!(rep.with_code("ORPHAN.FOUND").count(), 5);
    }
}
