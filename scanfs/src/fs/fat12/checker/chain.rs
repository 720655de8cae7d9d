// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use scanio::prelude::*;

use crate::core::checker::VisitedClusters;
use crate::fs::fat12::{constant::*, fat::chain, meta::*};

/// What a chain walk found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainMeasure {
    /// Allocated bytes: one cluster size per data cluster followed.
    pub bytes: u32,
    /// Data clusters in chain order.
    pub clusters: Vec<u16>,
    /// A bad-cluster marker was met as the start or as a successor.
    pub hit_bad: bool,
    /// The walk exceeded the cluster count, so the chain must cycle.
    pub looped: bool,
}

impl ChainMeasure {
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Follows the chain from `start` through FAT copy 0 and records every value met.
///
/// The start value and each successor read from the FAT are added to `visited`,
/// terminators included. The walk stops at the first value that is not a data
/// cluster, or once it has taken more steps than the volume has clusters.
pub fn measure_chain<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    start: u16,
    visited: &mut VisitedClusters,
) -> ScanIOResult<ChainMeasure> {
    let cluster_size = meta.unit_size() as u32;
    let limit = meta.total_units();

    let mut m = ChainMeasure {
        hit_bad: start == FAT12_CLUST_BAD,
        ..ChainMeasure::default()
    };
    visited.mark(start);

    let mut cur = start;
    while meta.is_valid_cluster(cur) {
        if m.clusters.len() >= limit {
            m.looped = true;
            break;
        }
        m.bytes += cluster_size;
        m.clusters.push(cur);

        cur = chain::read_entry(io, meta, cur, 0)?;
        if cur == FAT12_CLUST_BAD {
            m.hit_bad = true;
        }
        visited.mark(cur);
    }
    Ok(m)
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;

    fn setup() -> (Vec<u8>, Fat12Meta, VisitedClusters) {
        let meta = Fat12Meta::floppy_1440k();
        (
            vec![0u8; meta.size_bytes() as usize],
            meta,
            VisitedClusters::new(FAT12_CLUSTER_SPACE),
        )
    }

    #[test]
    fn test_measure_simple_chain() {
        let (mut buf, meta, mut visited) = setup();
        let mut io = MemScanIO::new(&mut buf);
        chain::write_chain(&mut io, &meta, &[2, 3, 4]).unwrap();

        let m = measure_chain(&mut io, &meta, 2, &mut visited).unwrap();
        assert_eq!(m.bytes, 3 * 512);
        assert_eq!(m.clusters, vec![2, 3, 4]);
        assert!(!m.hit_bad && !m.looped);
        for c in [2, 3, 4, FAT12_CLUST_EOF] {
            assert!(visited.is_marked(c));
        }
    }

    #[test]
    fn test_measure_non_cluster_start() {
        let (mut buf, meta, mut visited) = setup();
        let mut io = MemScanIO::new(&mut buf);

        let m = measure_chain(&mut io, &meta, 0, &mut visited).unwrap();
        assert_eq!(m.bytes, 0);
        assert!(m.is_empty());
        assert!(visited.is_marked(0));

        let m = measure_chain(&mut io, &meta, FAT12_CLUST_EOF, &mut visited).unwrap();
        assert_eq!(m.bytes, 0);
    }

    #[test]
    fn test_measure_bad_start_and_successor() {
        let (mut buf, meta, mut visited) = setup();
        let mut io = MemScanIO::new(&mut buf);

        let m = measure_chain(&mut io, &meta, FAT12_CLUST_BAD, &mut visited).unwrap();
        assert!(m.hit_bad);
        assert_eq!(m.bytes, 0);

        chain::write_entry(&mut io, &meta, 20, FAT12_CLUST_BAD).unwrap();
        let m = measure_chain(&mut io, &meta, 20, &mut visited).unwrap();
        assert!(m.hit_bad);
        assert_eq!(m.bytes, 512);
    }

    #[test]
    fn test_measure_stops_on_cycle() {
        let (mut buf, meta, mut visited) = setup();
        let mut io = MemScanIO::new(&mut buf);
        chain::write_entry(&mut io, &meta, 30, 31).unwrap();
        chain::write_entry(&mut io, &meta, 31, 30).unwrap();

        let m = measure_chain(&mut io, &meta, 30, &mut visited).unwrap();
        assert!(m.looped);
        assert_eq!(m.len(), meta.cluster_count as usize);
    }
}
