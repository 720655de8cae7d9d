// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use scanio::prelude::*;

use crate::fs::fat12::{constant::*, meta::Fat12Meta};

/// 12-bit packed FAT accessors.
///
/// Even clusters use the low 12 bits of the little-endian u16 at `n * 3 / 2`,
/// odd clusters the high 12 bits.
pub mod chain {
    use super::*;

    #[inline]
    pub fn read_entry<IO>(io: &mut IO, meta: &Fat12Meta, cluster: u16, fat_index: u8) -> ScanIOResult<u16>
    where
        IO: ScanIO + ?Sized,
    {
        let raw = io.read_u16_at(meta.fat_entry_offset(cluster, fat_index))?;
        Ok(unpack(cluster, raw))
    }

    /// Writes `value` for `cluster` into every FAT copy, leaving the neighbour nibble intact.
    pub fn write_entry<IO>(io: &mut IO, meta: &Fat12Meta, cluster: u16, value: u16) -> ScanIOResult
    where
        IO: ScanIO + ?Sized,
    {
        for fi in 0..meta.num_fats {
            let off = meta.fat_entry_offset(cluster, fi);
            let raw = io.read_u16_at(off)?;
            io.write_u16_at(off, pack(cluster, raw, value))?;
        }
        Ok(())
    }

    #[inline]
    pub fn unpack(cluster: u16, raw: u16) -> u16 {
        if cluster & 1 == 1 {
            raw >> 4
        } else {
            raw & FAT12_MASK
        }
    }

    #[inline]
    pub fn pack(cluster: u16, raw: u16, value: u16) -> u16 {
        let value = value & FAT12_MASK;
        if cluster & 1 == 1 {
            (raw & 0x000F) | (value << 4)
        } else {
            (raw & 0xF000) | value
        }
    }

    #[inline]
    pub fn is_eoc(value: u16) -> bool {
        value >= FAT12_CLUST_EOFS
    }

    /// Read a chain into a vector of clusters.
    /// Stops at the first value that is not a data cluster, or after `cluster_count` steps.
    pub fn read_chain<IO: ScanIO + ?Sized>(
        io: &mut IO,
        meta: &Fat12Meta,
        start_cluster: u16,
    ) -> ScanIOResult<Vec<u16>> {
        let mut chain = Vec::new();
        let mut current = start_cluster;

        while meta.is_valid_cluster(current) {
            chain.push(current);
            if chain.len() > meta.cluster_count as usize {
                break;
            }
            current = read_entry(io, meta, current, 0)?;
        }
        Ok(chain)
    }

    /// Link `chain` in every FAT copy: each entry points to the next, the last one to EOF.
    pub fn write_chain<IO: ScanIO + ?Sized>(
        io: &mut IO,
        meta: &Fat12Meta,
        chain: &[u16],
    ) -> ScanIOResult {
        for (i, &c) in chain.iter().enumerate() {
            let next = chain.get(i + 1).copied().unwrap_or(FAT12_CLUST_EOF);
            write_entry(io, meta, c, next)?;
        }
        Ok(())
    }

    /// Writes the two reserved entries: media byte in FAT[0], EOF in FAT[1].
    pub fn write_reserved<IO: ScanIO + ?Sized>(io: &mut IO, meta: &Fat12Meta) -> ScanIOResult {
        write_entry(io, meta, 0, 0x0F00 | meta.media as u16)?;
        write_entry(io, meta, 1, FAT12_CLUST_EOF)
    }
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::chain::*;
    use crate::core::meta::FsMeta;
    use super::*;

    fn blank() -> (Vec<u8>, Fat12Meta) {
        let meta = Fat12Meta::floppy_1440k();
        (vec![0u8; meta.size_bytes() as usize], meta)
    }

    #[test]
    fn test_pack_unpack_neighbours() {
        // FAT bytes for entries 2 = 0x345 and 3 = 0x678 -> 45 83 67
        let raw_even = u16::from_le_bytes([0x45, 0x83]);
        let raw_odd = u16::from_le_bytes([0x83, 0x67]);
        assert_eq!(unpack(2, raw_even), 0x345);
        assert_eq!(unpack(3, raw_odd), 0x678);

        assert_eq!(pack(2, raw_even, 0xABC), u16::from_le_bytes([0xBC, 0x8A]));
        assert_eq!(pack(3, raw_odd, 0xABC), u16::from_le_bytes([0xC3, 0xAB]));
    }

    #[test]
    fn test_write_entry_updates_every_copy() {
        let (mut buf, meta) = blank();
        let mut io = MemScanIO::new(&mut buf);

        write_entry(&mut io, &meta, 2, 0x345).unwrap();
        write_entry(&mut io, &meta, 3, 0x678).unwrap();

        for fi in 0..meta.num_fats {
            assert_eq!(read_entry(&mut io, &meta, 2, fi).unwrap(), 0x345);
            assert_eq!(read_entry(&mut io, &meta, 3, fi).unwrap(), 0x678);
        }
        let off = meta.fat_entry_offset(2, 0) as usize;
        drop(io);
        assert_eq!(&buf[off..off + 3], &[0x45, 0x83, 0x67]);
    }

    #[test]
    fn test_chain_roundtrip() {
        let (mut buf, meta) = blank();
        let mut io = MemScanIO::new(&mut buf);

        write_chain(&mut io, &meta, &[5, 9, 6]).unwrap();
        assert_eq!(read_chain(&mut io, &meta, 5).unwrap(), vec![5, 9, 6]);
        assert!(is_eoc(read_entry(&mut io, &meta, 6, 0).unwrap()));
    }

    #[test]
    fn test_read_chain_bounded_on_loop() {
        let (mut buf, meta) = blank();
        let mut io = MemScanIO::new(&mut buf);

        write_entry(&mut io, &meta, 10, 11).unwrap();
        write_entry(&mut io, &meta, 11, 10).unwrap();
        let chain = read_chain(&mut io, &meta, 10).unwrap();
        assert_eq!(chain.len(), meta.cluster_count as usize + 1);
    }

    #[test]
    fn test_reserved_entries() {
        let (mut buf, meta) = blank();
        let mut io = MemScanIO::new(&mut buf);
        write_reserved(&mut io, &meta).unwrap();
        assert_eq!(read_entry(&mut io, &meta, 0, 0).unwrap(), 0xFF0);
        assert_eq!(read_entry(&mut io, &meta, 1, 0).unwrap(), 0xFFF);
    }
}
