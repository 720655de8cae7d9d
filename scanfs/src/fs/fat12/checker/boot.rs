// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{format, vec};

use scanio::prelude::*;

use crate::core::checker::{Finding, FsCheckerError, FsCheckerResult, VerifyReport};
use crate::fs::fat12::{constant::*, fat::chain, meta::*, types::Fat12Bpb};

pub fn check_boot<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<()> {
    let bpb: Fat12Bpb = io.read_struct(FAT_BOOT_SECTOR * meta.bytes_per_sector as u64)?;
    match bpb.validate() {
        Ok(()) => rep.push(Finding::info("BOOT.OK", "Boot sector signature present")),
        Err(e) => rep.push(Finding::warn("BOOT.SIG", e.msg())),
    }

    match Fat12Meta::from_bpb(&bpb) {
        Ok(parsed) if parsed == *meta => {}
        Ok(_) => rep.push(Finding::warn(
            "BOOT.META",
            "Boot sector geometry differs from the geometry in use",
        )),
        Err(e) => rep.push(Finding::err("BOOT.BPB", e.msg())),
    }

    if bpb.boot_signature == FAT_BOOT_SIGNATURE && &bpb.fs_type != FAT_FS_TYPE {
        rep.push(Finding::info(
            "BOOT.TYPE",
            "Extended BPB does not label the volume FAT12",
        ));
    }
    Ok(())
}

pub fn geometry_sanity(meta: &Fat12Meta, rep: &mut VerifyReport) {
    let bps = meta.bytes_per_sector;
    let spc = meta.sectors_per_cluster;
    if bps == 0 || !bps.is_power_of_two() {
        rep.push(Finding::err("BPB.BPS", "BytesPerSector not power of two"));
    }
    if spc == 0 || !spc.is_power_of_two() {
        rep.push(Finding::err(
            "BPB.SPC",
            "SectorsPerCluster not power of two",
        ));
    }
    if meta.num_fats == 0 {
        rep.push(Finding::err("BPB.FATS", "NumberOfFATs == 0"));
    }
    if meta.fat_size_sectors == 0 {
        rep.push(Finding::err("BPB.FATL", "FATSz16 == 0"));
    }
    if meta.cluster_count >= FAT12_MAX_CLUSTER_COUNT {
        rep.push(Finding::err("BPB.FAT12", "Too many clusters for FAT12"));
    }
    rep.push(Finding::info(
        "BPB.OK",
        format!(
            "Geometry (bps={}, spc={}, fats={}, fat_sectors={}, root_entries={}, clusters={})",
            bps,
            spc,
            meta.num_fats,
            meta.fat_size_sectors,
            meta.root_entry_count,
            meta.cluster_count
        ),
    ));
}

/// Compares every FAT copy against copy 0, entry by entry.
pub fn compare_fat_copies<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    rep: &mut VerifyReport,
) -> FsCheckerResult<()> {
    if meta.num_fats < 2 {
        rep.push(Finding::info("FAT.MIRROR", "Single FAT (no mirror)"));
        return Ok(());
    }

    let len = meta.fat_bytes() as usize;
    let mut primary = vec![0u8; len];
    let mut copy = vec![0u8; len];
    io.read_at(meta.fat_offset_bytes, &mut primary)
        .map_err(FsCheckerError::IO)?;

    let mut mismatches = 0usize;
    for fi in 1..meta.num_fats {
        io.read_at(meta.fat_entry_offset(0, fi), &mut copy)
            .map_err(FsCheckerError::IO)?;
        if primary == copy {
            continue;
        }
        for c in FAT12_CLUST_FIRST..meta.cluster_end() {
            let off = (c as usize * 3) / 2;
            let a = chain::unpack(c, u16::from_le_bytes([primary[off], primary[off + 1]]));
            let b = chain::unpack(c, u16::from_le_bytes([copy[off], copy[off + 1]]));
            if a != b {
                mismatches += 1;
                if mismatches <= 4 {
                    rep.push(Finding::warn(
                        "FAT.MIRROR",
                        format!("Mismatch @cluster {c} (fat0={a:03X} fat{fi}={b:03X})"),
                    ));
                }
            }
        }
    }

    if mismatches == 0 {
        rep.push(Finding::info("FAT.MIRROR", "FAT copies match"));
    } else {
        rep.push(Finding::warn(
            "FAT.MIRROR",
            format!("{mismatches} FAT entries differ between copies"),
        ));
    }
    Ok(())
}
