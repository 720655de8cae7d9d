// SPDX-License-Identifier: MIT

pub use crate::core::meta::*;

use crate::core::errors::*;
use crate::ensure;
use crate::fs::fat12::{constant::*, types::Fat12Bpb};

/// Geometry of a FAT12 volume, derived once from its boot sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fat12Meta {
    pub volume_id: u32,
    pub volume_label: [u8; 11],

    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub bytes_per_cluster: u32,
    pub reserved_sectors: u16,
    pub total_sectors: u32,
    pub media: u8,

    pub num_fats: u8,
    pub fat_offset_bytes: u64,
    pub fat_size_sectors: u16,

    pub root_entry_count: u16,
    pub root_dir_offset: u64,
    pub root_dir_sectors: u32,

    pub data_offset: u64,
    pub cluster_count: u32,
}

impl Fat12Meta {
    /// Standard 3.5" 1.44 MB floppy geometry.
    pub fn floppy_1440k() -> Self {
        Self::new_custom(
            FAT_TOTAL_SECTORS_16 as u32,
            FAT_SECTOR_SIZE,
            FAT_SECTORS_PER_CLUSTER,
            FAT_RESERVED_SECTORS,
            FAT_NUM_FATS,
            FAT_ROOT_ENTRY_COUNT,
            None,
        )
    }

    /// Builds a layout for a blank volume; the FAT size is computed to fit the data region.
    pub fn new_custom(
        total_sectors: u32,
        bytes_per_sector: u16,
        sectors_per_cluster: u8,
        reserved_sectors: u16,
        num_fats: u8,
        root_entry_count: u16,
        volume_label: Option<&str>,
    ) -> Self {
        let mut label = *FAT_VOLUME_LABEL_EMPTY;
        if let Some(text) = volume_label {
            label = [b' '; 11];
            for (i, b) in text.bytes().take(11).enumerate() {
                label[i] = b.to_ascii_uppercase();
            }
        }

        let root_dir_sectors = root_dir_sectors(root_entry_count, bytes_per_sector);
        let (fat_size_sectors, _) = converge_fat12_layout(
            bytes_per_sector as u32,
            total_sectors,
            reserved_sectors as u32 + root_dir_sectors,
            num_fats,
            sectors_per_cluster as u32,
        );

        Self::layout(
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors,
            num_fats,
            fat_size_sectors as u16,
            root_entry_count,
            total_sectors,
            FAT_MEDIA_DESCRIPTOR,
            0,
            label,
        )
    }

    /// Derives the geometry of an existing volume from its boot sector.
    pub fn from_bpb(bpb: &Fat12Bpb) -> FsParsingResult<Self> {
        let bps = bpb.bytes_per_sector.get();
        let spc = bpb.sectors_per_cluster;
        ensure!(
            bps.is_power_of_two(),
            FsParsingError::Invalid("BytesPerSector not power of two")
        );
        ensure!(
            spc.is_power_of_two(),
            FsParsingError::Invalid("SectorsPerCluster not power of two")
        );
        ensure!(bpb.num_fats != 0, FsParsingError::Invalid("NumberOfFATs == 0"));
        let fat_size = bpb.fat_size_16.get();
        ensure!(fat_size != 0, FsParsingError::Invalid("FATSz16 == 0"));
        let root_entries = bpb.root_entry_count.get();
        ensure!(root_entries != 0, FsParsingError::Invalid("RootEntryCount == 0"));

        let total = bpb.total_sectors();
        let overhead = bpb.reserved_sectors.get() as u32
            + bpb.num_fats as u32 * fat_size as u32
            + root_dir_sectors(root_entries, bps);
        ensure!(total > overhead, FsParsingError::Corrupted);

        let meta = Self::layout(
            bps,
            spc,
            bpb.reserved_sectors.get(),
            bpb.num_fats,
            fat_size,
            root_entries,
            total,
            bpb.media,
            bpb.volume_id.get(),
            bpb.volume_label,
        );

        ensure!(
            meta.cluster_count < FAT12_MAX_CLUSTER_COUNT,
            FsParsingError::Unsupported
        );
        let fat_needed = ((meta.cluster_count as u64 + 2) * 3).div_ceil(2);
        ensure!(
            fat_needed <= meta.fat_bytes(),
            FsParsingError::Invalid("FAT too small for cluster count")
        );
        Ok(meta)
    }

    #[allow(clippy::too_many_arguments)]
    fn layout(
        bytes_per_sector: u16,
        sectors_per_cluster: u8,
        reserved_sectors: u16,
        num_fats: u8,
        fat_size_sectors: u16,
        root_entry_count: u16,
        total_sectors: u32,
        media: u8,
        volume_id: u32,
        volume_label: [u8; 11],
    ) -> Self {
        let bps = bytes_per_sector as u64;
        let root_dir_sectors = root_dir_sectors(root_entry_count, bytes_per_sector);
        let fat_offset_bytes = reserved_sectors as u64 * bps;
        let root_dir_offset = fat_offset_bytes + num_fats as u64 * fat_size_sectors as u64 * bps;
        let data_offset = root_dir_offset + root_dir_sectors as u64 * bps;

        let overhead = reserved_sectors as u32
            + num_fats as u32 * fat_size_sectors as u32
            + root_dir_sectors;
        let cluster_count = total_sectors.saturating_sub(overhead) / sectors_per_cluster as u32;

        Self {
            volume_id,
            volume_label,
            bytes_per_sector,
            sectors_per_cluster,
            bytes_per_cluster: bytes_per_sector as u32 * sectors_per_cluster as u32,
            reserved_sectors,
            total_sectors,
            media,
            num_fats,
            fat_offset_bytes,
            fat_size_sectors,
            root_entry_count,
            root_dir_offset,
            root_dir_sectors,
            data_offset,
            cluster_count,
        }
    }

    /// Size of one FAT copy in bytes.
    #[inline]
    pub fn fat_bytes(&self) -> u64 {
        self.fat_size_sectors as u64 * self.bytes_per_sector as u64
    }

    /// Byte offset of the 12-bit entry for `cluster` inside FAT copy `fat_index`.
    #[inline]
    pub fn fat_entry_offset(&self, cluster: u16, fat_index: u8) -> u64 {
        self.fat_offset_bytes + fat_index as u64 * self.fat_bytes() + (cluster as u64 * 3) / 2
    }

    #[inline]
    pub fn root_dir_bytes(&self) -> u64 {
        self.root_entry_count as u64 * FAT_DIRENT_SIZE as u64
    }

    /// A cluster number that may appear inside a chain: in the data region and not a sentinel.
    #[inline]
    pub fn is_valid_cluster(&self, cluster: u16) -> bool {
        self.is_valid_unit(cluster) && cluster < FAT12_CLUST_BAD
    }

    /// Exclusive upper bound of the data cluster numbers.
    #[inline]
    pub fn cluster_end(&self) -> u16 {
        (self.cluster_count + FAT12_CLUST_FIRST as u32) as u16
    }
}

impl FsMeta<u16> for Fat12Meta {
    fn unit_size(&self) -> usize {
        self.bytes_per_cluster as usize
    }

    /// Cluster 0 stands for the fixed root directory region.
    fn unit_offset(&self, cluster: u16) -> u64 {
        if cluster < FAT12_CLUST_FIRST {
            return self.root_dir_offset;
        }
        self.data_offset + (cluster - FAT12_CLUST_FIRST) as u64 * self.unit_size() as u64
    }

    fn root_unit(&self) -> u16 {
        0
    }

    fn first_data_unit(&self) -> u16 {
        FAT12_CLUST_FIRST
    }

    fn last_data_unit(&self) -> u16 {
        (self.cluster_count + 1) as u16
    }

    fn total_units(&self) -> usize {
        self.cluster_count as usize
    }

    fn size_bytes(&self) -> u64 {
        self.total_sectors as u64 * self.bytes_per_sector as u64
    }
}

#[inline]
fn root_dir_sectors(root_entry_count: u16, bytes_per_sector: u16) -> u32 {
    (root_entry_count as u32 * FAT_DIRENT_SIZE as u32).div_ceil(bytes_per_sector as u32)
}

/// Computes the FAT size (in sectors) and cluster count of a FAT12 layout.
///
/// `fixed_sectors` covers everything that is neither FAT nor data (reserved area
/// and root directory). Iterates until both values stop moving.
pub fn converge_fat12_layout(
    sector_size: u32,
    total_sectors: u32,
    fixed_sectors: u32,
    num_fats: u8,
    sectors_per_cluster: u32,
) -> (u32, u32) {
    let spc = sectors_per_cluster.max(1);
    let sector_size = sector_size.max(1);

    let mut cluster_count = 0u32;
    let mut fat_size = 0u32;

    for _ in 0..32 {
        let entries = cluster_count + FAT12_CLUST_FIRST as u32;
        let fat_size_new = (entries * 3).div_ceil(2).div_ceil(sector_size);
        let fat_area = fat_size * num_fats as u32;
        let data_sectors = total_sectors
            .saturating_sub(fixed_sectors)
            .saturating_sub(fat_area);
        let cluster_count_new = data_sectors / spc;

        if cluster_count_new == cluster_count && fat_size_new == fat_size {
            break;
        }

        cluster_count = cluster_count_new;
        fat_size = fat_size_new;
    }

    (fat_size, cluster_count)
}
