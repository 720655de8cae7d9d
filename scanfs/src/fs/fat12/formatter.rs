// SPDX-License-Identifier: MIT

use scanio::prelude::*;
use zerocopy::IntoBytes;

pub use crate::core::formatter::*;

use crate::fs::fat12::{constant::*, dir::DirRegion, fat::chain, meta::*, types::*};

/// Fat12Formatter:
/// - Writes the boot sector, both FATs with their reserved entries and an empty root directory.
/// - Adds a volume label entry when the geometry carries a label.
/// - Used to build blank images for the CLI and for test fixtures.
pub struct Fat12Formatter<'a, IO: ScanIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Fat12Meta,
}

impl<'a, IO: ScanIO + ?Sized> Fat12Formatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Fat12Meta) -> Self {
        Self { io, meta }
    }

    fn write_boot_sector(&mut self) -> FsFormatterResult {
        let bpb = Fat12Bpb::from_meta(self.meta);
        let offset = FAT_BOOT_SECTOR * self.meta.bytes_per_sector as u64;
        self.io.write_at(offset, bpb.as_bytes())?;
        Ok(())
    }

    fn write_fat_region(&mut self) -> FsFormatterResult {
        let total = self.meta.fat_bytes() * self.meta.num_fats as u64;
        self.io
            .zero_fill(self.meta.fat_offset_bytes, total as usize)?;
        chain::write_reserved(self.io, self.meta)?;
        Ok(())
    }

    fn write_root_dir(&mut self) -> FsFormatterResult {
        self.io.zero_fill(
            self.meta.root_dir_offset,
            self.meta.root_dir_bytes() as usize,
        )?;

        if &self.meta.volume_label != FAT_VOLUME_LABEL_EMPTY {
            let label = Fat12Entry::volume_label(&self.meta.volume_label);
            DirRegion::root(self.meta).write_slot(self.io, 0, &label)?;
        }
        Ok(())
    }

    fn zero_data_region(&mut self) -> FsFormatterResult {
        let len = self
            .meta
            .size_bytes()
            .saturating_sub(self.meta.data_offset);
        self.io.zero_fill(self.meta.data_offset, len as usize)?;
        Ok(())
    }
}

impl<'a, IO: ScanIO + ?Sized> FsFormatter for Fat12Formatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        if self.meta.cluster_count >= FAT12_MAX_CLUSTER_COUNT {
            return Err(FsFormatterError::Invalid("Too many clusters for FAT12"));
        }

        self.write_boot_sector()?;
        self.write_fat_region()?;
        self.write_root_dir()?;

        if full_format {
            self.zero_data_region()?;
        }

        self.io.flush()?;
        Ok(())
    }
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;

    #[test]
    fn test_format_then_parse() {
        let meta = Fat12Meta::floppy_1440k();
        let mut buf = vec![0xAAu8; meta.size_bytes() as usize];
        let mut io = MemScanIO::new(&mut buf);

        Fat12Formatter::new(&mut io, &meta).format(true).unwrap();

        let bpb: Fat12Bpb = io.read_struct(0).unwrap();
        bpb.validate().unwrap();
        assert_eq!(Fat12Meta::from_bpb(&bpb).unwrap(), meta);

        assert_eq!(chain::read_entry(&mut io, &meta, 0, 1).unwrap(), 0xFF0);
        for c in meta.first_data_unit()..=meta.last_data_unit() {
            assert_eq!(chain::read_entry(&mut io, &meta, c, 0).unwrap(), FAT12_CLUST_FREE);
        }
        let root = DirRegion::root(&meta);
        assert_eq!(root.read_slot(&mut io, 0).unwrap().kind(), DirEntryKind::Empty);
    }

    #[test]
    fn test_format_writes_volume_label() {
        let meta = Fat12Meta::new_custom(2880, 512, 1, 1, 2, 224, Some("backup"));
        let mut buf = vec![0u8; meta.size_bytes() as usize];
        let mut io = MemScanIO::new(&mut buf);

        Fat12Formatter::new(&mut io, &meta).format(false).unwrap();

        let label = DirRegion::root(&meta).read_slot(&mut io, 0).unwrap();
        assert_eq!(label.kind(), DirEntryKind::VolumeLabel);
        assert_eq!(&label.name, b"BACKUP  ");
    }

    #[test]
    fn test_format_rejects_fat16_geometry() {
        let meta = Fat12Meta::new_custom(40_000, 512, 1, 1, 2, 512, None);
        let mut buf = vec![0u8; meta.size_bytes() as usize];
        let mut io = MemScanIO::new(&mut buf);
        assert!(Fat12Formatter::new(&mut io, &meta).format(false).is_err());
    }
}
