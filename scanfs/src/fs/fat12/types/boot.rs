// SPDX-License-Identifier: MIT

use zerocopy::byteorder::{LE, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::errors::*;
use crate::fs::fat12::{constant::*, meta::Fat12Meta};

/// Boot sector with the DOS 4.0 extended BPB, as laid out at offset 0 of a FAT12 volume.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
#[repr(C, packed)]
pub struct Fat12Bpb {
    pub jump_boot: [u8; 3],
    pub oem_name: [u8; 8],
    pub bytes_per_sector: U16<LE>,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: U16<LE>,
    pub num_fats: u8,
    pub root_entry_count: U16<LE>,
    pub total_sectors_16: U16<LE>,
    pub media: u8,
    pub fat_size_16: U16<LE>,
    pub sectors_per_track: U16<LE>,
    pub num_heads: U16<LE>,
    pub hidden_sectors: U32<LE>,
    pub total_sectors_32: U32<LE>,

    // Extended BPB
    pub drive_number: u8,
    pub reserved1: u8,
    pub boot_signature: u8,
    pub volume_id: U32<LE>,
    pub volume_label: [u8; 11],
    pub fs_type: [u8; 8],

    pub boot_code: [u8; FAT_BOOT_CODE_SIZE],
    pub signature: [u8; 2],
}

const _: () = assert!(core::mem::size_of::<Fat12Bpb>() == 512);

impl Fat12Bpb {
    pub fn from_meta(meta: &Fat12Meta) -> Self {
        let (total_16, total_32) = if meta.total_sectors <= u16::MAX as u32 {
            (meta.total_sectors as u16, 0)
        } else {
            (0, meta.total_sectors)
        };
        Self {
            jump_boot: FAT_JUMP_BOOT,
            oem_name: *FAT_OEM_NAME,
            bytes_per_sector: U16::new(meta.bytes_per_sector),
            sectors_per_cluster: meta.sectors_per_cluster,
            reserved_sectors: U16::new(meta.reserved_sectors),
            num_fats: meta.num_fats,
            root_entry_count: U16::new(meta.root_entry_count),
            total_sectors_16: U16::new(total_16),
            media: meta.media,
            fat_size_16: U16::new(meta.fat_size_sectors),
            sectors_per_track: U16::new(FAT_SECTORS_PER_TRACK),
            num_heads: U16::new(FAT_HEADS),
            hidden_sectors: U32::new(FAT_HIDDEN_SECTORS),
            total_sectors_32: U32::new(total_32),
            drive_number: FAT_DRIVE_NUMBER,
            reserved1: 0,
            boot_signature: FAT_BOOT_SIGNATURE,
            volume_id: U32::new(meta.volume_id),
            volume_label: meta.volume_label,
            fs_type: *FAT_FS_TYPE,
            boot_code: [0u8; FAT_BOOT_CODE_SIZE],
            signature: FAT_SIGNATURE,
        }
    }

    /// Total sector count, whichever of the 16 or 32-bit fields carries it.
    pub fn total_sectors(&self) -> u32 {
        match self.total_sectors_16.get() {
            0 => self.total_sectors_32.get(),
            n => n as u32,
        }
    }

    /// Checks the boot signature only; geometry is validated by [`Fat12Meta::from_bpb`].
    pub fn validate(&self) -> FsParsingResult {
        if self.signature != FAT_SIGNATURE {
            return Err(FsParsingError::Invalid("Missing 0x55AA boot signature"));
        }
        Ok(())
    }
}

impl Default for Fat12Bpb {
    fn default() -> Self {
        Self::from_meta(&Fat12Meta::floppy_1440k())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_offsets() {
        let bpb = Fat12Bpb::default();
        let raw = bpb.as_bytes();
        assert_eq!(&raw[0..3], &FAT_JUMP_BOOT);
        assert_eq!(u16::from_le_bytes([raw[11], raw[12]]), 512);
        assert_eq!(raw[13], 1);
        assert_eq!(u16::from_le_bytes([raw[17], raw[18]]), 224);
        assert_eq!(u16::from_le_bytes([raw[19], raw[20]]), 2880);
        assert_eq!(u16::from_le_bytes([raw[22], raw[23]]), 9);
        assert_eq!(raw[38], FAT_BOOT_SIGNATURE);
        assert_eq!(&raw[54..62], FAT_FS_TYPE);
        assert_eq!(&raw[510..512], &FAT_SIGNATURE);
    }

    #[test]
    fn test_validate_signature() {
        let mut bpb = Fat12Bpb::default();
        assert!(bpb.validate().is_ok());
        bpb.signature = [0, 0];
        assert!(bpb.validate().is_err());
    }

    #[test]
    fn test_total_sectors_fallback() {
        let mut bpb = Fat12Bpb::default();
        assert_eq!(bpb.total_sectors(), 2880);
        bpb.total_sectors_16 = U16::new(0);
        bpb.total_sectors_32 = U32::new(70_000);
        assert_eq!(bpb.total_sectors(), 70_000);
    }
}
