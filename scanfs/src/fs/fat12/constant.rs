// SPDX-License-Identifier: MIT

// === Disk Layout Parameters (1.44 MB floppy) ===

pub const FAT_SECTOR_SIZE: u16 = 512; // BPB_BytsPerSec
pub const FAT_SECTORS_PER_CLUSTER: u8 = 1; // BPB_SecPerClus
pub const FAT_RESERVED_SECTORS: u16 = 1; // BPB_RsvdSecCnt
pub const FAT_NUM_FATS: u8 = 2; // BPB_NumFATs
pub const FAT_ROOT_ENTRY_COUNT: u16 = 224; // BPB_RootEntCnt
pub const FAT_TOTAL_SECTORS_16: u16 = 2880; // BPB_TotSec16
pub const FAT_FAT_SIZE_16: u16 = 9; // BPB_FATSz16
pub const FAT_MEDIA_DESCRIPTOR: u8 = 0xF0; // BPB_Media
pub const FAT_SECTORS_PER_TRACK: u16 = 18; // BPB_SecPerTrk (CHS hint)
pub const FAT_HEADS: u16 = 2; // BPB_NumHeads (CHS hint)
pub const FAT_HIDDEN_SECTORS: u32 = 0; // BPB_HiddSec

// === FAT Region Parameters ===

pub const FAT12_MASK: u16 = 0x0FFF;
pub const FAT12_CLUST_FREE: u16 = 0x000;
pub const FAT12_CLUST_FIRST: u16 = 0x002;
pub const FAT12_CLUST_BAD: u16 = 0xFF7;
/// Lowest end-of-chain value; also the value written when a chain is cut.
pub const FAT12_CLUST_EOFS: u16 = 0xFF8;
pub const FAT12_CLUST_EOF: u16 = 0xFFF;
/// A volume with this many data clusters or more is FAT16, not FAT12.
pub const FAT12_MAX_CLUSTER_COUNT: u32 = 4085;
/// Every 12-bit cluster number fits below this bound.
pub const FAT12_CLUSTER_SPACE: usize = 1 << 12;

// === Special Sector Numbers ===

pub const FAT_BOOT_SECTOR: u64 = 0;

// === Standard BPB / Extended BPB Constants ===

pub const FAT_JUMP_BOOT: [u8; 3] = [0xEB, 0x3C, 0x90]; // BS_jmpBoot
pub const FAT_OEM_NAME: &[u8; 8] = b"SCANDISK"; // BS_OEMName
pub const FAT_DRIVE_NUMBER: u8 = 0x00; // BS_DrvNum
pub const FAT_BOOT_SIGNATURE: u8 = 0x29; // BS_BootSig
pub const FAT_FS_TYPE: &[u8; 8] = b"FAT12   "; // BS_FilSysType
pub const FAT_SIGNATURE: [u8; 2] = [0x55, 0xAA];
pub const FAT_VOLUME_LABEL_EMPTY: &[u8; 11] = b"NO NAME    ";
pub const FAT_BOOT_CODE_SIZE: usize = 448;

// === Directory Entries ===

pub const FAT_DIRENT_SIZE: usize = 32;
pub const FAT_NAME_LEN: usize = 8;
pub const FAT_EXT_LEN: usize = 3;
pub const FAT_SLOT_EMPTY: u8 = 0x00;
pub const FAT_SLOT_DELETED: u8 = 0xE5;
pub const FAT_SLOT_DOT: u8 = 0x2E;
pub const FAT_DOT_NAME: &[u8; 11] = b".          ";
pub const FAT_DOTDOT_NAME: &[u8; 11] = b"..         ";
/// Extension given to a recovered file whose name has none.
pub const FAT_PLACEHOLDER_EXT: &[u8; 3] = b"___";

// === Recovery ===

pub const ORPHAN_NAME_PREFIX: &str = "found";
pub const ORPHAN_NAME_SUFFIX: &str = ".dat";
pub const DEFAULT_MAX_DEPTH: usize = 256;
