// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use zerocopy::byteorder::{LE, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::fs::fat12::{
    attr::Fat12Attributes,
    constant::*,
    utils::{ShortName, decode_short_name},
};

/// Classification of a 32-byte directory slot, in the order the checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirEntryKind {
    /// First byte 0x00: never used.
    Empty,
    /// First byte 0xE5: free for reuse.
    Deleted,
    /// `.` or `..`.
    Dot,
    LongNameFragment,
    VolumeLabel,
    HiddenDirectory,
    Directory,
    RegularFile,
}

/// Result of decoding one slot.
///
/// `name` and `start_cluster` are only meaningful for [`DirEntryKind::Directory`]
/// and [`DirEntryKind::RegularFile`]; they are empty/zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEntry {
    pub kind: DirEntryKind,
    pub name: String,
    pub start_cluster: u16,
}

#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug, Default)]
#[repr(C, packed)]
pub struct Fat12Entry {
    pub name: [u8; FAT_NAME_LEN],
    pub extension: [u8; FAT_EXT_LEN],
    pub attr: u8,
    pub nt_reserved: u8,
    pub create_time_tenth: u8,
    pub create_time: U16<LE>,
    pub create_date: U16<LE>,
    pub access_date: U16<LE>,
    pub ea_index: U16<LE>,
    pub write_time: U16<LE>,
    pub write_date: U16<LE>,
    pub start_cluster: U16<LE>,
    pub file_size: U32<LE>,
}

const _: () = assert!(core::mem::size_of::<Fat12Entry>() == FAT_DIRENT_SIZE);

impl Fat12Entry {
    pub fn new(name: [u8; 8], extension: [u8; 3], attr: Fat12Attributes, cluster: u16, size: u32) -> Self {
        Self {
            name,
            extension,
            attr: attr.bits(),
            start_cluster: U16::new(cluster),
            file_size: U32::new(size),
            ..Self::default()
        }
    }

    /// A regular file entry with normal attributes.
    pub fn file(short: &ShortName, cluster: u16, size: u32) -> Self {
        Self::new(short.name, short.ext, Fat12Attributes::normal(), cluster, size)
    }

    pub fn dir(name: &[u8; 8], cluster: u16) -> Self {
        Self::new(*name, [b' '; 3], Fat12Attributes::DIRECTORY, cluster, 0)
    }

    pub fn volume_label(label: &[u8; 11]) -> Self {
        let mut name = [b' '; 8];
        let mut ext = [b' '; 3];
        name.copy_from_slice(&label[..8]);
        ext.copy_from_slice(&label[8..]);
        Self::new(name, ext, Fat12Attributes::VOLUME_ID, 0, 0)
    }

    pub fn dot(current_cluster: u16) -> Self {
        Self::dotted(FAT_DOT_NAME, current_cluster)
    }

    pub fn dotdot(parent_cluster: u16) -> Self {
        Self::dotted(FAT_DOTDOT_NAME, parent_cluster)
    }

    fn dotted(raw: &[u8; 11], cluster: u16) -> Self {
        let mut name = [b' '; 8];
        let mut ext = [b' '; 3];
        name.copy_from_slice(&raw[..8]);
        ext.copy_from_slice(&raw[8..]);
        Self::new(name, ext, Fat12Attributes::DIRECTORY, cluster, 0)
    }

    #[inline]
    pub fn attributes(&self) -> Fat12Attributes {
        Fat12Attributes::from_bits_retain(self.attr)
    }

    #[inline]
    pub fn first_cluster(&self) -> u16 {
        self.start_cluster.get()
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.file_size.get()
    }

    #[inline]
    pub fn set_size(&mut self, size: u32) {
        self.file_size = U32::new(size);
    }

    pub fn kind(&self) -> DirEntryKind {
        match self.name[0] {
            FAT_SLOT_EMPTY => DirEntryKind::Empty,
            FAT_SLOT_DELETED => DirEntryKind::Deleted,
            FAT_SLOT_DOT => DirEntryKind::Dot,
            _ => {
                let attr = self.attributes();
                if attr.is_lfn() {
                    DirEntryKind::LongNameFragment
                } else if attr.is_volume_label() {
                    DirEntryKind::VolumeLabel
                } else if attr.is_dir() && attr.is_hidden() {
                    DirEntryKind::HiddenDirectory
                } else if attr.is_dir() {
                    DirEntryKind::Directory
                } else {
                    DirEntryKind::RegularFile
                }
            }
        }
    }

    /// True for records a directory writer must not overwrite.
    pub fn is_live(&self) -> bool {
        matches!(
            self.kind(),
            DirEntryKind::Directory
                | DirEntryKind::RegularFile
                | DirEntryKind::HiddenDirectory
                | DirEntryKind::VolumeLabel
        )
    }

    /// `NAME.EXT` with the space and NUL padding removed.
    pub fn display_name(&self) -> String {
        decode_short_name(&self.name, &self.extension)
    }

    pub fn decode(&self) -> DecodedEntry {
        let kind = self.kind();
        match kind {
            DirEntryKind::Directory | DirEntryKind::RegularFile => DecodedEntry {
                kind,
                name: self.display_name(),
                start_cluster: self.first_cluster(),
            },
            _ => DecodedEntry {
                kind,
                name: String::new(),
                start_cluster: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::fat12::utils::to_short_name;

    fn raw_entry(first: u8, attr: u8) -> Fat12Entry {
        let mut e = Fat12Entry::new(*b"NAME    ", *b"TXT", Fat12Attributes::normal(), 7, 100);
        e.name[0] = first;
        e.attr = attr;
        e
    }

    #[test]
    fn test_on_disk_layout() {
        let e = Fat12Entry::new(
            *b"HELLO   ",
            *b"TXT",
            Fat12Attributes::ARCHIVE,
            0x0123,
            0x0102_0304,
        );
        let raw = e.as_bytes();
        assert_eq!(raw.len(), 32);
        assert_eq!(&raw[0..8], b"HELLO   ");
        assert_eq!(&raw[8..11], b"TXT");
        assert_eq!(raw[11], 0x20);
        assert_eq!(&raw[26..28], &[0x23, 0x01]);
        assert_eq!(&raw[28..32], &[0x04, 0x03, 0x02, 0x01]);

        let back = Fat12Entry::read_from_bytes(raw).unwrap();
        assert_eq!(back.first_cluster(), 0x0123);
        assert_eq!(back.size(), 0x0102_0304);
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(raw_entry(0x00, 0x10).kind(), DirEntryKind::Empty);
        assert_eq!(raw_entry(0xE5, 0x0F).kind(), DirEntryKind::Deleted);
        assert_eq!(raw_entry(b'.', 0x10).kind(), DirEntryKind::Dot);
        assert_eq!(raw_entry(b'A', 0x0F).kind(), DirEntryKind::LongNameFragment);
        assert_eq!(raw_entry(b'A', 0x08).kind(), DirEntryKind::VolumeLabel);
        assert_eq!(raw_entry(b'A', 0x12).kind(), DirEntryKind::HiddenDirectory);
        assert_eq!(raw_entry(b'A', 0x10).kind(), DirEntryKind::Directory);
        assert_eq!(raw_entry(b'A', 0x20).kind(), DirEntryKind::RegularFile);
        // Hidden files are still regular files.
        assert_eq!(raw_entry(b'A', 0x02).kind(), DirEntryKind::RegularFile);
    }

    #[test]
    fn test_decode_only_names_live_entries() {
        let file = Fat12Entry::file(&to_short_name("found1.dat"), 40, 512).decode();
        assert_eq!(file.kind, DirEntryKind::RegularFile);
        assert_eq!(file.name, "FOUND1.DAT");
        assert_eq!(file.start_cluster, 40);

        let dir = Fat12Entry::dir(b"SUB     ", 9).decode();
        assert_eq!(dir.name, "SUB");
        assert_eq!(dir.start_cluster, 9);

        let hidden = raw_entry(b'T', 0x12).decode();
        assert_eq!(hidden.kind, DirEntryKind::HiddenDirectory);
        assert_eq!(hidden.name, "");
        assert_eq!(hidden.start_cluster, 0);
    }

    #[test]
    fn test_live_records() {
        assert!(raw_entry(b'A', 0x20).is_live());
        assert!(raw_entry(b'A', 0x12).is_live());
        assert!(raw_entry(b'A', 0x08).is_live());
        assert!(!raw_entry(0x00, 0x20).is_live());
        assert!(!raw_entry(0xE5, 0x20).is_live());
        assert!(!raw_entry(b'A', 0x0F).is_live());
        assert!(!Fat12Entry::dot(4).is_live());
    }

    #[test]
    fn test_zeroed_slot_has_empty_name() {
        let zero = Fat12Entry::default();
        assert_eq!(zero.kind(), DirEntryKind::Empty);
        assert_eq!(zero.display_name(), "");
        assert_eq!(zero.decode().name, "");
    }

    #[test]
    fn test_dot_entries() {
        assert_eq!(Fat12Entry::dot(5).kind(), DirEntryKind::Dot);
        assert_eq!(Fat12Entry::dotdot(0).kind(), DirEntryKind::Dot);
        assert_eq!(&Fat12Entry::dotdot(0).name, b"..      ");
    }

    #[test]
    fn test_set_size() {
        let mut e = Fat12Entry::file(&to_short_name("a.bin"), 2, 10);
        e.set_size(2048);
        assert_eq!(e.size(), 2048);
    }
}
