// SPDX-License-Identifier: MIT

use scanio::prelude::*;

use crate::core::errors::*;
use crate::fs::fat12::{constant::*, meta::*, types::Fat12Entry};

/// A contiguous run of 32-byte directory slots: the fixed root region or one directory cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirRegion {
    pub offset: u64,
    pub slots: usize,
}

impl DirRegion {
    pub fn root(meta: &Fat12Meta) -> Self {
        Self {
            offset: meta.root_dir_offset,
            slots: meta.root_entry_count as usize,
        }
    }

    pub fn cluster(meta: &Fat12Meta, cluster: u16) -> Self {
        Self {
            offset: meta.unit_offset(cluster),
            slots: meta.unit_size() / FAT_DIRENT_SIZE,
        }
    }

    #[inline]
    pub fn slot_offset(&self, slot: usize) -> u64 {
        self.offset + (slot * FAT_DIRENT_SIZE) as u64
    }

    pub fn read_slot<IO: ScanIO + ?Sized>(&self, io: &mut IO, slot: usize) -> ScanIOResult<Fat12Entry> {
        if slot >= self.slots {
            return Err(ScanIOError::OutOfBounds);
        }
        io.read_struct(self.slot_offset(slot))
    }

    pub fn write_slot<IO: ScanIO + ?Sized>(
        &self,
        io: &mut IO,
        slot: usize,
        entry: &Fat12Entry,
    ) -> ScanIOResult {
        if slot >= self.slots {
            return Err(ScanIOError::OutOfBounds);
        }
        io.write_struct(self.slot_offset(slot), entry)
    }

    /// Stores `entry` in the first reusable slot and returns its index.
    ///
    /// An empty (0x00) slot is taken and the following slot, if any, is zeroed
    /// so it keeps acting as the end marker, unless that slot still holds a
    /// live record. A deleted (0xE5) slot is simply overwritten.
    pub fn allocate_entry<IO: ScanIO + ?Sized>(
        &self,
        io: &mut IO,
        entry: &Fat12Entry,
    ) -> FsRepairResult<usize> {
        let mut first = [0u8; 1];
        for slot in 0..self.slots {
            io.read_at(self.slot_offset(slot), &mut first)?;
            match first[0] {
                FAT_SLOT_EMPTY => {
                    self.write_slot(io, slot, entry)?;
                    if slot + 1 < self.slots && !self.read_slot(io, slot + 1)?.is_live() {
                        io.zero_fill(self.slot_offset(slot + 1), FAT_DIRENT_SIZE)?;
                    }
                    return Ok(slot);
                }
                FAT_SLOT_DELETED => {
                    self.write_slot(io, slot, entry)?;
                    return Ok(slot);
                }
                _ => {}
            }
        }
        Err(FsRepairError::DirectoryFull)
    }
}
