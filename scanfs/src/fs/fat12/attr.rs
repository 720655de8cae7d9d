// SPDX-License-Identifier: MIT

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fat12Attributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN    = 0x02;
        const SYSTEM    = 0x04;
        const VOLUME_ID = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE   = 0x20;
        const LFN       = 0x0F;
    }
}

impl Fat12Attributes {
    /// Plain file: no attribute bit set.
    pub const fn normal() -> Self {
        Self::empty()
    }

    /// Long-name fragments set all four low bits at once.
    #[inline]
    pub fn is_lfn(self) -> bool {
        self.contains(Fat12Attributes::LFN)
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        self.contains(Fat12Attributes::DIRECTORY)
    }

    #[inline]
    pub fn is_hidden(self) -> bool {
        self.contains(Fat12Attributes::HIDDEN)
    }

    #[inline]
    pub fn is_volume_label(self) -> bool {
        self.contains(Fat12Attributes::VOLUME_ID)
    }
}
