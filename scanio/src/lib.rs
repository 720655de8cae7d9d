// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod errors;
mod macros;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::ScanIO;
    pub use super::ScanIOExt;
    pub use super::ScanIOStructExt;
    pub use super::errors::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemScanIO;

    #[cfg(feature = "std")]
    pub use super::std::StdScanIO;
}

use errors::*;

/// Size of the scratch buffer used for chunked and zero-fill operations.
pub const BLOCK_BUF_SIZE: usize = 4096;

/// Byte-addressable access to a disk image.
///
/// Offsets are absolute within the image. Implementations may target RAM,
/// files or block devices.
pub trait ScanIO {
    /// Writes `data` at `offset`.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> ScanIOResult;

    /// Reads `buf.len()` bytes into `buf` from `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> ScanIOResult;
}

/// Convenience helpers available on every `ScanIO`.
pub trait ScanIOExt: ScanIO {
    /// Reads `buf.len()` bytes from `offset` in chunks of `chunk_size` or less.
    #[inline(always)]
    fn read_in_chunks(&mut self, offset: u64, buf: &mut [u8], chunk_size: usize) -> ScanIOResult {
        let mut off = offset;
        for part in buf.chunks_mut(chunk_size.max(1)) {
            self.read_at(off, part)?;
            off += part.len() as u64;
        }
        Ok(())
    }

    /// Fills a region with zeroes.
    #[inline(always)]
    fn zero_fill(&mut self, offset: u64, len: usize) -> ScanIOResult {
        const ZERO_BUF: [u8; BLOCK_BUF_SIZE] = [0u8; BLOCK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(ZERO_BUF.len());
            self.write_at(off, &ZERO_BUF[..chunk])?;
            off += chunk as u64;
            remaining -= chunk;
        }
        Ok(())
    }

    // Little-endian accessors for multi-byte on-disk fields
    scanio_impl_primitive_rw!(u16, u32);
}

impl<T: ScanIO + ?Sized> ScanIOExt for T {}

/// Reads and writes plain-old-data structs through zerocopy.
pub trait ScanIOStructExt: ScanIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> ScanIOResult<T> {
        let size = core::mem::size_of::<T>();
        if size > BLOCK_BUF_SIZE {
            return Err(ScanIOError::Invalid("read_struct: type too large"));
        }
        let mut buf = [0u8; BLOCK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| ScanIOError::Other("read_struct failed"))
    }

    /// Writes a struct of type `T` at the given offset.
    fn write_struct<T: zerocopy::IntoBytes + zerocopy::Immutable>(
        &mut self,
        offset: u64,
        val: &T,
    ) -> ScanIOResult {
        self.write_at(offset, val.as_bytes())
    }
}

impl<T: ScanIO + ?Sized> ScanIOStructExt for T {}
