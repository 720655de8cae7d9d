// SPDX-License-Identifier: MIT

use crate::{ScanIO, ScanIOError, ScanIOResult};

/// In-memory image backend over a mutable byte slice.
///
/// Repairs land directly in the borrowed buffer; persisting it is up to the caller.
#[derive(Debug)]
pub struct MemScanIO<'a> {
    buffer: &'a mut [u8],
}

impl<'a> MemScanIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    fn range(&self, offset: u64, len: usize) -> ScanIOResult<core::ops::Range<usize>> {
        let end = offset
            .checked_add(len as u64)
            .ok_or(ScanIOError::OutOfBounds)?;
        if end > self.buffer.len() as u64 {
            return Err(ScanIOError::OutOfBounds);
        }
        Ok(offset as usize..end as usize)
    }
}

impl<'a> ScanIO for MemScanIO<'a> {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> ScanIOResult {
        let range = self.range(offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanIOResult {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> ScanIOResult {
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_rw() {
        let mut buf = [0u8; 256];
        let mut io = MemScanIO::new(&mut buf);
        io.write_at(10, &[1, 2, 3, 4]).unwrap();

        let mut output = [0u8; 4];
        io.read_at(10, &mut output).unwrap();
        assert_eq!(output, [1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = [0u8; 16];
        let mut io = MemScanIO::new(&mut buf);
        assert_eq!(io.write_at(14, &[0; 4]), Err(ScanIOError::OutOfBounds));
        let mut out = [0u8; 2];
        assert_eq!(io.read_at(u64::MAX, &mut out), Err(ScanIOError::OutOfBounds));
        assert!(io.read_at(14, &mut out).is_ok());
    }

    #[test]
    fn test_primitive_le() {
        let mut buf = [0u8; 16];
        let mut io = MemScanIO::new(&mut buf);
        io.write_u16_at(0, 0x1234).unwrap();
        io.write_u32_at(4, 0xDEAD_BEEF).unwrap();
        assert_eq!(io.read_u16_at(0).unwrap(), 0x1234);
        assert_eq!(io.read_u32_at(4).unwrap(), 0xDEAD_BEEF);
        drop(io);
        assert_eq!(&buf[0..2], &[0x34, 0x12]);
        assert_eq!(&buf[4..8], &[0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_zero_fill() {
        let mut buf = [0xFF; 64];
        let mut io = MemScanIO::new(&mut buf);

        io.zero_fill(10, 8).unwrap();

        let mut output = [0xAA; 8];
        io.read_at(10, &mut output).unwrap();
        assert_eq!(output, [0u8; 8]);
        io.read_at(18, &mut output[..1]).unwrap();
        assert_eq!(output[0], 0xFF);
    }
}
