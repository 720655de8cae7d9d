// SPDX-License-Identifier: MIT

use std::io::{Error, Read, Seek, SeekFrom, Write};

use crate::{ScanIO, ScanIOError, ScanIOResult};

/// Image backend over any seekable stream (files, cursors).
#[derive(Debug)]
pub struct StdScanIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Write + Seek> StdScanIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }
}

impl<'a, T: Read + Write + Seek> ScanIO for StdScanIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> ScanIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> ScanIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> ScanIOResult {
        self.io.flush()?;
        Ok(())
    }
}

impl From<Error> for ScanIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ScanIOError::OutOfBounds,
            std::io::ErrorKind::Unsupported => ScanIOError::Unsupported,
            _ => {
                // Leak the string to produce a 'static str. Acceptable for error mapping.
                let leaked: &'static str = Box::leak(e.to_string().into_boxed_str());
                ScanIOError::Other(leaked)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;
    use tempfile::tempfile;

    #[test]
    fn test_rw() {
        let mut file = tempfile().unwrap();
        let mut io = StdScanIO::new(&mut file);
        io.write_at(10, &[1, 2, 3, 4]).unwrap();

        let mut output = [0u8; 4];
        io.read_at(10, &mut output).unwrap();
        assert_eq!(output, [1, 2, 3, 4]);
    }

    #[test]
    fn test_short_read_is_out_of_bounds() {
        let mut file = tempfile().unwrap();
        let mut io = StdScanIO::new(&mut file);
        io.write_at(0, &[0u8; 8]).unwrap();

        let mut output = [0u8; 16];
        assert_eq!(io.read_at(0, &mut output), Err(ScanIOError::OutOfBounds));
    }

    #[test]
    fn test_cursor_backend() {
        let mut cursor = std::io::Cursor::new(vec![0u8; 32]);
        let mut io = StdScanIO::new(&mut cursor);
        io.write_u16_at(2, 0xFFF8).unwrap();
        assert_eq!(io.read_u16_at(2).unwrap(), 0xFFF8);
        io.flush().unwrap();
        assert_eq!(&cursor.get_ref()[2..4], &[0xF8, 0xFF]);
    }
}
