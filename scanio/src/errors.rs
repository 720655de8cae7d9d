// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for image IO operations.
pub type ScanIOResult<T = ()> = core::result::Result<T, ScanIOError>;

/// Error type for image IO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanIOError {
    Other(&'static str),
    Invalid(&'static str),
    OutOfBounds,
    Unsupported,
}

impl ScanIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            ScanIOError::Other(msg) => msg,
            ScanIOError::Invalid(msg) => msg,
            ScanIOError::OutOfBounds => "Out of bounds",
            ScanIOError::Unsupported => "Unsupported operation",
        }
    }
}

impl From<&'static str> for ScanIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        ScanIOError::Other(msg)
    }
}

impl fmt::Display for ScanIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())
    }
}

impl core::error::Error for ScanIOError {}
