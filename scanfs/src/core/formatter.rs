// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsFormatterError, FsFormatterResult};

/// A Formatter for a filesystem type.
///
/// Implementations encapsulate all required state (I/O backend, metadata) and
/// lay down the low-level structure of an empty volume.
pub trait FsFormatter {
    /// Format the filesystem.
    ///
    /// - `full_format`: if `true`, also zero the data region
    #[must_use = "format result must be checked for errors"]
    fn format(&mut self, full_format: bool) -> FsFormatterResult;
}
