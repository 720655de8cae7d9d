// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use crate::fs::fat12::constant::*;

/// An 8.3 name split into its padded on-disk fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortName {
    pub name: [u8; FAT_NAME_LEN],
    pub ext: [u8; FAT_EXT_LEN],
    /// The source had no extension and the `___` placeholder was used.
    pub ext_defaulted: bool,
}

/// Builds an 8.3 name from a path or bare file name.
///
/// Any directory prefix is dropped, letters are upper-cased, the base and
/// extension are split on the last `.` and truncated to 8 and 3 bytes.
pub fn to_short_name(path: &str) -> ShortName {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);

    let (base, ext) = match file.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() => (base, Some(ext)),
        Some((base, _)) => (base, None),
        None => (file, None),
    };

    let mut name = [b' '; FAT_NAME_LEN];
    for (dst, src) in name.iter_mut().zip(base.bytes()) {
        *dst = src.to_ascii_uppercase();
    }

    let mut out = [b' '; FAT_EXT_LEN];
    let ext_defaulted = match ext {
        Some(ext) => {
            for (dst, src) in out.iter_mut().zip(ext.bytes()) {
                *dst = src.to_ascii_uppercase();
            }
            false
        }
        None => {
            out = *FAT_PLACEHOLDER_EXT;
            true
        }
    };

    ShortName {
        name,
        ext: out,
        ext_defaulted,
    }
}

/// Renders padded 8.3 fields as `NAME` or `NAME.EXT`.
pub fn decode_short_name(name: &[u8], ext: &[u8]) -> String {
    let base = trim_padding(name);
    let ext = trim_padding(ext);

    let mut out = String::with_capacity(base.len() + ext.len() + 1);
    out.extend(base.iter().map(|&b| b as char));
    if !ext.is_empty() {
        out.push('.');
        out.extend(ext.iter().map(|&b| b as char));
    }
    out
}

fn trim_padding(field: &[u8]) -> &[u8] {
    let end = field
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    &field[..end]
}
