// SPDX-License-Identifier: MIT

/// Statistics collected during a directory tree walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkerStats {
    /// Number of directories visited, the root included.
    pub dirs_visited: usize,
    /// Number of regular files whose size was reconciled.
    pub files_checked: usize,
    /// Number of directory slots decoded.
    pub entries_scanned: usize,
    /// Maximum directory depth reached.
    pub max_depth: usize,
}

impl WalkerStats {
    pub fn new() -> Self {
        Self::default()
    }
}
