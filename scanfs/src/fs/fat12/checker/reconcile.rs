// SPDX-License-Identifier: MIT

use scanio::prelude::*;

use crate::fs::fat12::{constant::*, fat::chain, meta::*};

/// How a declared file size relates to the bytes its chain allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeVerdict {
    /// Declared size 0: never checked.
    Exempt,
    Consistent,
    /// The chain holds at least a slack's worth of whole clusters past the declared size.
    TruncateChain,
    /// The declared size exceeds what the chain allocates.
    ShrinkEntry,
}

/// Compares a declared size `declared` against the allocated `measured` bytes.
///
/// The chain is cut when `declared <= measured - slack` and at least one whole
/// cluster would be released, so a repaired entry always classifies as
/// consistent afterwards. With one-cluster slack the consistent window is
/// `measured - cluster < declared <= measured`.
pub fn classify_size(declared: u32, measured: u32, slack: u32, cluster_size: u32) -> SizeVerdict {
    if declared == 0 {
        return SizeVerdict::Exempt;
    }
    let cluster_size = cluster_size.max(1);
    if measured > slack
        && declared <= measured - slack
        && declared.div_ceil(cluster_size) < measured / cluster_size
    {
        SizeVerdict::TruncateChain
    } else if declared > measured {
        SizeVerdict::ShrinkEntry
    } else {
        SizeVerdict::Consistent
    }
}

/// Cuts `clusters` after the cluster holding byte `keep_bytes - 1`.
///
/// The last kept cluster becomes end-of-chain and every later cluster is freed
/// in all FAT copies. Returns the number of clusters released.
pub fn truncate_chain<IO: ScanIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    clusters: &[u16],
    keep_bytes: u32,
) -> ScanIOResult<usize> {
    let keep = (keep_bytes.div_ceil(meta.unit_size() as u32) as usize).max(1);
    if keep >= clusters.len() {
        return Ok(0);
    }

    chain::write_entry(io, meta, clusters[keep - 1], FAT12_CLUST_EOFS)?;
    for &c in &clusters[keep..] {
        chain::write_entry(io, meta, c, FAT12_CLUST_FREE)?;
    }
    Ok(clusters.len() - keep)
}
