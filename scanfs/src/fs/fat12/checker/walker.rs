// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{format, string::String, vec::Vec};

use scanio::prelude::*;

use crate::core::checker::{Finding, FsCheckerResult, VerifyReport, VisitedClusters, WalkerStats};
use crate::fs::fat12::{
    dir::DirRegion,
    fat::chain,
    meta::*,
    types::{DirEntryKind, Fat12Entry},
};

use super::Fat12CheckOptions;
use super::chain::measure_chain;
use super::reconcile::{SizeVerdict, classify_size, truncate_chain};

/// What the walker does with each regular file it meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Measure, compare and repair declared sizes.
    Reconcile,
    /// Only record the clusters the tree references.
    MarkOnly,
}

enum DirCursor {
    Root { slot: usize },
    Chain { cluster: u16, slot: usize, steps: usize },
}

struct DirFrame {
    path: String,
    depth: usize,
    cursor: DirCursor,
}

pub struct Fat12Walker<'a, IO: ScanIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Fat12Meta,
    visited: &'a mut VisitedClusters,
    pub stats: WalkerStats,
}

impl<'a, IO: ScanIO + ?Sized> Fat12Walker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Fat12Meta, visited: &'a mut VisitedClusters) -> Self {
        Self {
            io,
            meta,
            visited,
            stats: WalkerStats::default(),
        }
    }

    /// Depth-first, pre-order walk of the tree rooted at the fixed root directory.
    ///
    /// Entries are handled in slot order and a subdirectory is fully walked
    /// before the next slot of its parent, using an explicit stack.
    pub fn walk_from_root(
        &mut self,
        opt: &Fat12CheckOptions,
        mode: WalkMode,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let mut stack = vec![DirFrame {
            path: String::new(),
            depth: 0,
            cursor: DirCursor::Root { slot: 0 },
        }];
        self.visited.mark(self.meta.root_unit());
        self.stats.dirs_visited += 1;

        while let Some(frame) = stack.last_mut() {
            let Some((region, slot)) = self.next_slot(frame, rep)? else {
                stack.pop();
                continue;
            };

            let entry = region.read_slot(self.io, slot)?;
            self.stats.entries_scanned += 1;

            let decoded = entry.decode();
            match decoded.kind {
                DirEntryKind::Directory => {
                    let path = format!("{}/{}", frame.path, decoded.name);
                    let depth = frame.depth + 1;
                    if let Some(child) = self.enter_dir(decoded.start_cluster, path, depth, opt, rep) {
                        stack.push(child);
                    }
                }
                DirEntryKind::RegularFile => {
                    let path = format!("{}/{}", frame.path, decoded.name);
                    match mode {
                        WalkMode::Reconcile => {
                            self.reconcile_file(region, slot, entry, &path, opt, rep)?
                        }
                        WalkMode::MarkOnly => {
                            measure_chain(self.io, self.meta, decoded.start_cluster, self.visited)?;
                        }
                    }
                }
                DirEntryKind::HiddenDirectory => {
                    // Not descended, but its own clusters stay claimed.
                    let clusters = chain::read_chain(self.io, self.meta, entry.first_cluster())?;
                    self.visited.mark_all(&clusters);
                    rep.push(Finding::info(
                        "WALK.HIDDEN",
                        format!("Skipped hidden directory {}/{}", frame.path, entry.display_name()),
                    ));
                }
                DirEntryKind::Empty
                | DirEntryKind::Deleted
                | DirEntryKind::Dot
                | DirEntryKind::LongNameFragment
                | DirEntryKind::VolumeLabel => {}
            }
        }

        Ok(())
    }

    /// Returns the region and slot index of the next slot in `frame`, following
    /// the directory's chain when the current cluster is exhausted.
    fn next_slot(
        &mut self,
        frame: &mut DirFrame,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<Option<(DirRegion, usize)>> {
        match &mut frame.cursor {
            DirCursor::Root { slot } => {
                let region = DirRegion::root(self.meta);
                if *slot >= region.slots {
                    return Ok(None);
                }
                *slot += 1;
                Ok(Some((region, *slot - 1)))
            }
            DirCursor::Chain {
                cluster,
                slot,
                steps,
            } => {
                let mut region = DirRegion::cluster(self.meta, *cluster);
                if *slot >= region.slots {
                    let next = chain::read_entry(self.io, self.meta, *cluster, 0)?;
                    if !self.meta.is_valid_cluster(next) {
                        self.visited.mark(next);
                        return Ok(None);
                    }
                    *steps += 1;
                    if self.visited.is_marked(next) || *steps >= self.meta.cluster_count as usize {
                        rep.push(Finding::warn(
                            "CHAIN.LOOP",
                            format!(
                                "Directory {} chain loops or is cross-linked at cluster {next}",
                                frame.path
                            ),
                        ));
                        return Ok(None);
                    }
                    self.visited.mark(next);
                    *cluster = next;
                    *slot = 0;
                    region = DirRegion::cluster(self.meta, next);
                }
                *slot += 1;
                Ok(Some((region, *slot - 1)))
            }
        }
    }

    fn enter_dir(
        &mut self,
        start: u16,
        path: String,
        depth: usize,
        opt: &Fat12CheckOptions,
        rep: &mut VerifyReport,
    ) -> Option<DirFrame> {
        if !self.meta.is_valid_cluster(start) {
            rep.push(Finding::warn(
                "WALK.START",
                format!("Directory {path} has invalid start cluster {start}"),
            ));
            return None;
        }
        if self.visited.is_marked(start) {
            rep.push(Finding::warn(
                "WALK.LOOP",
                format!("Loop or duplicate ref to dir cluster {start} ({path})"),
            ));
            return None;
        }
        if depth > opt.max_depth {
            rep.push(Finding::warn(
                "WALK.DEPTH",
                format!("Directory depth limit reached ({}) at {path}", opt.max_depth),
            ));
            return None;
        }

        self.visited.mark(start);
        self.stats.dirs_visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        Some(DirFrame {
            path,
            depth,
            cursor: DirCursor::Chain {
                cluster: start,
                slot: 0,
                steps: 0,
            },
        })
    }

    fn reconcile_file(
        &mut self,
        region: DirRegion,
        slot: usize,
        mut entry: Fat12Entry,
        path: &str,
        opt: &Fat12CheckOptions,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        self.stats.files_checked += 1;
        let m = measure_chain(self.io, self.meta, entry.first_cluster(), self.visited)?;

        if m.hit_bad {
            rep.push(Finding::warn(
                "CHAIN.BAD",
                format!("Bad cluster in chain of {path}"),
            ));
        }
        if m.looped {
            rep.push(Finding::warn(
                "CHAIN.LOOP",
                format!("Chain of {path} does not terminate; size left untouched"),
            ));
            return Ok(());
        }

        let declared = entry.size();
        let cluster_size = self.meta.unit_size() as u32;
        let slack = opt.slack.bytes(cluster_size);
        let detail = format!(
            "Inconsistent file: {path} (size in dir entry: {declared}, size in FAT chain: {})",
            m.bytes
        );

        match classify_size(declared, m.bytes, slack, cluster_size) {
            SizeVerdict::Exempt | SizeVerdict::Consistent => {}
            SizeVerdict::TruncateChain if opt.repair => {
                let freed = truncate_chain(self.io, self.meta, &m.clusters, declared)?;
                rep.push(Finding::fixed(
                    "SIZE.TRUNC",
                    format!("{detail}; freed {freed} trailing clusters"),
                ));
            }
            SizeVerdict::ShrinkEntry if opt.repair => {
                entry.set_size(m.bytes);
                region.write_slot(self.io, slot, &entry)?;
                rep.push(Finding::fixed(
                    "SIZE.FIX",
                    format!("{detail}; size set to {}", m.bytes),
                ));
            }
            SizeVerdict::TruncateChain => rep.push(Finding::err("SIZE.TRUNC", detail)),
            SizeVerdict::ShrinkEntry => rep.push(Finding::err("SIZE.FIX", detail)),
        }
        Ok(())
    }
}
