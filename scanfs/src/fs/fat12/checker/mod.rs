// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{format, string::String};

pub use crate::core::checker::*;
use crate::fs::fat12::{constant::*, meta::*};
use scanio::prelude::*;

mod boot;
mod chain;
mod orphan;
mod reconcile;
mod walker;

pub use chain::{ChainMeasure, measure_chain};
pub use orphan::scan_end;
pub use reconcile::{SizeVerdict, classify_size, truncate_chain};
pub use walker::{Fat12Walker, WalkMode};

/// Tolerated gap between a chain's allocated bytes and a file's declared size
/// before the chain is cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SlackPolicy {
    /// One cluster of the volume being checked.
    #[default]
    OneCluster,
    /// A fixed byte count, e.g. 512 for the classic floppy rule.
    Fixed(u32),
}

impl SlackPolicy {
    #[inline]
    pub fn bytes(&self, cluster_size: u32) -> u32 {
        match *self {
            SlackPolicy::OneCluster => cluster_size,
            SlackPolicy::Fixed(n) => n,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Fat12CheckOptions {
    pub phases: VerifyPhases,
    pub fail_fast: bool,
    /// Write fixes back; when false every problem is reported as an error instead.
    pub repair: bool,
    pub slack: SlackPolicy,
    /// Upper bound (exclusive) of the orphan scan; clamped to the data region.
    pub scan_limit: Option<u32>,
    pub max_depth: usize,
    pub compare_fat_copies: bool,
    /// How many orphan clusters are listed one by one; all of them by default.
    pub orphan_sample_limit: usize,
    pub orphan_name_prefix: String,
    pub orphan_name_suffix: String,
}

impl Default for Fat12CheckOptions {
    fn default() -> Self {
        Self {
            phases: VerifyPhases::ALL,
            fail_fast: false,
            repair: true,
            slack: SlackPolicy::OneCluster,
            scan_limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
            compare_fat_copies: true,
            orphan_sample_limit: usize::MAX,
            orphan_name_prefix: ORPHAN_NAME_PREFIX.into(),
            orphan_name_suffix: ORPHAN_NAME_SUFFIX.into(),
        }
    }
}

impl Fat12CheckOptions {
    /// Same checks, nothing written.
    pub fn read_only() -> Self {
        Self {
            repair: false,
            ..Self::default()
        }
    }
}

impl VerifierOptionsLike for Fat12CheckOptions {
    fn phases(&self) -> VerifyPhases {
        self.phases.clone()
    }
    fn fail_fast(&self) -> bool {
        self.fail_fast
    }
}

/// Checks a FAT12 volume and repairs what it can.
///
/// Phases, in order:
/// - `BOOT`: boot sector signature and geometry agreement
/// - `GEOMETRY`: BPB sanity and FAT mirror comparison
/// - `ROOT`: tree walk with size reconciliation, building the visited set
/// - `CROSSREF`: orphan chains adopted into the root directory
pub struct Fat12Checker<'a, IO: ScanIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Fat12Meta,
    visited: Option<VisitedClusters>,
    stats: WalkerStats,
}

impl<'a, IO: ScanIO + ?Sized> Fat12Checker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Fat12Meta) -> Self {
        Self {
            io,
            meta,
            visited: None,
            stats: WalkerStats::default(),
        }
    }

    /// Runs every phase with default options: repair on, one-cluster slack.
    pub fn check_and_repair(&mut self) -> FsCheckerResult<VerifyReport> {
        self.check_all()
    }

    /// Clusters referenced by the tree (and adopted orphans) after the last run.
    pub fn visited(&self) -> Option<&VisitedClusters> {
        self.visited.as_ref()
    }

    pub fn stats(&self) -> WalkerStats {
        self.stats
    }

    fn walk(
        &mut self,
        opt: &Fat12CheckOptions,
        mode: WalkMode,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<VisitedClusters> {
        let mut visited = VisitedClusters::new(FAT12_CLUSTER_SPACE);
        let mut walker = Fat12Walker::new(self.io, self.meta, &mut visited);
        walker.walk_from_root(opt, mode, rep)?;
        self.stats = walker.stats;
        Ok(visited)
    }
}

impl<'a, IO: ScanIO + ?Sized> FsChecker for Fat12Checker<'a, IO> {
    type Options = Fat12CheckOptions;

    fn check_boot(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        boot::check_boot(self.io, self.meta, rep)
    }

    fn check_geometry(&mut self, opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        boot::geometry_sanity(self.meta, rep);
        if opt.compare_fat_copies {
            boot::compare_fat_copies(self.io, self.meta, rep)?;
        }
        Ok(())
    }

    fn check_root(&mut self, opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        let visited = self.walk(opt, WalkMode::Reconcile, rep)?;
        rep.push(Finding::info(
            "DIR.WALK",
            format!(
                "Walked {} dirs, {} entries, {} files checked (max depth {})",
                self.stats.dirs_visited,
                self.stats.entries_scanned,
                self.stats.files_checked,
                self.stats.max_depth
            ),
        ));
        self.visited = Some(visited);
        Ok(())
    }

    fn check_cross_reference(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let mut visited = match self.visited.take() {
            Some(v) => v,
            None => self.walk(opt, WalkMode::MarkOnly, rep)?,
        };

        let end = orphan::scan_end(self.meta, opt.scan_limit);
        let orphans =
            orphan::report_orphans(self.io, self.meta, &visited, end, opt.orphan_sample_limit, rep)?;
        if orphans > 0 {
            orphan::recover_orphans(self.io, self.meta, &mut visited, opt, rep)?;
        }

        self.visited = Some(visited);
        Ok(())
    }
}
