// SPDX-License-Identifier: MIT

pub mod stats;
mod tracker;
mod types;

pub use stats::WalkerStats;
pub use tracker::VisitedClusters;
pub use types::{
    Finding, ReportDisplay, ReportDisplayOpts, Severity, Verdict, VerifierOptionsLike,
    VerifyPhases, VerifyReport,
};

pub use crate::core::errors::{FsCheckerError, FsCheckerResult};

/// Trait for checking, and optionally repairing, the integrity of a filesystem.
///
/// Phases run in a fixed order. Each hook defaults to a no-op so an
/// implementation only overrides the phases it cares about.
pub trait FsChecker {
    type Options: VerifierOptionsLike + Default;

    fn check_with(&mut self, opt: &Self::Options) -> FsCheckerResult<VerifyReport> {
        let mut rep = VerifyReport::default();
        self.run_phase(opt, &mut rep, VerifyPhases::BOOT, Self::check_boot)?;
        if opt.fail_fast() && rep.has_error() {
            return Ok(rep);
        }
        self.run_phase(opt, &mut rep, VerifyPhases::GEOMETRY, Self::check_geometry)?;
        if opt.fail_fast() && rep.has_error() {
            return Ok(rep);
        }
        self.run_phase(opt, &mut rep, VerifyPhases::ROOT, Self::check_root)?;
        if opt.fail_fast() && rep.has_error() {
            return Ok(rep);
        }
        self.run_phase(
            opt,
            &mut rep,
            VerifyPhases::CROSSREF,
            Self::check_cross_reference,
        )?;
        Ok(rep)
    }

    fn check_all(&mut self) -> FsCheckerResult<VerifyReport> {
        self.check_with(&Self::Options::default())
    }

    fn check_boot(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_geometry(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_root(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_cross_reference(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }

    fn run_phase<F>(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
        phase: VerifyPhases,
        f: F,
    ) -> FsCheckerResult<()>
    where
        F: Fn(&mut Self, &Self::Options, &mut VerifyReport) -> FsCheckerResult<()>,
    {
        if opt.phases().contains(phase) {
            f(self, opt, rep)?;
        }
        Ok(())
    }
}
