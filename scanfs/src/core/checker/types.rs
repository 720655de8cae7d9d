// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};
use core::cmp::Ordering;
use core::fmt;

use bitflags::bitflags;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    /// A problem that was repaired on the volume.
    Fixed,
    Error,
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        use Severity::*;
        fn rank(s: Severity) -> u8 {
            match s {
                Info => 0,
                Warn => 1,
                Fixed => 2,
                Error => 3,
            }
        }
        rank(*self).cmp(&rank(*other))
    }
}

#[derive(Clone, Debug)]
pub struct Finding {
    pub sev: Severity,
    pub code: &'static str,
    pub msg: String,
}
impl Finding {
    pub fn info(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Info,
            code,
            msg: msg.into(),
        }
    }
    pub fn warn(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Warn,
            code,
            msg: msg.into(),
        }
    }
    pub fn fixed(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Fixed,
            code,
            msg: msg.into(),
        }
    }
    pub fn err(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            sev: Severity::Error,
            code,
            msg: msg.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    pub findings: Vec<Finding>,
}

impl VerifyReport {
    pub fn has_error(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f.sev, Severity::Error))
    }

    pub fn first_error(&self) -> Option<&str> {
        self.findings
            .iter()
            .find(|f| matches!(f.sev, Severity::Error))
            .map(|f| f.msg.as_str())
    }

    pub fn ok(&self) -> bool {
        !self.has_error()
    }

    /// True once any inconsistency was detected, repaired or not.
    pub fn problems_found(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f.sev, Severity::Fixed | Severity::Error))
    }

    pub fn push(&mut self, f: Finding) {
        self.findings.push(f)
    }
    pub fn count(&self, s: Severity) -> usize {
        self.findings.iter().filter(|f| f.sev == s).count()
    }

    /// Findings carrying `code`, in the order they were raised.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.code == code)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_report(self)
    }

    /// Display with options (filtering, prefix, summary...)
    pub fn display_with<'a>(&'a self, opts: ReportDisplayOpts) -> ReportDisplay<'a> {
        ReportDisplay::new(self, opts)
    }

    /// Display "warn + fixed + error"
    pub fn warn_and_errors<'a>(&'a self) -> ReportDisplay<'a> {
        self.display_with(ReportDisplayOpts {
            min_level: Severity::Warn,
            ..ReportDisplayOpts::default()
        })
    }
}

/// Overall outcome of a check run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing had to change.
    Consistent,
    /// Every detected problem was repaired.
    Repaired,
    /// Problems were detected and left in place (read-only run or failed phase).
    Unrepaired,
}

impl Verdict {
    pub fn from_report(rep: &VerifyReport) -> Self {
        if rep.has_error() {
            Verdict::Unrepaired
        } else if rep.problems_found() {
            Verdict::Repaired
        } else {
            Verdict::Consistent
        }
    }

    pub fn msg(&self) -> &'static str {
        match self {
            Verdict::Consistent => "No problems were found, the system is consistent.",
            Verdict::Repaired => "All issues were fixed, system is now consistent.",
            Verdict::Unrepaired => "Problems were found (not repaired).",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.msg())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ReportDisplayOpts {
    pub min_level: Severity,
    pub prefix: &'static str,
    pub show_summary: bool,
    pub pad_code: usize,
}

impl ReportDisplayOpts {
    fn new(min_level: Severity, prefix: &'static str, show_summary: bool, pad_code: usize) -> Self {
        Self {
            min_level,
            prefix,
            show_summary,
            pad_code,
        }
    }
}

impl Default for ReportDisplayOpts {
    fn default() -> Self {
        Self::new(Severity::Info, "", false, 12)
    }
}

pub struct ReportDisplay<'a> {
    rep: &'a VerifyReport,
    opts: ReportDisplayOpts,
}

impl<'a> ReportDisplay<'a> {
    pub fn new(rep: &'a VerifyReport, opts: ReportDisplayOpts) -> Self {
        Self { rep, opts }
    }
}

impl<'a> fmt::Display for ReportDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n_info = 0usize;
        let mut n_warn = 0usize;
        let mut n_fixed = 0usize;
        let mut n_err = 0usize;

        for it in &self.rep.findings {
            if it.sev < self.opts.min_level {
                continue;
            }
            let tag = match it.sev {
                Severity::Info => "INFO",
                Severity::Warn => "WARN",
                Severity::Fixed => "FIX ",
                Severity::Error => "ERR ",
            };
            match it.sev {
                Severity::Info => n_info += 1,
                Severity::Warn => n_warn += 1,
                Severity::Fixed => n_fixed += 1,
                Severity::Error => n_err += 1,
            }

            writeln!(
                f,
                "{}{tag}: {:<width$} {}",
                self.opts.prefix,
                it.code,
                it.msg,
                width = self.opts.pad_code
            )?;
        }

        if self.opts.show_summary {
            writeln!(
                f,
                "{}Summary: errors={}  fixed={}  warns={}  infos={}",
                self.opts.prefix, n_err, n_fixed, n_warn, n_info
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ReportDisplay {
            rep: self,
            opts: ReportDisplayOpts::default(),
        }
        .fmt(f)
    }
}

bitflags! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct VerifyPhases: u32 {
        const BOOT       = 1 << 0;
        const GEOMETRY   = 1 << 1;
        const ROOT       = 1 << 2;
        const CROSSREF   = 1 << 3;
        const ALL        = u32::MAX;
    }
}

/// Generic options that the FS can encapsulate/extend.
pub trait VerifierOptionsLike {
    fn phases(&self) -> VerifyPhases {
        VerifyPhases::ALL
    }
    fn fail_fast(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Fixed);
        assert!(Severity::Fixed < Severity::Error);
    }

    #[test]
    fn test_verdict_from_report() {
        let mut rep = VerifyReport::default();
        rep.push(Finding::info("BOOT.OK", "fine"));
        rep.push(Finding::warn("CHAIN.BAD", "bad cluster"));
        assert!(!rep.problems_found());
        assert_eq!(rep.verdict(), Verdict::Consistent);

        rep.push(Finding::fixed("SIZE.FIX", "shrunk"));
        assert!(rep.problems_found());
        assert_eq!(rep.verdict(), Verdict::Repaired);

        rep.push(Finding::err("ORPHAN.CHAIN", "left in place"));
        assert_eq!(rep.verdict(), Verdict::Unrepaired);
    }

    #[test]
    fn test_verdict_messages() {
        assert_eq!(
            Verdict::Consistent.to_string(),
            "No problems were found, the system is consistent."
        );
        assert_eq!(
            Verdict::Repaired.to_string(),
            "All issues were fixed, system is now consistent."
        );
    }

    #[test]
    fn test_display_filters_and_summarizes() {
        let mut rep = VerifyReport::default();
        rep.push(Finding::info("A.INFO", "hidden"));
        rep.push(Finding::fixed("B.FIX", "shown"));
        let text = rep
            .display_with(ReportDisplayOpts {
                min_level: Severity::Warn,
                show_summary: true,
                ..ReportDisplayOpts::default()
            })
            .to_string();
        assert!(!text.contains("hidden"));
        assert!(text.contains("FIX : B.FIX"));
        assert!(text.contains("fixed=1"));
    }
}
