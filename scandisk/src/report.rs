use colored::Colorize;

use scanfs::fat12::{Finding, Severity, Verdict, VerifyReport};

use crate::utils::{LogLevel, log_level};

fn tag(sev: Severity) -> colored::ColoredString {
    match sev {
        Severity::Info => "INFO".dimmed(),
        Severity::Warn => "WARN".yellow(),
        Severity::Fixed => "FIX ".green(),
        Severity::Error => "ERR ".red().bold(),
    }
}

/// Whether a finding is shown at the current log level.
pub fn visible(f: &Finding, level: LogLevel) -> bool {
    match level {
        LogLevel::Quiet => false,
        LogLevel::Normal => f.sev != Severity::Info,
        LogLevel::Verbose => true,
    }
}

pub fn print_findings(rep: &VerifyReport) {
    let level = log_level();
    for f in rep.findings.iter().filter(|f| visible(f, level)) {
        println!("  {} {:<14} {}", tag(f.sev), f.code, f.msg);
    }
    crate::log_info!(
        "Summary: info={}, warn={}, fixed={}, errors={}",
        rep.count(Severity::Info),
        rep.count(Severity::Warn),
        rep.count(Severity::Fixed),
        rep.count(Severity::Error)
    );
}

pub fn print_verdict(verdict: Verdict) {
    let msg = match verdict {
        Verdict::Consistent => verdict.msg().green(),
        Verdict::Repaired => verdict.msg().yellow(),
        Verdict::Unrepaired => verdict.msg().red(),
    };
    crate::log_normal!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_by_level() {
        let info = Finding::info("DIR.WALK", "walked");
        let fixed = Finding::fixed("SIZE.FIX", "fixed");
        assert!(!visible(&info, LogLevel::Normal));
        assert!(visible(&info, LogLevel::Verbose));
        assert!(visible(&fixed, LogLevel::Normal));
        assert!(!visible(&fixed, LogLevel::Quiet));
    }
}
