// scandisk/src/main.rs

mod config;
mod image;
mod report;
mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use scanfs::fat12::*;

use crate::config::{Config, Overrides};
use crate::utils::{LogLevel, set_log_level};

#[derive(Parser)]
#[command(name = "scandisk", version, about = "FAT12 image checker and repairer", long_about = None)]
struct Cli {
    /// Only print the verdict
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Also print informational findings
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an image and repair it in place
    Check {
        /// Image path
        image: PathBuf,

        /// Report problems without writing the image
        #[arg(long)]
        dry_run: bool,

        /// Config path (TOML, `[check]` table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fixed size slack in bytes instead of one cluster
        #[arg(long)]
        slack_bytes: Option<u32>,

        /// Exclusive upper bound of the orphan cluster scan
        #[arg(long)]
        scan_limit: Option<u32>,

        /// Maximum directory depth to descend
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Print the geometry described by the boot sector
    Info {
        /// Image path
        image: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    set_log_level(LogLevel::from_flags(cli.quiet, cli.verbose));

    match cli.command {
        Commands::Check {
            image,
            dry_run,
            config,
            slack_bytes,
            scan_limit,
            max_depth,
        } => {
            let mut cfg = match &config {
                Some(path) => Config::from_file(path)?,
                None => Config::default(),
            };
            cfg.apply(Overrides {
                dry_run,
                slack_bytes,
                scan_limit,
                max_depth,
            });
            cfg.validate()?;

            let verdict = check(&image, &cfg, dry_run)?;
            Ok(match verdict {
                Verdict::Unrepaired => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
        Commands::Info { image } => {
            info(&image)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(path: &Path, cfg: &Config, dry_run: bool) -> anyhow::Result<Verdict> {
    let opts = cfg.check.to_options();
    let mut data = image::load(path)?;
    let meta = image::geometry(&mut data)?;

    log_info!("Checking {}", path.display());
    if dry_run {
        log_info!("Dry run mode: no data will be written.");
    }
    log_verbose!("Options: {opts:?}");

    let rep = {
        let mut io = MemScanIO::new(&mut data);
        let mut checker = Fat12Checker::new(&mut io, &meta);
        let rep = checker
            .check_with(&opts)
            .context("check aborted, image left unchanged")?;
        let stats = checker.stats();
        log_verbose!(
            "Walked {} dirs, {} entries, {} files; {} cluster numbers referenced",
            stats.dirs_visited,
            stats.entries_scanned,
            stats.files_checked,
            checker.visited().map_or(0, |v| v.marked())
        );
        rep
    };

    report::print_findings(&rep);
    let verdict = rep.verdict();

    if rep.count(Severity::Fixed) > 0 && !dry_run {
        log_info!("Writing repaired image to: {}", path.display());
        image::save(path, &data)?;
    }
    report::print_verdict(verdict);
    Ok(verdict)
}

fn info(path: &Path) -> anyhow::Result<()> {
    let mut data = image::load(path)?;
    let meta = image::geometry(&mut data)?;
    let label = String::from_utf8_lossy(&meta.volume_label);

    log_normal!("Image: {}", path.display());
    log_normal!("  label            : {}", label.trim_end());
    log_normal!("  volume id        : {:08X}", meta.volume_id);
    log_normal!("  media            : {:#04X}", meta.media);
    log_normal!("  bytes/sector     : {}", meta.bytes_per_sector);
    log_normal!("  sectors/cluster  : {}", meta.sectors_per_cluster);
    log_normal!("  total sectors    : {}", meta.total_sectors);
    log_normal!("  FATs             : {} x {} sectors", meta.num_fats, meta.fat_size_sectors);
    log_normal!("  root entries     : {}", meta.root_entry_count);
    log_normal!("  data clusters    : {}", meta.cluster_count);
    log_verbose!("  FAT offset       : {:#x}", meta.fat_offset_bytes);
    log_verbose!("  root dir offset  : {:#x}", meta.root_dir_offset);
    log_verbose!("  data offset      : {:#x}", meta.data_offset);
    Ok(())
}
