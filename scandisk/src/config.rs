use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use scanfs::fat12::{Fat12CheckOptions, SlackPolicy};

/// Contents of a `scandisk.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub check: CheckConfig,
}

/// The `[check]` table. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub repair: bool,
    /// Fixed slack in bytes; absent means one cluster.
    pub slack_bytes: Option<u32>,
    /// Exclusive upper bound of the orphan scan.
    pub scan_limit: Option<u32>,
    pub max_depth: usize,
    pub compare_fat_copies: bool,
    pub orphan_sample_limit: usize,
    pub orphan_prefix: String,
    pub orphan_suffix: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        let opts = Fat12CheckOptions::default();
        Self {
            repair: opts.repair,
            slack_bytes: None,
            scan_limit: opts.scan_limit,
            max_depth: opts.max_depth,
            compare_fat_copies: opts.compare_fat_copies,
            orphan_sample_limit: opts.orphan_sample_limit,
            orphan_prefix: opts.orphan_name_prefix,
            orphan_suffix: opts.orphan_name_suffix,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub dry_run: bool,
    pub slack_bytes: Option<u32>,
    pub scan_limit: Option<u32>,
    pub max_depth: Option<usize>,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply(&mut self, o: Overrides) {
        let check = &mut self.check;
        if o.dry_run {
            check.repair = false;
        }
        if o.slack_bytes.is_some() {
            check.slack_bytes = o.slack_bytes;
        }
        if o.scan_limit.is_some() {
            check.scan_limit = o.scan_limit;
        }
        if let Some(depth) = o.max_depth {
            check.max_depth = depth;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.check.validate()
    }
}

impl CheckConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.slack_bytes == Some(0) {
            bail!("slack_bytes must be greater than zero");
        }
        if matches!(self.scan_limit, Some(l) if l < 3) {
            bail!("scan_limit must leave at least one data cluster to scan");
        }
        if self.max_depth == 0 {
            bail!("max_depth must be greater than zero");
        }
        if self.orphan_prefix.is_empty() {
            bail!("orphan_prefix must not be empty");
        }
        if self.orphan_prefix.contains(['/', '\\', '.']) {
            bail!("orphan_prefix must be a plain name: {:?}", self.orphan_prefix);
        }
        Ok(())
    }

    pub fn to_options(&self) -> Fat12CheckOptions {
        Fat12CheckOptions {
            repair: self.repair,
            slack: self
                .slack_bytes
                .map_or(SlackPolicy::OneCluster, SlackPolicy::Fixed),
            scan_limit: self.scan_limit,
            max_depth: self.max_depth,
            compare_fat_copies: self.compare_fat_copies,
            orphan_sample_limit: self.orphan_sample_limit,
            orphan_name_prefix: self.orphan_prefix.clone(),
            orphan_name_suffix: self.orphan_suffix.clone(),
            ..Fat12CheckOptions::default()
        }
    }
}
