//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Capture Sorter - photo classification by capture date and camera model
///
/// Scans a directory tree for image files, reads their embedded capture
/// metadata, and copies each file into a destination tree organized as
/// `<year>/<MM>_<MonthName>/<CAMERA_MODEL>`. Files without complete
/// metadata land in an UNKNOWN folder.
#[derive(Parser, Debug)]
#[command(name = "capture-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Root directory to scan recursively for image files
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Destination directory for the classified tree
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Classify and report without copying anything
    #[arg(long, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// Copy files even if the config file enables dry run
    #[arg(long, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// Per-file progress output
    #[arg(short, long, overrides_with = "no_verbose")]
    pub verbose: bool,

    /// Suppress per-file progress output
    #[arg(long, overrides_with = "verbose")]
    pub no_verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref path) = self.path {
            config.scan_path = Some(path.clone());
        }
        if let Some(ref destination) = self.destination {
            config.destination = destination.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        } else if self.no_dry_run {
            config.dry_run = false;
        }
        if self.verbose {
            config.verbose = true;
        } else if self.no_verbose {
            config.verbose = false;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();

        config.scan_path = self.path.clone();
        if let Some(ref destination) = self.destination {
            config.destination = destination.clone();
        }
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;

        config
    }
}
