//! staledu - report how much data under a directory has gone unread.
//!
//! Usage:
//!   staledu [OPTIONS] DIRECTORY
//!   staledu -a 90 -m 3 -u T /data       Stale >90 days, 3 levels, in TB
//!   staledu -c 0.02 /data               Retention cost of stale data
//!   staledu --help                      Show help

mod defaults;

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use staledu_core::{DEFAULT_ATIME_DAYS, DEFAULT_MAX_DEPTH, ScanContext, ScanError, Units};
use staledu_report::ReportRenderer;
use staledu_scan::Scanner;

use crate::defaults::UserDefaults;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "STALEDU_LOG";

#[derive(Parser)]
#[command(
    name = "staledu",
    version,
    about = "Report how much data under a directory has not been accessed recently",
    long_about = "staledu walks a directory tree on a single filesystem and reports, per \
                  directory down to a maximum depth, how much of the stored data was last \
                  accessed before a cutoff.\n\n\
                  Defaults can be set in $XDG_CONFIG_HOME/staledu/config.toml."
)]
struct Cli {
    /// Directory to report on
    directory: PathBuf,

    /// Last access time threshold in days
    #[arg(short, long, value_name = "DAYS")]
    atime: Option<u32>,

    /// Maximum depth to report on
    #[arg(short, long = "maxdepth", value_name = "DEPTH")]
    maxdepth: Option<u32>,

    /// Units to report in (k, M, G, T, P, E)
    #[arg(short, long, value_parser = parse_units)]
    units: Option<Units>,

    /// Cost per unit per day; reports estimated retention cost instead of size
    #[arg(short, long, value_name = "RATE")]
    cost: Option<f64>,

    /// Read defaults from this file instead of the user config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let defaults = match &cli.config {
        Some(path) => UserDefaults::load_from(path)?,
        None => UserDefaults::load(),
    };

    let context = build_context(&cli, &defaults)?;
    let outcome = Scanner::new().scan(&context).wrap_err("Scan failed")?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    ReportRenderer::new(&context)
        .render(&outcome.store, &mut out)
        .wrap_err("Failed to write report")?;
    out.flush()?;

    let summary = &outcome.summary;
    tracing::info!(
        "{} entries, {} total, {} stale, {} groups in {:.2}s",
        summary.entries,
        format_size(summary.total_bytes),
        format_size(summary.stale_bytes),
        summary.groups,
        summary.elapsed.as_secs_f64()
    );

    Ok(())
}

/// Merge command-line flags over user defaults over built-in defaults.
fn build_context(cli: &Cli, defaults: &UserDefaults) -> Result<ScanContext> {
    let root = cli
        .directory
        .canonicalize()
        .wrap_err_with(|| format!("Invalid path: {}", cli.directory.display()))?;

    let context = ScanContext::builder()
        .root(&root)
        .max_depth(
            cli.maxdepth
                .or(defaults.max_depth)
                .unwrap_or(DEFAULT_MAX_DEPTH),
        )
        .atime_days(
            cli.atime
                .filter(|days| *days > 0)
                .or(defaults.atime_days)
                .unwrap_or(DEFAULT_ATIME_DAYS),
        )
        .units(cli.units.or(defaults.units).unwrap_or_default())
        .cost_rate(cli.cost.or(defaults.cost_rate))
        .build()
        .map_err(ScanError::from)?;

    Ok(context)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn parse_units(s: &str) -> Result<Units, String> {
    s.parse().map_err(|err: ScanError| err.to_string())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("staledu").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();
        let defaults = UserDefaults {
            max_depth: Some(5),
            atime_days: Some(10),
            units: Some(Units::Terabytes),
            cost_rate: None,
        };

        let context = build_context(&cli(&["-m", "1", "-u", "k", dir]), &defaults).unwrap();
        assert_eq!(context.max_depth, 1);
        assert_eq!(context.atime_days, 10);
        assert_eq!(context.units, Units::Kilobytes);
        assert!(context.active_cost_rate().is_none());
    }

    #[test]
    fn test_builtin_defaults() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();

        let context = build_context(&cli(&[dir]), &UserDefaults::default()).unwrap();
        assert_eq!(context.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(context.atime_days, DEFAULT_ATIME_DAYS);
        assert_eq!(context.units, Units::Gigabytes);
        assert!(!context.root.ends_with('/') || context.root == "/");
    }

    #[test]
    fn test_zero_atime_keeps_default() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();

        let context = build_context(&cli(&["-a", "0", dir]), &UserDefaults::default()).unwrap();
        assert_eq!(context.atime_days, DEFAULT_ATIME_DAYS);
    }

    #[test]
    fn test_rejects_zero_depth_and_bad_units() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();

        assert!(build_context(&cli(&["-m", "0", dir]), &UserDefaults::default()).is_err());
        assert!(Cli::try_parse_from(["staledu", "-u", "x", dir]).is_err());
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let cli = cli(&[missing.to_str().unwrap()]);
        assert!(build_context(&cli, &UserDefaults::default()).is_err());
    }
}
