//! quotepull CLI: download per-symbol CSV files.
//!
//! Modes (mutually exclusive):
//! - `-d` / `--download` (default): fetch every symbol into the download dir
//! - `-u` / `--update`: loads the symbol list, then exits with a not-implemented error
//!
//! Symbols come from `-f <file>` (one per line) or, without it, the generated
//! range `0001..=max_symbol`. `-t` spreads the list over `--threads` workers.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use quotepull_core::data::{run_batch, run_single, update_symbols, YahooFetcher};
use quotepull_core::{FetchConfig, SymbolSource};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "quotepull",
    about = "quotepull: download per-symbol CSV price history"
)]
#[command(group(ArgGroup::new("mode").args(["download", "update"])))]
struct Cli {
    /// Download the CSV data (default).
    #[arg(short = 'd', long)]
    download: bool,

    /// Update already-downloaded CSV data (not implemented).
    #[arg(short = 'u', long)]
    update: bool,

    /// Symbol list file, one symbol per line. Defaults to the generated range.
    #[arg(short = 'f', long)]
    symbols_file: Option<PathBuf>,

    /// Split the download across worker threads.
    #[arg(short = 't', long, default_value_t = false)]
    multi_thread: bool,

    /// Download directory. Defaults to the current directory.
    #[arg(short = 'r', long, visible_alias = "download_dir")]
    download_dir: Option<PathBuf>,

    /// Worker count when multi-threaded. Defaults to 4.
    #[arg(short = 'n', long)]
    threads: Option<NonZeroUsize>,

    /// Upper bound of the generated symbol range. Defaults to 8356.
    #[arg(long)]
    max_symbol: Option<u32>,

    /// Request URL template containing `{symbol}`.
    #[arg(long)]
    base_url: Option<String>,

    /// Market suffix appended to each symbol in the request (e.g. ".hk").
    #[arg(long)]
    suffix: Option<String>,

    /// TOML config file. Command-line flags take precedence.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Download,
    Update,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.update {
            Mode::Update
        } else {
            Mode::Download
        }
    }

    /// Defaults, then the config file, then command-line overrides.
    fn resolve_config(&self) -> Result<FetchConfig> {
        let mut config = match &self.config {
            Some(path) => FetchConfig::from_file(path)?,
            None => FetchConfig::default(),
        };

        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(max) = self.max_symbol {
            config.max_symbol = max;
        }
        if let Some(url) = &self.base_url {
            config.url_template = url.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.market_suffix = suffix.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

/// Resolve config and load symbols in both modes, so a bad `-f` path is
/// fatal whether downloading or updating.
fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let source = SymbolSource::from_args(cli.symbols_file.clone(), config.max_symbol);
    let symbols = source.load().context("failed to load symbol list")?;

    match cli.mode() {
        Mode::Download => run_download(cli, &config, &symbols),
        Mode::Update => {
            update_symbols(&config.download_dir)?;
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_download(cli: &Cli, config: &FetchConfig, symbols: &[String]) -> Result<()> {
    let fetcher = YahooFetcher::from_config(config).context("failed to build HTTP client")?;
    let dir = &config.download_dir;

    // Per-symbol failures are logged by the fetcher; no failure summary.
    let summary = if cli.multi_thread {
        run_batch(&fetcher, dir, symbols, config.threads)?
    } else {
        run_single(&fetcher, dir, symbols)?
    };

    info!(symbols = summary.total, dir = %dir.display(), "done");
    Ok(())
}
