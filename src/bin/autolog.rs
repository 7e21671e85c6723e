use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use tracing::{error, info};

use autolog::{
    config::AutologConfig,
    display::LogRowsDisplayExt,
    exposures::{
        discovery::collect_sources,
        extractor::{extract_all, FitsExtractor},
    },
    log_rows,
    log_sink::{csv_sink::CsvLogSink, publish},
    SessionGrouper,
};

/// Build the observation log of an imaging night from its FITS files.
#[derive(Debug, Parser)]
#[command(name = "autolog", version, about)]
struct Cli {
    /// Directories holding the night's image files (walked recursively)
    #[arg(required = true)]
    dirs: Vec<Utf8PathBuf>,

    /// Observer name written in the date header row
    #[arg(long)]
    observer: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    /// Directory of the CSV log (one file per sheet)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,

    /// Print the entries without writing them to the log
    #[arg(long)]
    dry_run: bool,

    /// Leave out files whose metadata cannot be read instead of aborting
    #[arg(long)]
    skip_unreadable: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("autolog error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => AutologConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => AutologConfig::default(),
    };
    if let Some(observer) = cli.observer {
        config.observer = observer;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }

    let sources = collect_sources(&cli.dirs, &config.extensions)?;
    info!(files = sources.len(), "image files found");

    let extractor = FitsExtractor::new(config.software_aliases());
    let report = extract_all(&extractor, &sources);
    if !report.is_clean() {
        for (path, err) in &report.failures {
            error!(%path, %err, "unreadable exposure");
        }
        if !cli.skip_unreadable {
            anyhow::bail!(
                "{} of {} files could not be read (use --skip-unreadable to leave them out)",
                report.failures.len(),
                sources.len()
            );
        }
    }

    let grouper = SessionGrouper::new(config.filter_table());
    let entries = grouper.group(report.exposures, &config.observer)?;
    let rows = log_rows(&entries)?;
    println!("{}", rows.show());

    if cli.dry_run {
        println!("dry run: {} entries not written", rows.len());
        return Ok(());
    }

    let mut sink = CsvLogSink::new(config.log_dir.clone())
        .with_context(|| format!("failed to open log directory {}", config.log_dir))?;
    let written = publish(&rows, &mut sink)?;
    println!("{written} entries added to {}", sink.dir());
    Ok(())
}

fn init_tracing(quiet: bool, verbose: u8) -> anyhow::Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("AUTOLOG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
