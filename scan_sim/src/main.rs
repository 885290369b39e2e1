use anyhow::{Context, Result};
use clap::Parser;
use scan_sim::config::{self, RangeOverrides, DEFAULT_SETTINGS_PATH};
use scan_sim::output::{ResultsWriter, RunManifest, DEFAULT_RESULTS_DIR};
use scan_sim::{run_sweep, ParameterSweep, Stopwatch, SweepSeed};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scan-sim")]
#[command(about = "Monte Carlo sweep of the scan-and-truncate statistic over shuffled multisets")]
#[command(version)]
struct Cli {
    /// Settings file with the `n`, `m` and `trials` ranges
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Range for n, e.g. "5" or "1,10" (overrides the settings file)
    #[arg(long)]
    n: Option<String>,

    /// Range for m (overrides the settings file)
    #[arg(long)]
    m: Option<String>,

    /// Range for the trial count (overrides the settings file)
    #[arg(long)]
    trials: Option<String>,

    /// Directory receiving `<timestamp>.csv` and `<timestamp>.json`
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    output_dir: PathBuf,

    /// Master seed; a random one is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Log verbosity when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let started_at = OffsetDateTime::now_utc();
    let stopwatch = Stopwatch::start();

    let overrides = RangeOverrides {
        n: cli.n,
        m: cli.m,
        trials: cli.trials,
    };
    let ranges = config::load_ranges(&cli.config, &overrides)
        .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;
    info!(
        n = %ranges.n,
        m = %ranges.m,
        trials = %ranges.trials,
        combinations = ranges.n.count().saturating_mul(ranges.m.count()).saturating_mul(ranges.trials.count()),
        "ranges loaded"
    );

    let sweep = ParameterSweep::expand(ranges);
    let stopwatch = stopwatch.lap("expand");

    let seed = cli.seed.map(SweepSeed::from_u64).unwrap_or_else(SweepSeed::random);
    let (table, stopwatch) = run_sweep(&sweep, &seed, stopwatch).context("simulation failed")?;

    let manifest = RunManifest::new(started_at, &seed, *sweep.ranges(), &table, stopwatch.total().as_secs_f64())
        .context("failed to build run manifest")?;
    let paths = ResultsWriter::new(&cli.output_dir)
        .write(&table, started_at, manifest)
        .context("failed to write results")?;
    let stopwatch = stopwatch.lap("write");

    info!(
        csv = %paths.csv.display(),
        manifest = %paths.manifest.display(),
        seed = seed.value(),
        total_ms = stopwatch.total().as_millis() as u64,
        "run complete"
    );
    Ok(())
}
