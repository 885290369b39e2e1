//! Monte Carlo estimation of the scan-and-truncate statistic over shuffled
//! multisets, swept across `(n, m, trials)` ranges.

pub mod config;
pub mod error;
pub mod multiset;
pub mod output;
pub mod progress;
pub mod scan;
pub mod seed;
pub mod simulation;
pub mod sweep;
pub mod types;


pub use error::SweepError;
pub use multiset::Multiset;
pub use progress::Stopwatch;
pub use scan::scan_and_truncate;
pub use seed::SweepSeed;
pub use simulation::{run_sweep, run_trial, run_trials, ResultTable};
pub use sweep::ParameterSweep;
pub use types::{ParameterRange, ParameterSet, ResultRow, SweepRanges};

/// Expands `ranges` and evaluates the whole sweep.
pub fn simulate(ranges: SweepRanges, seed: &SweepSeed) -> Result<ResultTable, SweepError> {
    let sweep = ParameterSweep::expand(ranges);
    let (table, _) = run_sweep(&sweep, seed, Stopwatch::start())?;
    Ok(table)
}
