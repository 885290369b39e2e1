use crate::error::SweepError;
use crate::multiset::Multiset;
use crate::progress::Stopwatch;
use crate::scan::scan_and_truncate;
use crate::seed::SweepSeed;
use crate::sweep::ParameterSweep;
use crate::types::{ParameterSet, ResultRow};
use rand::Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

// =============================================================================
// RESULT TABLE
// =============================================================================

/// Mean result per parameter set, iterated in canonical order.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ResultTable {
    entries: BTreeMap<ParameterSet, f64>,
}

impl ResultTable {
    /// Builds the table from finished `(params, mean)` pairs.
    ///
    /// Fails if a key repeats or the table does not end up with exactly
    /// `expected` entries.
    pub fn from_pairs<I>(pairs: I, expected: usize) -> Result<Self, SweepError>
    where
        I: IntoIterator<Item = (ParameterSet, f64)>,
    {
        let mut entries = BTreeMap::new();
        for (params, mean) in pairs {
            if entries.insert(params, mean).is_some() {
                return Err(SweepError::contract(format!("parameter set {params} evaluated twice")));
            }
        }
        if entries.len() != expected {
            return Err(SweepError::contract(format!(
                "result table has {} entries, expected {}",
                entries.len(),
                expected
            )));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ResultRow> + '_ {
        self.entries.iter().map(|(params, mean)| ResultRow::new(*params, *mean))
    }
}

// =============================================================================
// TRIALS
// =============================================================================

/// One shuffle-and-evaluate run.
pub fn run_trial<R: Rng + ?Sized>(multiset: &Multiset, rng: &mut R) -> u32 {
    scan_and_truncate(&multiset.shuffled(rng))
}

/// Mean of `trials` independent trials over `multiset`.
///
/// Trials run in parallel; each worker reuses one shuffle buffer and each
/// trial draws from its own generator derived from `seed`.
pub fn run_trials(multiset: &Multiset, trials: u32, seed: &SweepSeed) -> Result<f64, SweepError> {
    if trials == 0 {
        return Err(SweepError::contract("trial aggregation requires trials >= 1"));
    }
    if multiset.is_empty() {
        return Err(SweepError::contract("trial aggregation requires a non-empty multiset"));
    }

    let (n, m) = (multiset.n(), multiset.m());
    let total: u64 = (0..trials)
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(multiset.len()),
            |buf, trial_index| {
                let mut rng = seed.trial_rng(n, m, trials, trial_index);
                multiset.shuffle_into(buf, &mut rng);
                u64::from(scan_and_truncate(buf))
            },
        )
        .sum();

    Ok(total as f64 / f64::from(trials))
}

// =============================================================================
// SWEEP
// =============================================================================

pub fn evaluate_parameter_set(params: &ParameterSet, seed: &SweepSeed) -> Result<f64, SweepError> {
    let multiset = Multiset::build(params.n, params.m)?;
    let mean = run_trials(&multiset, params.trials, seed)?;
    debug!(n = params.n, m = params.m, trials = params.trials, mean, "parameter set evaluated");
    Ok(mean)
}

/// Evaluates every parameter set of `sweep` and collects the result table.
///
/// Parameter sets run in parallel and each produces its own pair; the pairs
/// are merged only after every unit has finished.
pub fn run_sweep(
    sweep: &ParameterSweep,
    seed: &SweepSeed,
    stopwatch: Stopwatch,
) -> Result<(ResultTable, Stopwatch), SweepError> {
    info!(
        parameter_sets = sweep.len(),
        total_work = %sweep.total_work(),
        seed = seed.value(),
        "evaluating sweep"
    );

    let sets: Vec<ParameterSet> = sweep.iter().copied().collect();
    let pairs = sets
        .par_iter()
        .map(|params| evaluate_parameter_set(params, seed).map(|mean| (*params, mean)))
        .collect::<Result<Vec<_>, SweepError>>()?;

    let table = ResultTable::from_pairs(pairs, sets.len())?;
    let stopwatch = stopwatch.lap("evaluate");
    Ok((table, stopwatch))
}
