use crate::error::SweepError;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

// =============================================================================
// CONSTANTS
// =============================================================================

pub const KEY_N: &str = "n";
pub const KEY_M: &str = "m";
pub const KEY_TRIALS: &str = "trials";

/// Column names of the results table, in output order.
pub const RESULT_COLUMNS: [&str; 4] = ["n", "m", "trials", "result"];

// =============================================================================
// PARAMETER RANGE
// =============================================================================

/// Inclusive `[lo, hi]` sweep range with `1 <= lo <= hi`.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ParameterRange {
    lo: u32,
    hi: u32,
}

impl ParameterRange {
    /// Builds a range from two endpoints given in either order.
    pub fn new(key: &str, a: i64, b: i64) -> Result<Self, SweepError> {
        let a = checked_bound(key, a)?;
        let b = checked_bound(key, b)?;
        Ok(Self {
            lo: a.min(b),
            hi: a.max(b),
        })
    }

    pub fn single(key: &str, value: i64) -> Result<Self, SweepError> {
        Self::new(key, value, value)
    }

    /// Normalizes one or two raw values into a range.
    pub fn from_values(key: &str, values: &[i64]) -> Result<Self, SweepError> {
        match values {
            [] => Err(SweepError::malformed(key, "no values given")),
            [value] => Self::single(key, *value),
            [a, b] => Self::new(key, *a, *b),
            _ => Err(SweepError::malformed(
                key,
                format!("expected one or two values, got {}", values.len()),
            )),
        }
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn values(&self) -> RangeInclusive<u32> {
        self.lo..=self.hi
    }

    /// Number of values in the range, never zero.
    pub fn count(&self) -> u64 {
        u64::from(self.hi - self.lo) + 1
    }
}

impl fmt::Display for ParameterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lo == self.hi {
            write!(f, "{}", self.lo)
        } else {
            write!(f, "{}..={}", self.lo, self.hi)
        }
    }
}

fn checked_bound(key: &str, value: i64) -> Result<u32, SweepError> {
    if value < 1 {
        return Err(SweepError::NonPositiveBound {
            key: key.to_string(),
            value,
        });
    }
    u32::try_from(value).map_err(|_| SweepError::BoundTooLarge {
        key: key.to_string(),
        value,
        max: u32::MAX,
    })
}

/// The three ranges a sweep is expanded from.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct SweepRanges {
    pub n: ParameterRange,
    pub m: ParameterRange,
    pub trials: ParameterRange,
}

// =============================================================================
// PARAMETER SET & RESULTS
// =============================================================================

/// One `(n, m, trials)` combination.
///
/// Field order defines the canonical ordering: `n`, then `m`, then `trials`.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ParameterSet {
    pub n: u32,
    pub m: u32,
    pub trials: u32,
}

impl ParameterSet {
    pub fn new(n: u32, m: u32, trials: u32) -> Self {
        Self { n, m, trials }
    }

    /// Number of sequence elements scanned in the worst case over all trials.
    pub fn work(&self) -> u128 {
        u128::from(self.n) * u128::from(self.m) * u128::from(self.trials)
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(n={}, m={}, trials={})", self.n, self.m, self.trials)
    }
}

#[derive(Serialize, Clone, Copy, PartialEq, Debug)]
pub struct ResultRow {
    pub n: u32,
    pub m: u32,
    pub trials: u32,
    pub result: f64,
}

impl ResultRow {
    pub fn new(params: ParameterSet, result: f64) -> Self {
        Self {
            n: params.n,
            m: params.m,
            trials: params.trials,
            result,
        }
    }

    pub fn params(&self) -> ParameterSet {
        ParameterSet::new(self.n, self.m, self.trials)
    }
}
