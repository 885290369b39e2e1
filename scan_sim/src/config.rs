//! Sweep range configuration.
//!
//! Ranges come from a TOML settings file:
//!
//! ```toml
//! n = "1, 10"       # one or two comma-separated integers
//! m = 3             # a single integer
//! trials = [1000]   # or an array of one or two integers
//! ```
//!
//! `maxNumber`, `duplication` and `trialTimes` are accepted as aliases for
//! `n`, `m` and `trials`. Only the key names carry over from a
//! `settings.properties` file: a bare `maxNumber=1,10` is not valid TOML, so
//! a two-value entry must be quoted (`maxNumber = "1,10"`) or written as an
//! array. Command-line overrides take precedence over the file.

use crate::error::SweepError;
use crate::types::{ParameterRange, SweepRanges, KEY_M, KEY_N, KEY_TRIALS};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_SETTINGS_PATH: &str = "settings.toml";

/// A raw range entry as written in the settings file.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(untagged)]
pub enum RangeEntry {
    Single(i64),
    List(Vec<i64>),
    Text(String),
}

impl RangeEntry {
    pub fn to_range(&self, key: &str) -> Result<ParameterRange, SweepError> {
        match self {
            RangeEntry::Single(value) => ParameterRange::single(key, *value),
            RangeEntry::List(values) => ParameterRange::from_values(key, values),
            RangeEntry::Text(text) => parse_range(key, text),
        }
    }
}

/// Parses `"7"` or `"1,10"` (whitespace allowed, either order).
pub fn parse_range(key: &str, text: &str) -> Result<ParameterRange, SweepError> {
    let values = text
        .split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return Err(SweepError::malformed(key, format!("empty value in {text:?}")));
            }
            part.parse::<i64>()
                .map_err(|e| SweepError::malformed(key, format!("{part:?} is not an integer: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    ParameterRange::from_values(key, &values)
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default, alias = "maxNumber")]
    pub n: Option<RangeEntry>,
    #[serde(default, alias = "duplication")]
    pub m: Option<RangeEntry>,
    #[serde(default, alias = "trialTimes")]
    pub trials: Option<RangeEntry>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SweepError> {
        let text = fs::read_to_string(path).map_err(|source| SweepError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self, SweepError> {
        toml::from_str(text).map_err(|source| SweepError::SettingsParse {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Range strings given on the command line.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RangeOverrides {
    pub n: Option<String>,
    pub m: Option<String>,
    pub trials: Option<String>,
}

impl RangeOverrides {
    pub fn is_complete(&self) -> bool {
        self.n.is_some() && self.m.is_some() && self.trials.is_some()
    }
}

fn resolve_entry(key: &str, file: Option<&RangeEntry>, cli: Option<&str>) -> Result<ParameterRange, SweepError> {
    match (cli, file) {
        (Some(text), _) => parse_range(key, text),
        (None, Some(entry)) => entry.to_range(key),
        (None, None) => Err(SweepError::MissingEntry { key: key.to_string() }),
    }
}

/// Merges file entries with overrides into validated ranges.
pub fn resolve(settings: &Settings, overrides: &RangeOverrides) -> Result<SweepRanges, SweepError> {
    Ok(SweepRanges {
        n: resolve_entry(KEY_N, settings.n.as_ref(), overrides.n.as_deref())?,
        m: resolve_entry(KEY_M, settings.m.as_ref(), overrides.m.as_deref())?,
        trials: resolve_entry(KEY_TRIALS, settings.trials.as_ref(), overrides.trials.as_deref())?,
    })
}

/// Loads the settings file and applies overrides.
///
/// The file may be absent only when every range is overridden.
pub fn load_ranges(path: &Path, overrides: &RangeOverrides) -> Result<SweepRanges, SweepError> {
    let settings = if overrides.is_complete() && !path.exists() {
        Settings::default()
    } else {
        Settings::load(path)?
    };
    resolve(&settings, overrides)
}
