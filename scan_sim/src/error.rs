use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the sweep can report.
///
/// Configuration variants are raised before any simulation work starts.
/// `ContractViolation` marks a broken core invariant and is never recovered
/// from. Output variants come from the results writer after the table is
/// complete.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("missing range entry `{key}`")]
    MissingEntry { key: String },

    #[error("malformed range entry `{key}`: {reason}")]
    MalformedEntry { key: String, reason: String },

    #[error("range entry `{key}` has non-positive bound {value}")]
    NonPositiveBound { key: String, value: i64 },

    #[error("range entry `{key}` bound {value} exceeds the maximum of {max}")]
    BoundTooLarge { key: String, value: i64, max: u32 },

    #[error("failed to read settings file {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {}: {source}", path.display())]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("internal contract violation: {0}")]
    ContractViolation(String),

    #[error("failed to write {}: {source}", path.display())]
    OutputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode csv {}: {source}", path.display())]
    OutputCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode manifest {}: {source}", path.display())]
    OutputJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to format run timestamp: {0}")]
    OutputTimestamp(#[from] time::error::Format),
}

impl SweepError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SweepError::MissingEntry { .. }
                | SweepError::MalformedEntry { .. }
                | SweepError::NonPositiveBound { .. }
                | SweepError::BoundTooLarge { .. }
                | SweepError::SettingsIo { .. }
                | SweepError::SettingsParse { .. }
        )
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, SweepError::ContractViolation(_))
    }

    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        SweepError::MalformedEntry {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn contract(message: impl Into<String>) -> Self {
        SweepError::ContractViolation(message.into())
    }
}
