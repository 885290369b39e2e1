use crate::error::SweepError;
use crate::seed::SweepSeed;
use crate::simulation::ResultTable;
use crate::types::{SweepRanges, RESULT_COLUMNS};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

pub const DEFAULT_RESULTS_DIR: &str = "results";

// =============================================================================
// FORMATTING
// =============================================================================

/// Shortest round-trip decimal form that always carries a fractional part
/// (`1.0`, not `1`).
pub fn format_mean(mean: f64) -> String {
    format!("{mean:?}")
}

/// UTC file stem with microseconds, such as `20260118T093005.250000Z`.
pub fn timestamp_stem(at: OffsetDateTime) -> Result<String, SweepError> {
    let format = format_description!("[year][month][day]T[hour][minute][second].[subsecond digits:6]Z");
    Ok(at.to_offset(time::UtcOffset::UTC).format(&format)?)
}

/// Writes the table as CSV with a header row, rows in canonical order.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(RESULT_COLUMNS)?;
    for row in table.rows() {
        csv.write_record([
            row.n.to_string(),
            row.m.to_string(),
            row.trials.to_string(),
            format_mean(row.result),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

// =============================================================================
// RUN MANIFEST
// =============================================================================

#[derive(Serialize, Clone, Debug)]
pub struct RunManifest {
    pub started_at: String,
    pub seed: u64,
    pub master_seed_sha256: String,
    pub ranges: SweepRanges,
    pub parameter_sets: usize,
    pub elapsed_seconds: f64,
    pub results_file: String,
}

impl RunManifest {
    pub fn new(
        started_at: OffsetDateTime,
        seed: &SweepSeed,
        ranges: SweepRanges,
        table: &ResultTable,
        elapsed_seconds: f64,
    ) -> Result<Self, SweepError> {
        Ok(Self {
            started_at: timestamp_stem(started_at)?,
            seed: seed.value(),
            master_seed_sha256: seed.master_hash(),
            ranges,
            parameter_sets: table.len(),
            elapsed_seconds,
            results_file: String::new(),
        })
    }
}

// =============================================================================
// WRITER
// =============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub manifest: PathBuf,
}

/// Writes a run's CSV table and JSON manifest into a results directory.
#[derive(Clone, Debug)]
pub struct ResultsWriter {
    dir: PathBuf,
}

impl ResultsWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths_for(&self, started_at: OffsetDateTime) -> Result<OutputPaths, SweepError> {
        let stem = timestamp_stem(started_at)?;
        Ok(OutputPaths {
            csv: self.dir.join(format!("{stem}.csv")),
            manifest: self.dir.join(format!("{stem}.json")),
        })
    }

    /// Writes `<stem>.csv` and `<stem>.json`, filling in the manifest's
    /// `results_file`. Fails rather than overwrite results of an earlier run
    /// with the same timestamp.
    pub fn write(
        &self,
        table: &ResultTable,
        started_at: OffsetDateTime,
        mut manifest: RunManifest,
    ) -> Result<OutputPaths, SweepError> {
        fs::create_dir_all(&self.dir).map_err(|source| SweepError::OutputIo {
            path: self.dir.clone(),
            source,
        })?;

        let paths = self.paths_for(started_at)?;

        let file = create_new(&paths.csv)?;
        write_csv(table, BufWriter::new(file)).map_err(|source| SweepError::OutputCsv {
            path: paths.csv.clone(),
            source,
        })?;

        manifest.results_file = paths
            .csv
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut writer = BufWriter::new(create_new(&paths.manifest)?);
        serde_json::to_writer_pretty(&mut writer, &manifest).map_err(|source| SweepError::OutputJson {
            path: paths.manifest.clone(),
            source,
        })?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|source| SweepError::OutputIo {
                path: paths.manifest.clone(),
                source,
            })?;

        info!(csv = %paths.csv.display(), rows = table.len(), "results written");
        Ok(paths)
    }
}

fn create_new(path: &Path) -> Result<File, SweepError> {
    File::options()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| SweepError::OutputIo {
            path: path.to_path_buf(),
            source,
        })
}
