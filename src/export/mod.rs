//! CSV to JSON export for the front-end.
//!
//! Two choices shape the output and both are explicit settings:
//! how header names become JSON keys ([`KeyStyle`]) and what happens to a
//! numeric cell that does not parse ([`BadNumberPolicy`]).

pub mod normalize;

use std::fs::File;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{write_json_atomic, WriteError};

pub use normalize::{normalize_csv, NormalizedRows};

pub const DEFAULT_EXPORT_INPUT: &str = "centre_scores_enriched.csv";
pub const DEFAULT_EXPORT_OUTPUT: &str = "app/schools.json";

/// How CSV header names are turned into JSON keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum KeyStyle {
    /// Lower-case, then rename centre -> name, latitude -> lat, longitude -> lng
    #[default]
    Normalized,
    /// Keep header names as written (trimmed)
    Preserve,
}

/// What to do with a numeric cell that cannot be converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BadNumberPolicy {
    /// Set the field to null and keep the row
    #[default]
    NullField,
    /// Drop the whole row
    SkipRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub key_style: KeyStyle,
    pub on_bad_number: BadNumberPolicy,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_EXPORT_INPUT),
            output: PathBuf::from(DEFAULT_EXPORT_OUTPUT),
            key_style: KeyStyle::default(),
            on_bad_number: BadNumberPolicy::default(),
        }
    }
}

/// Row counts from one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub skipped_missing_identity: usize,
    pub skipped_bad_number: usize,
    pub skipped_malformed: usize,
    /// Fields nulled under [`BadNumberPolicy::NullField`]
    pub nulled_fields: usize,
}

impl ExportSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_missing_identity + self.skipped_bad_number + self.skipped_malformed
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Read the input CSV, normalize every row and write the JSON array.
pub fn export_file(settings: &ExportSettings) -> Result<ExportSummary, ExportError> {
    let file = File::open(&settings.input).map_err(|source| ExportError::Open {
        path: settings.input.clone(),
        source,
    })?;

    let rows = normalize_csv(file, settings.key_style, settings.on_bad_number)?;
    write_json_atomic(&settings.output, &rows.records)?;

    tracing::info!(
        output = %settings.output.display(),
        written = rows.summary.written,
        skipped = rows.summary.skipped(),
        "export finished"
    );
    Ok(rows.summary)
}
