use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Number, Value};
use thiserror::Error;

use super::types::Entity;
use crate::scoring::Criterion;

/// File read by `rank` when neither the CLI nor the config names one.
pub const DEFAULT_INPUT_FILE: &str = "centre_scores.csv";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,

    #[error("CSV header is missing criterion columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A loaded evaluation table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header names in file order (empty header cells are dropped)
    pub columns: Vec<String>,
    pub entities: Vec<Entity>,
}

/// Load a dataset from a CSV file on disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset(file)?;
    tracing::info!(
        path = %path.display(),
        rows = dataset.entities.len(),
        columns = dataset.columns.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Read a dataset from any CSV source.
///
/// The header must contain all six criterion columns (case-sensitive).
/// Repeated header names are suffixed `.1`, `.2`, ... in file order.
/// Short rows are padded with nulls and cells past the header are ignored.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    if header.is_empty() {
        return Err(DatasetError::MissingHeader);
    }

    // (index in record, column name)
    let mut seen = HashSet::new();
    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(idx, name)| (idx, unique_column_name(name, &mut seen)))
        .collect();

    let missing: Vec<String> = Criterion::ALL
        .iter()
        .filter(|c| !columns.iter().any(|(_, name)| name == c.name()))
        .map(|c| c.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let mut entities = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let entity: Entity = columns
            .iter()
            .map(|(idx, name)| {
                let value = record.get(*idx).map(infer_cell).unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect();
        entities.push(entity);
    }

    Ok(Dataset {
        columns: columns.into_iter().map(|(_, name)| name).collect(),
        entities,
    })
}

/// Give a repeated header name a `.1`, `.2`, ... suffix so each column
/// keeps its own cell. The first occurrence keeps the plain name.
fn unique_column_name(name: &str, seen: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut suffix = 0;
    while seen.contains(&candidate) {
        suffix += 1;
        candidate = format!("{}.{}", name, suffix);
    }
    if suffix > 0 {
        tracing::warn!(column = name, renamed = %candidate, "duplicate header name");
    }
    seen.insert(candidate.clone());
    candidate
}

/// Infer a typed cell from raw CSV text.
///
/// Integers stay integers, finite floats become floats, empty text is
/// null, and anything else is kept as a string.
pub fn infer_cell(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}
