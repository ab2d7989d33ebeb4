// =============================================================================
// Data Sources
// =============================================================================
//
// Three ways to obtain a `Table`:
//
//   - `CsvLoader`     reads a CSV file from disk
//   - `WebLoader`     fetches a CSV over HTTP(S)
//   - `BuiltinLoader` serves one of the small datasets bundled with the crate
//
// All three feed the same parser. Cells that fail to parse as numbers are
// treated as categorical labels and encoded per column in first-seen order
// (0.0, 1.0, ...), so factor-coded columns like wool type or tension level
// remain usable as predictors without preprocessing.
//
// =============================================================================

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use ndarray::Array2;

use super::{DataSource, Table};
use crate::error::{GlmFitError, Result};

/// Datasets bundled with the crate, one small example per family.
const BUILTIN_DATASETS: &[(&str, &str)] = &[
    ("engine_wear", include_str!("datasets/engine_wear.csv")),
    ("loom_breaks", include_str!("datasets/loom_breaks.csv")),
    ("exam_pass", include_str!("datasets/exam_pass.csv")),
];

/// Parse CSV from any reader into a [`Table`].
fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let n_cols = headers.len();
    if n_cols == 0 {
        return Err(GlmFitError::EmptyInput("dataset has no columns".to_string()));
    }

    let mut codes: Vec<HashMap<String, f64>> = vec![HashMap::new(); n_cols];
    let mut values: Vec<f64> = Vec::new();
    let mut n_rows = 0usize;

    for record in rdr.records() {
        // unequal record lengths surface here as a csv error
        let record = record?;
        for (j, cell) in record.iter().enumerate() {
            let cell = cell.trim();
            let value = match cell.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    // categorical label: encode in first-seen order
                    let next = codes[j].len() as f64;
                    *codes[j].entry(cell.to_string()).or_insert(next)
                }
            };
            values.push(value);
        }
        n_rows += 1;
    }

    if n_rows == 0 {
        return Err(GlmFitError::EmptyInput("dataset has no rows".to_string()));
    }

    let values = Array2::from_shape_vec((n_rows, n_cols), values)
        .map_err(|e| GlmFitError::InvalidValue(e.to_string()))?;
    Table::new(headers, values)
}

/// Loads a CSV file from disk.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for CsvLoader {
    fn fetch(&self) -> Result<Table> {
        let file = File::open(&self.path)?;
        parse_table(file)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches a CSV dataset over HTTP(S).
pub struct WebLoader {
    url: String,
}

impl WebLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl DataSource for WebLoader {
    fn fetch(&self) -> Result<Table> {
        let body = reqwest::blocking::get(self.url.as_str())?
            .error_for_status()?
            .text()?;
        parse_table(body.as_bytes())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves one of the datasets bundled with the crate.
pub struct BuiltinLoader {
    name: String,
}

impl BuiltinLoader {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Names of all bundled datasets.
    pub fn available() -> Vec<&'static str> {
        BUILTIN_DATASETS.iter().map(|(name, _)| *name).collect()
    }
}

impl DataSource for BuiltinLoader {
    fn fetch(&self) -> Result<Table> {
        BUILTIN_DATASETS
            .iter()
            .find(|(name, _)| *name == self.name)
            .map(|(_, csv)| parse_table(csv.as_bytes()))
            .ok_or_else(|| {
                GlmFitError::InvalidValue(format!(
                    "no builtin dataset '{}'; available: {}",
                    self.name,
                    Self::available().join(", ")
                ))
            })?
    }

    fn describe(&self) -> String {
        format!("builtin:{}", self.name)
    }
}
