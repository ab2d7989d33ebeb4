// =============================================================================
// Error Types
// =============================================================================
//
// All errors produced by this library. Two rules shape the taxonomy:
//
//   1. Shape problems (mismatched dimensions, empty inputs) fail fast at the
//      boundary where they are detected - construction, prediction, or column
//      selection. Nothing is silently truncated or padded.
//
//   2. Optimizer non-convergence is NOT an error. The fit result carries a
//      `converged` flag and the solver's termination message instead, because
//      a caller may still want the best-found coefficients. Only a failure of
//      the optimization machinery itself maps to `Optimization`.
//
// A numerically invalid likelihood (-inf or NaN from a family kernel) is not
// represented here at all: it propagates through the objective as a float and
// the optimizer simply avoids that region.
//
// =============================================================================

use thiserror::Error;

/// Errors that can occur during data loading, model construction, fitting,
/// or prediction.
#[derive(Debug, Error)]
pub enum GlmFitError {
    /// Row or column counts disagree (e.g. X has more rows than y).
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An input has zero rows or zero columns.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A value is outside its valid domain (unknown column name, malformed
    /// numeric cell, bad configuration value).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A dataset operation was attempted before `load()` succeeded.
    #[error("dataset not ready: {0}")]
    NotReady(String),

    /// The optimizer infrastructure failed outright. Non-convergence within
    /// the iteration budget does not produce this error.
    #[error("optimization failed: {0}")]
    Optimization(String),

    /// Underlying I/O failure while reading a dataset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP failure while fetching a remote dataset.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GlmFitError>;
