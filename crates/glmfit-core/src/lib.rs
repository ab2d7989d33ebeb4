// =============================================================================
// glmfit Core Library
// =============================================================================
//
// Generalized Linear Models fitted by direct maximum likelihood for three
// response distributions: Gaussian (identity link), Poisson (log link), and
// Bernoulli (logit link). No IRLS, no regularization - the negated
// log-likelihood goes straight to a general-purpose unconstrained minimizer.
//
// STRUCTURE:
// ----------
//   - families: distribution kernels (link inverse + log-likelihood)
//   - model:    the Glm estimator (construct, fit, predict)
//   - solvers:  the black-box minimizer the estimator delegates to
//   - data:     dataset loading and predictor/response column selection
//   - convert:  ndarray <-> nalgebra helpers for the reference solves
//   - error:    error types used throughout the library
//
// The estimator consumes a plain (X, y) pair; where that pair comes from is
// the data module's business, and anything already shaped as ndarray arrays
// can skip it entirely.
//
// =============================================================================

pub mod convert;
pub mod data;
pub mod error;
pub mod families;
pub mod model;
pub mod solvers;

// Re-export the everyday surface so users can write
// `use glmfit_core::Glm` instead of `use glmfit_core::model::Glm`.
pub use data::{BuiltinLoader, CsvLoader, DataSet, DataSource, Table, WebLoader};
pub use error::{GlmFitError, Result};
pub use families::{BernoulliFamily, Family, GaussianFamily, PoissonFamily};
pub use model::{FitSummary, Glm, DEFAULT_START_BETA};
pub use solvers::{MinimizeResult, Minimizer, MinimizerConfig, ObjectiveFunction};
