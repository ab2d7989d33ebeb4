// =============================================================================
// Solvers
// =============================================================================
//
// Fitting here is direct maximum likelihood: the model hands a negated
// log-likelihood and a starting point to a general-purpose unconstrained
// minimizer and accepts whatever optimum it reports. There is no
// model-specific iteration scheme in this crate - the minimizer is a black
// box behind the `Minimizer::minimize` contract, and convergence judgment is
// delegated to it entirely.
//
// =============================================================================

mod mle;

pub use mle::{MinimizeResult, Minimizer, MinimizerConfig, ObjectiveFunction};
