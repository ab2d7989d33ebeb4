// =============================================================================
// Black-Box Unconstrained Minimization
// =============================================================================
//
// A thin wrapper around argmin's L-BFGS with More-Thuente line search. The
// rest of the crate sees only:
//
//     minimize(objective, starting_point) -> (best parameters, status)
//
// and must not assume anything about the algorithm behind it.
//
// STATUS, NOT ERRORS
// ------------------
// Stopping at the iteration budget is a legitimate outcome: the result
// carries `converged = false` plus the solver's termination message, and the
// best-found parameters are still returned. Only infrastructure failures
// (solver misconfiguration, line-search breakdown) surface as `Err`.
//
// Objective values of -inf/+inf/NaN are passed through untouched; the line
// search rejects such candidates and the search continues elsewhere.
//
// =============================================================================

use argmin::core::{CostFunction, Executor, Gradient, State, TerminationReason, TerminationStatus};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{GlmFitError, Result};

/// An objective to be minimized.
///
/// Implementors supply `eval`; `gradient` falls back to central finite
/// differences, so a plain objective function is enough. Objectives that know
/// their analytic gradient should override it - the optimizer converges
/// faster and to tighter tolerances with exact derivatives.
pub trait ObjectiveFunction {
    /// Evaluate the objective at `params`. May return non-finite values for
    /// invalid regions; never panics on them.
    fn eval(&self, params: &[f64]) -> f64;

    /// Gradient at `params`. Default: central differences with step
    /// `eps = 1e-8 * max(|x_i|, 1)`.
    fn gradient(&self, params: &[f64]) -> Vec<f64> {
        let mut grad = vec![0.0; params.len()];
        for i in 0..params.len() {
            let eps = 1e-8 * params[i].abs().max(1.0);

            let mut plus = params.to_vec();
            plus[i] += eps;
            let f_plus = self.eval(&plus);

            let mut minus = params.to_vec();
            minus[i] -= eps;
            let f_minus = self.eval(&minus);

            grad[i] = (f_plus - f_minus) / (2.0 * eps);
        }
        grad
    }
}

/// Configuration for the minimizer.
#[derive(Debug, Clone)]
pub struct MinimizerConfig {
    /// Maximum number of solver iterations before giving up.
    /// Default: 500
    pub max_iterations: u64,

    /// Convergence tolerance on the gradient norm.
    /// Default: 1e-8
    pub tolerance: f64,

    /// Number of corrections kept for the inverse-Hessian approximation.
    /// Default: 10
    pub memory: usize,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-8,
            memory: 10,
        }
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Best parameters found (the candidate optimum).
    pub parameters: Vec<f64>,

    /// Objective value at `parameters`.
    pub objective_value: f64,

    /// Solver iterations performed.
    pub iterations: u64,

    /// Number of objective evaluations.
    pub n_fev: usize,

    /// Number of gradient evaluations.
    pub n_gev: usize,

    /// Did the solver report convergence (as opposed to hitting the
    /// iteration budget)?
    pub converged: bool,

    /// The solver's termination reason, verbatim.
    pub message: String,
}

impl fmt::Display for MinimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MinimizeResult(f={:.6}, iterations={}, n_fev={}, n_gev={}, converged={})",
            self.objective_value, self.iterations, self.n_fev, self.n_gev, self.converged
        )
    }
}

#[derive(Default)]
struct EvalCounts {
    cost: AtomicUsize,
    grad: AtomicUsize,
}

/// Adapter from [`ObjectiveFunction`] to argmin's problem traits.
struct ArgminProblem<'a> {
    objective: &'a dyn ObjectiveFunction,
    counts: Arc<EvalCounts>,
}

impl CostFunction for ArgminProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        self.counts.cost.fetch_add(1, Ordering::Relaxed);
        Ok(self.objective.eval(params))
    }
}

impl Gradient for ArgminProblem<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(
        &self,
        params: &Self::Param,
    ) -> std::result::Result<Self::Gradient, argmin::core::Error> {
        self.counts.grad.fetch_add(1, Ordering::Relaxed);
        Ok(self.objective.gradient(params))
    }
}

/// General-purpose unconstrained minimizer (L-BFGS).
pub struct Minimizer {
    config: MinimizerConfig,
}

impl Minimizer {
    pub fn new(config: MinimizerConfig) -> Self {
        Self { config }
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// Returns the best parameters found together with the solver's own
    /// convergence verdict. Non-convergence within the iteration budget is
    /// reported through [`MinimizeResult::converged`], not as an error.
    pub fn minimize(
        &self,
        objective: &dyn ObjectiveFunction,
        start: &[f64],
    ) -> Result<MinimizeResult> {
        if start.is_empty() {
            return Err(GlmFitError::EmptyInput(
                "cannot minimize over zero parameters".to_string(),
            ));
        }

        let counts = Arc::new(EvalCounts::default());
        let problem = ArgminProblem {
            objective,
            counts: counts.clone(),
        };

        // Argmin's default cost tolerance is machine epsilon, which makes the
        // line search grind at floating-point noise; keep it a notch below
        // the gradient tolerance instead.
        let tol_cost = (0.1 * self.config.tolerance).max(1e-12);

        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, self.config.memory)
            .with_tolerance_grad(self.config.tolerance)
            .map_err(|e| GlmFitError::Optimization(format!("invalid gradient tolerance: {e}")))?
            .with_tolerance_cost(tol_cost)
            .map_err(|e| GlmFitError::Optimization(format!("invalid cost tolerance: {e}")))?;

        let res = Executor::new(problem, solver)
            .configure(|state| {
                state
                    .param(start.to_vec())
                    .max_iters(self.config.max_iterations)
            })
            .run()
            .map_err(|e| GlmFitError::Optimization(e.to_string()))?;

        let state = res.state();
        let parameters = state
            .get_best_param()
            .ok_or_else(|| {
                GlmFitError::Optimization("solver returned no best parameters".to_string())
            })?
            .clone();

        let termination = state.get_termination_status();
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
                | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
        );

        Ok(MinimizeResult {
            parameters,
            objective_value: state.get_best_cost(),
            iterations: state.get_iter(),
            n_fev: counts.cost.load(Ordering::Relaxed),
            n_gev: counts.grad.load(Ordering::Relaxed),
            converged,
            message: termination.to_string(),
        })
    }
}

impl Default for Minimizer {
    fn default() -> Self {
        Self::new(MinimizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // f(x, y) = (x - 2)^2 + 2*(y + 1)^2, minimum 0 at (2, -1)
    struct Quadratic;

    impl ObjectiveFunction for Quadratic {
        fn eval(&self, params: &[f64]) -> f64 {
            (params[0] - 2.0).powi(2) + 2.0 * (params[1] + 1.0).powi(2)
        }
    }

    #[test]
    fn finds_quadratic_minimum_with_numerical_gradient() {
        let result = Minimizer::default()
            .minimize(&Quadratic, &[0.0, 0.0])
            .unwrap();
        assert!(result.converged, "termination: {}", result.message);
        assert!((result.parameters[0] - 2.0).abs() < 1e-5);
        assert!((result.parameters[1] + 1.0).abs() < 1e-5);
        assert!(result.objective_value < 1e-9);
        assert!(result.n_fev > 0);
    }

    #[test]
    fn default_gradient_matches_analytic() {
        let grad = Quadratic.gradient(&[0.0, 0.0]);
        // analytic: (-4, -4)
        assert!((grad[0] + 4.0).abs() < 1e-5);
        assert!((grad[1] + 4.0).abs() < 1e-5);
    }

    #[test]
    fn starting_at_the_minimum_stays_there() {
        let result = Minimizer::default().minimize(&Quadratic, &[2.0, -1.0]).unwrap();
        assert!((result.parameters[0] - 2.0).abs() < 1e-8);
        assert!((result.parameters[1] + 1.0).abs() < 1e-8);
    }

    #[test]
    fn empty_start_is_rejected() {
        let err = Minimizer::default().minimize(&Quadratic, &[]).unwrap_err();
        assert!(matches!(err, GlmFitError::EmptyInput(_)));
    }
}
