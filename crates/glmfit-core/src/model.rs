// =============================================================================
// The GLM Estimator
// =============================================================================
//
// A `Glm` owns a design matrix X, a response vector y, a coefficient vector
// beta, and one distribution family fixed at construction. Fitting is direct
// maximum likelihood:
//
//     minimize   -log_likelihood(beta; X, y)
//     over beta, starting from the current coefficients
//
// The minimizer is a black box (see `solvers`); whatever it returns replaces
// beta wholesale. That makes the lifecycle exactly two states:
//
//     Unfitted (beta = uniform starting value)  --fit-->  Fitted
//
// `predict` is valid in both states - predicting before `fit` simply applies
// the starting coefficients, which is occasionally useful for exercising the
// pipeline.
//
// GRADIENTS
// ---------
// All three families use their canonical link, so the score of the negated
// log-likelihood is X'(mu - y). The objective hands that analytic gradient to
// the minimizer instead of relying on finite differences.
//
// =============================================================================

use log::debug;
use ndarray::{Array1, Array2};

use crate::error::{GlmFitError, Result};
use crate::families::{BernoulliFamily, Family, GaussianFamily, PoissonFamily};
use crate::solvers::{Minimizer, ObjectiveFunction};

/// Starting value used for every coefficient when none is given.
pub const DEFAULT_START_BETA: f64 = 0.1;

/// Everything `fit` reports besides updating the model in place.
///
/// The optimizer's verdict is surfaced rather than swallowed: `converged`
/// false with a populated `message` means the iteration budget ran out, and
/// the coefficients are the best found so far, not a certified optimum.
#[derive(Debug, Clone)]
pub struct FitSummary {
    /// The fitted coefficients (also stored on the model).
    pub coefficients: Array1<f64>,

    /// Log-likelihood at the fitted coefficients.
    pub log_likelihood: f64,

    /// Solver iterations performed.
    pub iterations: u64,

    /// Number of objective evaluations.
    pub n_fev: usize,

    /// Number of gradient evaluations.
    pub n_gev: usize,

    /// The solver's convergence verdict.
    pub converged: bool,

    /// The solver's termination reason, verbatim.
    pub message: String,
}

/// Negated log-likelihood of a fixed (family, X, y) triple, as seen by the
/// minimizer.
struct NegLogLikelihood<'a> {
    family: &'a dyn Family,
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
}

impl ObjectiveFunction for NegLogLikelihood<'_> {
    fn eval(&self, params: &[f64]) -> f64 {
        let beta = Array1::from_vec(params.to_vec());
        -self.family.log_likelihood(&beta, self.x, self.y)
    }

    fn gradient(&self, params: &[f64]) -> Vec<f64> {
        // Canonical-link score: grad of -ll is X'(mu - y).
        let beta = Array1::from_vec(params.to_vec());
        let eta = self.x.dot(&beta);
        let mu = self.family.link_inverse(&eta);
        let residual = &mu - self.y;
        self.x.t().dot(&residual).to_vec()
    }
}

/// A generalized linear model fitted by direct maximum likelihood.
pub struct Glm {
    x: Array2<f64>,
    y: Array1<f64>,
    coefficients: Array1<f64>,
    family: Box<dyn Family>,
}

impl std::fmt::Debug for Glm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Glm")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("coefficients", &self.coefficients)
            .field("family", &self.family.name())
            .finish()
    }
}

impl Glm {
    /// Create an unfitted model with the default starting coefficients.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `x.nrows() != y.len()`
    /// * `EmptyInput` if X has no rows or no columns
    pub fn new(x: Array2<f64>, y: Array1<f64>, family: Box<dyn Family>) -> Result<Self> {
        Self::with_start(x, y, family, DEFAULT_START_BETA)
    }

    /// Create an unfitted model with every coefficient set to `start_beta`.
    pub fn with_start(
        x: Array2<f64>,
        y: Array1<f64>,
        family: Box<dyn Family>,
        start_beta: f64,
    ) -> Result<Self> {
        let n = y.len();
        let p = x.ncols();

        if x.nrows() != n {
            return Err(GlmFitError::DimensionMismatch(format!(
                "X has {} rows but y has {} elements",
                x.nrows(),
                n
            )));
        }
        if n == 0 {
            return Err(GlmFitError::EmptyInput("y is empty".to_string()));
        }
        if p == 0 {
            return Err(GlmFitError::EmptyInput("X has no columns".to_string()));
        }

        Ok(Self {
            x,
            y,
            coefficients: Array1::from_elem(p, start_beta),
            family,
        })
    }

    /// Gaussian response, identity link.
    pub fn gaussian(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        Self::new(x, y, Box::new(GaussianFamily))
    }

    /// Poisson response, log link.
    pub fn poisson(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        Self::new(x, y, Box::new(PoissonFamily))
    }

    /// Bernoulli response, logit link.
    pub fn bernoulli(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        Self::new(x, y, Box::new(BernoulliFamily))
    }

    /// Fit by maximum likelihood with the default minimizer settings.
    pub fn fit(&mut self) -> Result<FitSummary> {
        self.fit_with(&Minimizer::default())
    }

    /// Fit by maximum likelihood using the given minimizer.
    ///
    /// The search starts from the current coefficients, so refitting an
    /// already-fitted model resumes at the previous optimum. On return the
    /// model's coefficients are replaced with the minimizer's result even
    /// when it did not converge; check [`FitSummary::converged`].
    pub fn fit_with(&mut self, minimizer: &Minimizer) -> Result<FitSummary> {
        debug!(
            "fitting {} model: {} observations, {} coefficients",
            self.family.name(),
            self.y.len(),
            self.coefficients.len()
        );

        let objective = NegLogLikelihood {
            family: self.family.as_ref(),
            x: &self.x,
            y: &self.y,
        };
        let start = self.coefficients.to_vec();
        let result = minimizer.minimize(&objective, &start)?;

        debug!(
            "{} fit finished: converged={}, iterations={}, -ll={:.6}",
            self.family.name(),
            result.converged,
            result.iterations,
            result.objective_value
        );

        self.coefficients = Array1::from_vec(result.parameters);
        Ok(FitSummary {
            coefficients: self.coefficients.clone(),
            log_likelihood: -result.objective_value,
            iterations: result.iterations,
            n_fev: result.n_fev,
            n_gev: result.n_gev,
            converged: result.converged,
            message: result.message,
        })
    }

    /// Predicted means for new rows: `link_inverse(new_x * beta)`.
    ///
    /// Valid before and after fitting; the row count is free but the column
    /// count must match the coefficient length.
    pub fn predict(&self, new_x: &Array2<f64>) -> Result<Array1<f64>> {
        if new_x.ncols() != self.coefficients.len() {
            return Err(GlmFitError::DimensionMismatch(format!(
                "new X has {} columns but the model has {} coefficients",
                new_x.ncols(),
                self.coefficients.len()
            )));
        }
        let eta = new_x.dot(&self.coefficients);
        Ok(self.family.link_inverse(&eta))
    }

    /// Current coefficients (starting values until `fit` has run).
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// The family fixed at construction.
    pub fn family(&self) -> &dyn Family {
        self.family.as_ref()
    }

    /// Log-likelihood of the training data at the current coefficients.
    pub fn log_likelihood(&self) -> f64 {
        self.family.log_likelihood(&self.coefficients, &self.x, &self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dimension_mismatch_is_rejected() {
        let x = array![[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = array![1.0, 2.0];
        let err = Glm::gaussian(x, y).unwrap_err();
        assert!(matches!(err, GlmFitError::DimensionMismatch(_)));
    }

    #[test]
    fn zero_column_design_matrix_is_rejected() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = array![1.0, 2.0, 3.0];
        let err = Glm::gaussian(x, y).unwrap_err();
        assert!(matches!(err, GlmFitError::EmptyInput(_)));
    }

    #[test]
    fn empty_response_is_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let err = Glm::poisson(x, y).unwrap_err();
        assert!(matches!(err, GlmFitError::EmptyInput(_)));
    }

    #[test]
    fn starting_coefficients_are_uniform() {
        let x = array![[1.0, 0.0], [1.0, 1.0]];
        let y = array![0.0, 1.0];
        let model = Glm::bernoulli(x, y).unwrap();
        assert_eq!(model.coefficients(), &array![0.1, 0.1]);

        let x = array![[1.0], [1.0]];
        let y = array![0.0, 1.0];
        let model =
            Glm::with_start(x, y, Box::new(GaussianFamily), 2.5).unwrap();
        assert_eq!(model.coefficients(), &array![2.5]);
    }

    #[test]
    fn unfitted_predict_uses_starting_coefficients() {
        // predict must equal link_inverse(X * beta) computed independently,
        // for each family, before fit has ever run.
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        let y = array![0.0, 1.0, 1.0];
        let eta = x.dot(&array![0.1, 0.1]);

        let gaussian = Glm::gaussian(x.clone(), y.clone()).unwrap();
        assert_eq!(gaussian.predict(&x).unwrap(), eta);

        let poisson = Glm::poisson(x.clone(), y.clone()).unwrap();
        let mu = poisson.predict(&x).unwrap();
        for (m, e) in mu.iter().zip(eta.iter()) {
            assert!((m - e.exp()).abs() < 1e-15);
            assert!(*m > 0.0);
        }

        let bernoulli = Glm::bernoulli(x.clone(), y).unwrap();
        let mu = bernoulli.predict(&x).unwrap();
        for (m, e) in mu.iter().zip(eta.iter()) {
            assert!((m - 1.0 / (1.0 + (-e).exp())).abs() < 1e-15);
            assert!(*m > 0.0 && *m < 1.0);
        }
    }

    #[test]
    fn predict_rejects_wrong_column_count() {
        let x = array![[1.0, 0.0], [1.0, 1.0]];
        let y = array![0.0, 1.0];
        let model = Glm::gaussian(x, y).unwrap();
        let narrow = array![[1.0], [1.0]];
        assert!(matches!(
            model.predict(&narrow).unwrap_err(),
            GlmFitError::DimensionMismatch(_)
        ));
    }

    #[test]
    fn predict_allows_different_row_count() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        let y = array![1.0, 2.0, 3.0];
        let model = Glm::gaussian(x, y).unwrap();
        let wide = array![[1.0, 5.0]];
        assert_eq!(model.predict(&wide).unwrap().len(), 1);
    }

    #[test]
    fn analytic_gradient_agrees_with_finite_differences() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = array![2.0, 3.0, 6.0, 9.0];
        let families: [Box<dyn Family>; 2] =
            [Box::new(GaussianFamily), Box::new(PoissonFamily)];
        for family in families {
            let objective = NegLogLikelihood {
                family: family.as_ref(),
                x: &x,
                y: &y,
            };
            let point = [0.3, 0.2];
            let analytic = objective.gradient(&point);
            let numeric = numeric_gradient(&objective, &point);
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                assert!((a - n).abs() < 1e-5, "{} vs {}", a, n);
            }
        }
    }

    // Central differences without going through the trait's default method,
    // so the two paths stay independent.
    fn numeric_gradient(objective: &NegLogLikelihood<'_>, params: &[f64]) -> Vec<f64> {
        let mut grad = vec![0.0; params.len()];
        for i in 0..params.len() {
            let eps = 1e-6;
            let mut plus = params.to_vec();
            plus[i] += eps;
            let mut minus = params.to_vec();
            minus[i] -= eps;
            grad[i] = (objective.eval(&plus) - objective.eval(&minus)) / (2.0 * eps);
        }
        grad
    }
}
