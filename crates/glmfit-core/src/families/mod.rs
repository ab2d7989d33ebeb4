// =============================================================================
// Distribution Families
// =============================================================================
//
// Each family bundles the two pieces of math a GLM needs:
//
//   1. The inverse link: mapping the linear predictor eta = X*beta to the
//      mean parameter mu on the response scale.
//   2. The log-likelihood: how probable the observed responses are, given
//      candidate coefficients.
//
// THE THREE FAMILIES
// ------------------
//
//   Family     | Response domain        | Link (inverse)
//   -----------|------------------------|---------------------------
//   Gaussian   | any real               | identity: mu = eta
//   Poisson    | counts 0, 1, 2, ...    | log:      mu = exp(eta)
//   Bernoulli  | {0, 1}                 | logit:    mu = 1/(1+e^-eta)
//
// The set is closed: the fitter holds exactly one `Box<dyn Family>` chosen at
// construction and never switches it. Both trait methods are required - there
// are deliberately no default bodies, so a new family cannot compile without
// supplying its own link and likelihood.
//
// Response values are NOT validated against the family's domain. Feeding a
// negative count to Poisson, or a 0.7 to Bernoulli, yields a -inf or NaN
// log-likelihood, which the optimizer treats as an arbitrarily bad candidate.
// Nothing panics.
//
// =============================================================================

use ndarray::{Array1, Array2};

mod bernoulli;
mod gaussian;
mod poisson;

pub use bernoulli::BernoulliFamily;
pub use gaussian::GaussianFamily;
pub use poisson::PoissonFamily;

/// A distribution family for GLM fitting.
///
/// Implementations are stateless unit structs; all data arrives through the
/// method arguments, so a single family value is safe to share across models.
pub trait Family {
    /// Human-readable family name, e.g. `"Poisson"`.
    fn name(&self) -> &'static str;

    /// Map the linear predictor to the mean of the response distribution,
    /// elementwise.
    fn link_inverse(&self, eta: &Array1<f64>) -> Array1<f64>;

    /// Total log-likelihood of `y` under the candidate coefficients `beta`.
    ///
    /// Computes `eta = X*beta`, transforms to `mu` via [`Self::link_inverse`],
    /// and sums the per-observation log-density (or log-mass). Invalid
    /// regions contribute `-inf` or `NaN` rather than an error.
    fn log_likelihood(&self, beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // The three families share one contract: predict-side output must come
    // straight from the inverse link. Pin down the shapes here; the per-family
    // values are tested next to each implementation.

    fn all_families() -> [Box<dyn Family>; 3] {
        [
            Box::new(GaussianFamily),
            Box::new(PoissonFamily),
            Box::new(BernoulliFamily),
        ]
    }

    #[test]
    fn link_inverse_preserves_length() {
        let eta = array![-2.0, 0.0, 3.5];
        for family in all_families() {
            assert_eq!(family.link_inverse(&eta).len(), eta.len());
        }
    }

    #[test]
    fn log_likelihood_is_order_independent() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        let y = array![1.0, 0.0, 1.0];
        let x_rev = array![[1.0, 2.0], [1.0, 1.0], [1.0, 0.0]];
        let y_rev = array![1.0, 0.0, 1.0];
        let beta = array![0.1, 0.1];

        for family in all_families() {
            let a = family.log_likelihood(&beta, &x, &y);
            let b = family.log_likelihood(&beta, &x_rev, &y_rev);
            assert!((a - b).abs() < 1e-10, "{}: {} vs {}", family.name(), a, b);
        }
    }
}
