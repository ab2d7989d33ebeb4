// =============================================================================
// Gaussian (Normal) Family
// =============================================================================
//
// Identity link: the mean IS the linear predictor. The log-likelihood is the
// sum of Normal(mu_i, 1) log-densities - the scale is fixed at 1 and no
// dispersion parameter is estimated. Because the identity-link maximizer does
// not depend on a common scale, the fitted coefficients coincide with the
// ordinary least-squares solution.
//
// =============================================================================

use ndarray::{Array1, Array2};
use statrs::distribution::{Continuous, Normal};

use super::Family;

/// Normal response with identity link and unit scale.
pub struct GaussianFamily;

impl Family for GaussianFamily {
    fn name(&self) -> &'static str {
        "Gaussian"
    }

    fn link_inverse(&self, eta: &Array1<f64>) -> Array1<f64> {
        eta.clone()
    }

    fn log_likelihood(&self, beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
        let eta = x.dot(beta);
        let mu = self.link_inverse(&eta);
        y.iter()
            .zip(mu.iter())
            .map(|(&yi, &mui)| match Normal::new(mui, 1.0) {
                Ok(dist) => dist.ln_pdf(yi),
                // NaN mean: propagate, never panic
                Err(_) => f64::NAN,
            })
            .sum()
    }
}
