// =============================================================================
// Poisson Family
// =============================================================================
//
// Log link: mu = exp(eta), so the rate is positive for any finite linear
// predictor. The log-likelihood sums Poisson(mu_i) log-masses over the
// observed counts. Non-integer or negative responses have no probability mass
// and contribute -inf, as does a rate that underflows to zero.
//
// =============================================================================

use ndarray::{Array1, Array2};
use statrs::distribution::{Discrete, Poisson};

use super::Family;

/// Count response with log link.
pub struct PoissonFamily;

impl Family for PoissonFamily {
    fn name(&self) -> &'static str {
        "Poisson"
    }

    fn link_inverse(&self, eta: &Array1<f64>) -> Array1<f64> {
        eta.mapv(f64::exp)
    }

    fn log_likelihood(&self, beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
        let eta = x.dot(beta);
        let mu = self.link_inverse(&eta);
        y.iter()
            .zip(mu.iter())
            .map(|(&yi, &mui)| {
                if yi < 0.0 || yi.fract() != 0.0 {
                    return f64::NEG_INFINITY;
                }
                match Poisson::new(mui) {
                    Ok(dist) => dist.ln_pmf(yi as u64),
                    // rate underflowed to 0 or is NaN
                    Err(_) => f64::NEG_INFINITY,
                }
            })
            .sum()
    }
}
