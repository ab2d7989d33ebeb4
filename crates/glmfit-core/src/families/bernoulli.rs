// =============================================================================
// Bernoulli Family
// =============================================================================
//
// Logit link: mu = 1/(1 + exp(-eta)) is a probability strictly inside (0, 1)
// for any finite linear predictor. The log-likelihood sums Bernoulli(mu_i)
// log-masses over the observed 0/1 outcomes. A probability saturated at
// exactly 0 or 1 (eta far into a tail) yields -inf for the mismatching
// outcome; the optimizer backs away from such candidates on its own.
//
// =============================================================================

use ndarray::{Array1, Array2};
use statrs::distribution::{Bernoulli, Discrete};

use super::Family;

/// Binary response with logit link.
pub struct BernoulliFamily;

impl Family for BernoulliFamily {
    fn name(&self) -> &'static str {
        "Bernoulli"
    }

    fn link_inverse(&self, eta: &Array1<f64>) -> Array1<f64> {
        eta.mapv(|e| 1.0 / (1.0 + (-e).exp()))
    }

    fn log_likelihood(&self, beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
        let eta = x.dot(beta);
        let mu = self.link_inverse(&eta);
        y.iter()
            .zip(mu.iter())
            .map(|(&yi, &mui)| {
                if yi != 0.0 && yi != 1.0 {
                    return f64::NEG_INFINITY;
                }
                match Bernoulli::new(mui) {
                    Ok(dist) => dist.ln_pmf(yi as u64),
                    // NaN probability
                    Err(_) => f64::NAN,
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn logit_link_stays_in_unit_interval() {
        let eta = array![-30.0, -1.0, 0.0, 1.0, 30.0];
        let mu = BernoulliFamily.link_inverse(&eta);
        assert!(mu.iter().all(|&m| m > 0.0 && m < 1.0));
        assert!((mu[2] - 0.5).abs() < 1e-15);
        // symmetry of the logistic curve
        assert!((mu[1] + mu[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fair_coin_log_mass() {
        // eta = 0 => p = 1/2; two observations cost 2*ln(1/2)
        let x = array![[1.0], [1.0]];
        let y = array![0.0, 1.0];
        let ll = BernoulliFamily.log_likelihood(&array![0.0], &x, &y);
        assert!((ll - 2.0 * 0.5_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn non_binary_response_is_neg_infinity() {
        let x = array![[1.0]];
        let ll = BernoulliFamily.log_likelihood(&array![0.0], &x, &array![0.5]);
        assert_eq!(ll, f64::NEG_INFINITY);
    }

    #[test]
    fn saturated_probability_is_neg_infinity_not_a_panic() {
        // eta = -800 saturates the logistic at exactly 0.0; observing y = 1
        // there has log-mass -inf.
        let x = array![[1.0]];
        let y = array![1.0];
        let ll = BernoulliFamily.log_likelihood(&array![-800.0], &x, &y);
        assert_eq!(ll, f64::NEG_INFINITY);
    }
}
