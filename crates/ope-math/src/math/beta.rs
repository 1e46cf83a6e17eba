//! Beta distribution: moments, CDF, and quantile.
//!
//! The CDF is the regularized incomplete beta function evaluated with a
//! continued-fraction expansion (Numerical Recipes). The quantile is a
//! bisection inversion of the CDF; it is the basis for inverse-transform
//! Beta sampling in the evaluation crate.

use super::stable::log_beta;

const CF_MAX_ITERS: usize = 200;
const CF_EPS: f64 = 3.0e-7;
const CF_FPMIN: f64 = 1.0e-30;
const QUANTILE_TOL: f64 = 1e-10;

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Regularized incomplete beta function I_x(alpha, beta).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (alpha * x.ln() + beta * (1.0 - x).ln() - log_beta(alpha, beta)).exp();
    // The continued fraction converges fastest below this pivot; above it,
    // evaluate the symmetric complement instead.
    let pivot = (alpha + 1.0) / (alpha + beta + 2.0);
    if x < pivot {
        front * inc_beta_cf(alpha, beta, x) / alpha
    } else {
        1.0 - front * inc_beta_cf(beta, alpha, 1.0 - x) / beta
    }
}

/// Quantile (inverse CDF) of Beta(alpha, beta) by bisection.
pub fn beta_quantile(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let mut low = 0.0;
    let mut high = 1.0;
    let mut mid = 0.5;
    for _ in 0..200 {
        mid = 0.5 * (low + high);
        let cdf = beta_cdf(mid, alpha, beta);
        if cdf.is_nan() {
            return f64::NAN;
        }
        let delta = cdf - p;
        if delta.abs() < QUANTILE_TOL {
            break;
        }
        if delta < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }
    mid
}

/// Lentz's continued fraction for the incomplete beta function.
fn inc_beta_cf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < CF_FPMIN {
        d = CF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=CF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        // Even step of the recurrence.
        let numer = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 + numer * d;
        if d.abs() < CF_FPMIN {
            d = CF_FPMIN;
        }
        c = 1.0 + numer / c;
        if c.abs() < CF_FPMIN {
            c = CF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step.
        let numer = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 + numer * d;
        if d.abs() < CF_FPMIN {
            d = CF_FPMIN;
        }
        c = 1.0 + numer / c;
        if c.abs() < CF_FPMIN {
            c = CF_FPMIN;
        }
        d = 1.0 / d;
        let step = d * c;
        h *= step;
        if (step - 1.0).abs() < CF_EPS {
            break;
        }
    }

    h
}
