//! Weighted and unweighted aggregates over sample slices.

/// Arithmetic mean. NaN on empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Self-normalized weighted mean: sum(w_i * v_i) / sum(w_i).
/// NaN on empty input or zero total weight.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    assert_eq!(values.len(), weights.len(), "weight length mismatch");
    let total_w: f64 = weights.iter().sum();
    if values.is_empty() || total_w == 0.0 {
        return f64::NAN;
    }
    let total: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    total / total_w
}

/// Kish effective sample size: (sum w)^2 / sum(w^2). Zero when the
/// weights carry no mass.
pub fn effective_sample_size(weights: &[f64]) -> f64 {
    let sum_w: f64 = weights.iter().sum();
    let sum_w2: f64 = weights.iter().map(|w| w * w).sum();
    if sum_w2 > 0.0 {
        (sum_w * sum_w) / sum_w2
    } else {
        0.0
    }
}
