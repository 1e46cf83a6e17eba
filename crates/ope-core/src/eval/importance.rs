//! Capped importance-sampling estimators.
//!
//! Both estimators weight each logged row by `w = est / p`, the ratio of
//! the candidate policy's reward estimate to the logging policy's score
//! for the same action. The ratio is a proxy for a true importance
//! ratio between action probabilities, so these estimators are
//! approximate by construction; they are still useful when only
//! expected-reward scores are available.
//!
//! Ratios below `cmin` are raised to `cmin`; rows whose ratio exceeds
//! `cmax` are discarded outright, so the cap acts as an outlier filter
//! rather than a ceiling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ope_math::{effective_sample_size, mean, weighted_mean};

use crate::dataset::{check_len, check_propensities, LoggedData};
use crate::error::{EvalError, Result};

/// Value of a capped importance-sampling estimate, with the kept-row
/// count and the Kish effective sample size of the kept weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportanceEstimate {
    pub value: f64,
    pub num_kept: usize,
    pub effective_sample_size: f64,
}

/// Doubly-robust-flavored correction with the estimate ratio standing
/// in for the importance weight: mean of `(r - p) * w + est` over kept
/// rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimplifiedDoublyRobust {
    /// Lower clip for the estimate ratio.
    pub cmin: f64,
    /// Discard threshold for the estimate ratio.
    pub cmax: f64,
}

impl Default for SimplifiedDoublyRobust {
    fn default() -> Self {
        Self {
            cmin: 1e-8,
            cmax: 1e2,
        }
    }
}

/// Normalized capped importance sampling: rewards averaged with the
/// ratios as weights, normalized by the total kept weight rather than
/// the kept count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ncis {
    /// Lower clip for the estimate ratio.
    pub cmin: f64,
    /// Discard threshold for the estimate ratio.
    pub cmax: f64,
}

impl Default for Ncis {
    fn default() -> Self {
        Self {
            cmin: 1e-8,
            cmax: 1e3,
        }
    }
}

impl SimplifiedDoublyRobust {
    /// `est` holds the candidate policy's scores for the logged actions;
    /// `p` holds the logging policy's scores, in the same scale.
    pub fn evaluate(&self, est: &[f64], data: &LoggedData, p: &[f64]) -> Result<ImportanceEstimate> {
        let (weights, kept) = capped_weights(est, data, p, self.cmin, self.cmax)?;
        let corrected: Vec<f64> = kept
            .iter()
            .zip(&weights)
            .map(|(&i, &w)| (data.rewards()[i] - p[i]) * w + est[i])
            .collect();
        debug!(n = data.len(), kept = kept.len(), "simplified doubly-robust evaluation");
        Ok(ImportanceEstimate {
            value: mean(&corrected),
            num_kept: kept.len(),
            effective_sample_size: effective_sample_size(&weights),
        })
    }
}

impl Ncis {
    /// `est` holds the candidate policy's scores for the logged actions;
    /// `p` holds the logging policy's scores, in the same scale.
    pub fn evaluate(&self, est: &[f64], data: &LoggedData, p: &[f64]) -> Result<ImportanceEstimate> {
        let (weights, kept) = capped_weights(est, data, p, self.cmin, self.cmax)?;
        // A zero lower clip can leave every kept weight at zero, which
        // would make the normalizing denominator vanish.
        if weights.iter().sum::<f64>() == 0.0 {
            return Err(EvalError::ZeroImportanceMass);
        }
        let rewards: Vec<f64> = kept.iter().map(|&i| data.rewards()[i]).collect();
        debug!(n = data.len(), kept = kept.len(), "NCIS evaluation");
        Ok(ImportanceEstimate {
            value: weighted_mean(&rewards, &weights),
            num_kept: kept.len(),
            effective_sample_size: effective_sample_size(&weights),
        })
    }
}

/// Clipped ratios `max(est/p, cmin)` for the rows whose ratio does not
/// exceed `cmax`, with the kept row indices.
fn capped_weights(
    est: &[f64],
    data: &LoggedData,
    p: &[f64],
    cmin: f64,
    cmax: f64,
) -> Result<(Vec<f64>, Vec<usize>)> {
    let n = data.len();
    check_len("candidate scores", est.len(), n)?;
    check_len("propensities", p.len(), n)?;
    check_propensities(p)?;

    let mut weights = Vec::with_capacity(n);
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let w = (est[i] / p[i]).max(cmin);
        if w <= cmax {
            weights.push(w);
            kept.push(i);
        }
    }
    if kept.is_empty() {
        return Err(EvalError::NoSamplesBelowCap { cmax });
    }
    Ok((weights, kept))
}
