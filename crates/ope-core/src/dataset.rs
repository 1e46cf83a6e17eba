//! Validated logged-bandit data and input checks.

use ope_math::Matrix;

use crate::error::{EvalError, Result};

/// A validated bundle of logged bandit interactions: covariates, chosen
/// actions, and observed binary rewards with a shared leading dimension.
#[derive(Debug, Clone)]
pub struct LoggedData {
    x: Matrix,
    actions: Vec<usize>,
    rewards: Vec<f64>,
}

impl LoggedData {
    /// Validate and bundle `(X, a, r)`. Rejects length mismatches and
    /// rewards outside {0, 1}.
    pub fn new(x: Matrix, actions: Vec<usize>, rewards: Vec<f64>) -> Result<Self> {
        let n = x.rows();
        check_len("actions", actions.len(), n)?;
        check_len("rewards", rewards.len(), n)?;
        for (row, &value) in rewards.iter().enumerate() {
            if value != 0.0 && value != 1.0 {
                return Err(EvalError::InvalidReward { row, value });
            }
        }
        Ok(Self {
            x,
            actions,
            rewards,
        })
    }

    /// Number of logged observations.
    pub fn len(&self) -> usize {
        self.x.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &Matrix {
        &self.x
    }

    pub fn actions(&self) -> &[usize] {
        &self.actions
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }
}

/// Check that a 1-D companion input has the dataset's leading dimension.
pub fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(EvalError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Check that every action is a valid arm index.
pub fn check_actions(actions: &[usize], nchoices: usize) -> Result<()> {
    for (row, &action) in actions.iter().enumerate() {
        if action >= nchoices {
            return Err(EvalError::InvalidAction {
                row,
                action,
                nchoices,
            });
        }
    }
    Ok(())
}

/// Check that every logging-policy score is strictly positive.
pub fn check_propensities(p: &[f64]) -> Result<()> {
    for (row, &value) in p.iter().enumerate() {
        if !(value > 0.0) {
            return Err(EvalError::InvalidPropensity { row, value });
        }
    }
    Ok(())
}
