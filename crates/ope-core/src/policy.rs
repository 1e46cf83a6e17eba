//! Boundary traits for candidate policies and reward models.
//!
//! The estimators never look inside a policy; they only use the minimal
//! `predict` / `fit` / `partial_fit` contract declared here. Reward
//! models are consumed through `predict_proba_separate`, and raw
//! per-arm classifiers are adapted to that interface by
//! [`SeparateClassifiers`].

use ope_math::Matrix;

use crate::dataset::check_actions;
use crate::error::Result;

/// A contextual-bandit policy under evaluation.
pub trait Policy {
    /// Chosen arm index for each row of `x`.
    fn predict(&self, x: &Matrix) -> Vec<usize>;

    /// Refit on the given history. May be called with empty slices to
    /// reset the policy before a pseudo-online pass.
    fn fit(&mut self, x: &Matrix, actions: &[usize], rewards: &[f64]);

    /// Incremental refit on a recent slice of history. Policies without
    /// incremental fitting fall back to a full `fit` on that slice.
    fn partial_fit(&mut self, x: &Matrix, actions: &[usize], rewards: &[f64]) {
        self.fit(x, actions, rewards);
    }
}

/// A binary probabilistic classifier that can be fit per arm.
pub trait ProbabilisticClassifier {
    /// Fit on covariates and binary targets.
    fn fit(&mut self, x: &Matrix, y: &[f64]);

    /// P(y = 1) for each row of `x`.
    fn predict_proba(&self, x: &Matrix) -> Vec<f64>;

    /// Untrained copy configured like `self`, used to spawn one
    /// classifier per arm.
    fn clone_untrained(&self) -> Box<dyn ProbabilisticClassifier>;
}

/// A model producing per-arm expected-reward estimates.
pub trait RewardModel {
    /// One row per observation, one column per arm.
    fn predict_proba_separate(&self, x: &Matrix) -> Matrix;
}

/// One-classifier-per-arm reward model.
///
/// Each arm's classifier trains only on the rows where that arm was
/// chosen. Arms that never appear in the data stay unfit and predict a
/// constant 0.0, which the doubly-robust evaluator's degenerate-estimate
/// imputation can then replace.
pub struct SeparateClassifiers {
    arms: Vec<Box<dyn ProbabilisticClassifier>>,
    fitted: Vec<bool>,
}

impl SeparateClassifiers {
    /// Spawn `nchoices` untrained copies of the prototype classifier.
    pub fn new(prototype: &dyn ProbabilisticClassifier, nchoices: usize) -> Self {
        Self {
            arms: (0..nchoices).map(|_| prototype.clone_untrained()).collect(),
            fitted: vec![false; nchoices],
        }
    }

    pub fn nchoices(&self) -> usize {
        self.arms.len()
    }

    /// Fit each arm's classifier on the rows where that arm was chosen.
    pub fn fit(&mut self, x: &Matrix, actions: &[usize], rewards: &[f64]) -> Result<()> {
        check_actions(actions, self.arms.len())?;
        for (arm, classifier) in self.arms.iter_mut().enumerate() {
            let rows: Vec<usize> = (0..actions.len()).filter(|&i| actions[i] == arm).collect();
            if rows.is_empty() {
                continue;
            }
            let x_arm = x.take_rows(&rows);
            let y_arm: Vec<f64> = rows.iter().map(|&i| rewards[i]).collect();
            classifier.fit(&x_arm, &y_arm);
            self.fitted[arm] = true;
        }
        Ok(())
    }
}

impl RewardModel for SeparateClassifiers {
    fn predict_proba_separate(&self, x: &Matrix) -> Matrix {
        let mut out = Matrix::zeros(x.rows(), self.arms.len());
        for (arm, classifier) in self.arms.iter().enumerate() {
            if !self.fitted[arm] {
                continue;
            }
            let probs = classifier.predict_proba(x);
            for (i, &p) in probs.iter().enumerate() {
                out.set(i, arm, p);
            }
        }
        out
    }
}
