//! Batch simulation against fully-labeled data.
//!
//! When the reward of *every* arm is known for each observation (a
//! one-hot label matrix), a policy can be evaluated exactly by
//! replaying sequential batch decisioning: seed with a random batch,
//! then alternate predict / score / refit over the remaining batches.
//!
//! The simulator takes the covariate and label matrices by value and
//! shuffles the owned copies; callers that need to keep the original
//! ordering should clone before calling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ope_math::Matrix;

use crate::dataset::{check_actions, check_len};
use crate::error::{EvalError, Result};
use crate::policy::Policy;
use crate::random::RandomState;

/// Sequential batch evaluation loop over fully-labeled data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FullyLabeledSimulator {
    /// Refit with `partial_fit` on each batch instead of a full `fit`
    /// on the whole history.
    pub online: bool,
    /// Shuffle the rows (covariates and labels together) before the
    /// pass.
    pub shuffle: bool,
    /// Rows per batch; must be smaller than the row count.
    pub batch_size: usize,
}

impl Default for FullyLabeledSimulator {
    fn default() -> Self {
        Self {
            online: false,
            shuffle: true,
            batch_size: 50,
        }
    }
}

impl FullyLabeledSimulator {
    /// Run the simulation and return the running mean reward after each
    /// evaluated batch. The random seed batch is used only to prime the
    /// policy and is excluded from the means.
    pub fn run(
        &self,
        policy: &mut dyn Policy,
        mut x: Matrix,
        mut y_onehot: Matrix,
        random_state: RandomState,
    ) -> Result<Vec<f64>> {
        let n = x.rows();
        check_len("full-label matrix", y_onehot.rows(), n)?;
        if y_onehot.cols() == 0 {
            return Err(EvalError::NoArms);
        }
        if self.batch_size == 0 || self.batch_size >= n {
            return Err(EvalError::InvalidBatchSize {
                batch_size: self.batch_size,
                n,
            });
        }
        let nchoices = y_onehot.cols();
        let batch = self.batch_size;
        let mut rng = random_state.resolve();

        if self.shuffle {
            let order = rng.shuffled_order(n);
            x.permute_rows(&order);
            y_onehot.permute_rows(&order);
        }

        // Seed batch: random actions prime the policy before it has any
        // history to predict from.
        let mut history_actions: Vec<usize> =
            (0..batch).map(|_| rng.uniform_index(nchoices)).collect();
        let mut history_rewards: Vec<f64> = history_actions
            .iter()
            .enumerate()
            .map(|(i, &a)| y_onehot.get(i, a))
            .collect();
        let seed_x = x.head_rows(batch);
        if self.online {
            policy.partial_fit(&seed_x, &history_actions, &history_rewards);
        } else {
            policy.fit(&seed_x, &history_actions, &history_rewards);
        }
        debug!(n, batch, online = self.online, "fully-labeled simulation");

        let mut running_means = Vec::new();
        let mut cum_reward = 0.0;
        let mut cum_rows = 0usize;
        let mut start = batch;
        while start < n {
            let end = (start + batch).min(n);
            let rows: Vec<usize> = (start..end).collect();
            let batch_x = x.take_rows(&rows);

            let actions = policy.predict(&batch_x);
            check_len("predicted actions", actions.len(), rows.len())?;
            check_actions(&actions, nchoices)?;
            let rewards: Vec<f64> = rows
                .iter()
                .zip(&actions)
                .map(|(&row, &a)| y_onehot.get(row, a))
                .collect();

            cum_reward += rewards.iter().sum::<f64>();
            cum_rows += rows.len();
            running_means.push(cum_reward / cum_rows as f64);

            history_actions.extend_from_slice(&actions);
            history_rewards.extend_from_slice(&rewards);
            if self.online {
                policy.partial_fit(&batch_x, &actions, &rewards);
            } else {
                policy.fit(&x.head_rows(end), &history_actions, &history_rewards);
            }
            start = end;
        }

        Ok(running_means)
    }
}
