//! Rejection-sampling policy evaluation.
//!
//! Keeps only the logged rows where the candidate policy chooses the
//! same action the logging policy chose, and averages the observed
//! rewards over those rows. Unbiased only when the logged actions were
//! assigned uniformly at random; that precondition is documented here,
//! not enforced.
//!
//! The pseudo-online mode replays the log one row at a time from an
//! arbitrary start index, wrapping around so every row is visited
//! exactly once, and refits the policy as acceptances accumulate. This
//! approximates a live deployment that begins mid-stream while still
//! covering the whole dataset.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{check_len, LoggedData};
use crate::error::{EvalError, Result};
use crate::policy::Policy;
use crate::random::RandomState;

/// Where the pseudo-online traversal begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPoint {
    /// Uniform draw over `[0, n)` from the resolved generator.
    Random,
    /// Fixed row index; must be within the dataset.
    Index(usize),
}

/// Mean reward over accepted rows, with the acceptance count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RejectionEstimate {
    pub mean_reward: f64,
    pub num_used: usize,
}

/// Match-and-average estimator, offline or pseudo-online.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RejectionSampling {
    /// Refit the policy after this many acceptances (online mode).
    /// Zero disables refits entirely.
    pub update_freq: usize,
    /// Refit incrementally on the most recent `update_freq` acceptances
    /// instead of fully on the whole accepted history.
    pub partial_fit: bool,
}

impl Default for RejectionSampling {
    fn default() -> Self {
        Self {
            update_freq: 10,
            partial_fit: false,
        }
    }
}

impl RejectionSampling {
    /// Evaluate a fixed (already fitted) policy: predict every row once
    /// and average rewards over the rows whose prediction matches the
    /// logged action.
    pub fn evaluate_offline(
        &self,
        policy: &dyn Policy,
        data: &LoggedData,
    ) -> Result<RejectionEstimate> {
        let pred = policy.predict(data.x());
        check_len("predicted actions", pred.len(), data.len())?;

        let mut total = 0.0;
        let mut used = 0usize;
        for (i, &choice) in pred.iter().enumerate() {
            if choice == data.actions()[i] {
                total += data.rewards()[i];
                used += 1;
            }
        }
        debug!(n = data.len(), used, "offline rejection sampling");
        if used == 0 {
            return Err(EvalError::NoMatchingSamples);
        }
        Ok(RejectionEstimate {
            mean_reward: total / used as f64,
            num_used: used,
        })
    }

    /// Replay the log pseudo-online, refitting the policy as it accepts
    /// rows. The policy is reset with an empty fit before the pass.
    pub fn evaluate_online(
        &self,
        policy: &mut dyn Policy,
        data: &LoggedData,
        start: StartPoint,
        random_state: RandomState,
    ) -> Result<RejectionEstimate> {
        let n = data.len();
        if n == 0 {
            return Err(EvalError::NoMatchingSamples);
        }
        let start = match start {
            StartPoint::Random => random_state.resolve().uniform_index(n),
            StartPoint::Index(i) if i < n => i,
            StartPoint::Index(i) => {
                return Err(EvalError::StartPointOutOfRange { start: i, n });
            }
        };
        debug!(n, start, update_freq = self.update_freq, "online rejection sampling");

        policy.fit(&data.x().take_rows(&[]), &[], &[]);

        let mut total = 0.0;
        let mut accepted: Vec<usize> = Vec::new();
        for i in (start..n).chain(0..start) {
            let obs = data.x().take_rows(&[i]);
            let choice = policy.predict(&obs);
            if choice.first() == Some(&data.actions()[i]) {
                total += data.rewards()[i];
                accepted.push(i);
                if self.update_freq > 0 && accepted.len() % self.update_freq == 0 {
                    self.refit(policy, data, &accepted);
                }
            }
        }

        if accepted.is_empty() {
            return Err(EvalError::NoMatchingSamples);
        }
        Ok(RejectionEstimate {
            mean_reward: total / accepted.len() as f64,
            num_used: accepted.len(),
        })
    }

    fn refit(&self, policy: &mut dyn Policy, data: &LoggedData, accepted: &[usize]) {
        let rows: &[usize] = if self.partial_fit {
            &accepted[accepted.len() - self.update_freq..]
        } else {
            accepted
        };
        let x = data.x().take_rows(rows);
        let actions: Vec<usize> = rows.iter().map(|&i| data.actions()[i]).collect();
        let rewards: Vec<f64> = rows.iter().map(|&i| data.rewards()[i]).collect();
        if self.partial_fit {
            policy.partial_fit(&x, &actions, &rewards);
        } else {
            policy.fit(&x, &actions, &rewards);
        }
        debug!(
            accepted = accepted.len(),
            partial = self.partial_fit,
            "refit evaluated policy"
        );
    }
}
