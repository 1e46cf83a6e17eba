//! Offline policy evaluation for contextual bandits.
//!
//! Given historical logs collected by one policy (contexts, chosen
//! actions, observed binary rewards, and optionally the logging
//! policy's scores for those actions), this crate estimates the value a
//! *different* candidate policy would have obtained, without deploying
//! it. Each estimator embeds a distinct correction for the selection
//! bias of the logging policy:
//!
//! - [`RejectionSampling`]: keep only the rows where the candidate
//!   matches the logged action, offline or pseudo-online with refits.
//! - [`DoublyRobust`]: reward-model estimate plus an inverse-propensity
//!   residual correction on matching rows.
//! - [`SimplifiedDoublyRobust`] / [`Ncis`]: capped importance-sampling
//!   estimators over estimate ratios.
//! - [`FullyLabeledSimulator`]: exact batch replay when the reward of
//!   every arm is known.
//!
//! Policies and reward models are external collaborators reached only
//! through the traits in [`policy`]. All estimators are synchronous,
//! single-pass computations over in-memory arrays; randomness always
//! flows through an explicitly seeded [`RandomState`].

pub mod dataset;
pub mod error;
pub mod eval;
pub mod policy;
pub mod random;

pub use dataset::LoggedData;
pub use error::{EvalError, Result};
pub use eval::doubly_robust::{DoublyRobust, RewardEstimator};
pub use eval::fully_labeled::FullyLabeledSimulator;
pub use eval::importance::{ImportanceEstimate, Ncis, SimplifiedDoublyRobust};
pub use eval::rejection::{RejectionEstimate, RejectionSampling, StartPoint};
pub use policy::{Policy, ProbabilisticClassifier, RewardModel, SeparateClassifiers};
pub use random::{EvalRng, RandomState};
