//! Offline policy-evaluation estimators.
//!
//! Each estimator corrects for the selection bias of the logging policy
//! in a different way: rejection sampling discards non-matching rows,
//! the doubly-robust estimator reweights reward-model residuals by
//! inverse propensity, and the capped importance-sampling estimators
//! reweight rewards by a (filtered) estimate ratio.

pub mod doubly_robust;
pub mod fully_labeled;
pub mod importance;
pub mod rejection;

pub use doubly_robust::{DoublyRobust, RewardEstimator};
pub use fully_labeled::FullyLabeledSimulator;
pub use importance::{ImportanceEstimate, Ncis, SimplifiedDoublyRobust};
pub use rejection::{RejectionEstimate, RejectionSampling, StartPoint};
