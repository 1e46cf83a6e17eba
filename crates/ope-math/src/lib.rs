//! Numerical primitives for offline bandit policy evaluation.

pub mod math;

pub use math::beta::*;
pub use math::matrix::Matrix;
pub use math::stable::*;
pub use math::stats::*;
