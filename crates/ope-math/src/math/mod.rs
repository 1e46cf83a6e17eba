//! Numeric building blocks: stable log-domain scalars, the Beta
//! distribution, a dense matrix, and weighted aggregates.

pub mod beta;
pub mod matrix;
pub mod stable;
pub mod stats;
