//! Concrete scoring models

pub mod overlap;
pub mod precomputed;

pub use overlap::OverlapBaseline;
pub use precomputed::PrecomputedScores;
