//! The scoring model seam
//!
//! The network that produces start/end scores lives outside this crate.
//! The evaluator only needs something implementing [`ScoringModel`], passed
//! in explicitly for each call.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::example::Example;
use crate::span::ScoreVector;

pub type ModelResult<T> = Result<T, ModelError>;

/// Start and end scores for one example, both of padded length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub start: ScoreVector,
    pub end: ScoreVector,
}

impl ScorePair {
    pub fn new(start: ScoreVector, end: ScoreVector) -> Self {
        Self { start, end }
    }

    /// Padded length, taken from the start vector
    pub fn padded_len(&self) -> usize {
        self.start.len()
    }
}

/// Anything that scores answer positions for an example
pub trait ScoringModel: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Score every padded position of the example's paragraph
    fn predict(&self, example: &Example) -> ModelResult<ScorePair>;
}

impl<M: ScoringModel + ?Sized> ScoringModel for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, example: &Example) -> ModelResult<ScorePair> {
        (**self).predict(example)
    }
}

impl<M: ScoringModel + ?Sized> ScoringModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, example: &Example) -> ModelResult<ScorePair> {
        (**self).predict(example)
    }
}
