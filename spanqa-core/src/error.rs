use thiserror::Error;

/// Result alias for evaluation calls
pub type Result<T> = std::result::Result<T, EvalError>;

/// Score vectors a model returned that cannot be turned into a span
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataShapeError {
    #[error("score vectors are empty")]
    Empty,

    #[error("start scores have {start} positions, end scores have {end}")]
    LengthMismatch { start: usize, end: usize },

    #[error("{vector} score at position {index} is not finite ({value})")]
    NonFinite {
        vector: &'static str,
        index: usize,
        value: f64,
    },

    #[error("batch row {row} has {len} positions, expected {expected}")]
    BatchShape { row: usize, len: usize, expected: usize },
}

/// A span that breaks `start <= end < start + max_len`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    #[error("span end {end} precedes start {start}")]
    Reversed { start: usize, end: usize },

    #[error("span ({start}, {end}) is longer than {max_len} tokens")]
    TooLong { start: usize, end: usize, max_len: usize },

    #[error("maximum span length must be at least 1")]
    ZeroMaxLen,
}

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("invalid punctuation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failures reported by a [`crate::ScoringModel`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("no scores available for example {0}")]
    MissingScores(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("example {id}: {source}")]
    Shape {
        id: String,
        #[source]
        source: DataShapeError,
    },

    #[error("example {id}: {source}")]
    Model {
        id: String,
        #[source]
        source: ModelError,
    },

    #[error("all {count} examples failed, first error: {first}")]
    Systemic { count: usize, first: String },

    #[error(transparent)]
    Span(#[from] SpanError),
}

impl EvalError {
    /// Id of the example that failed, if the error belongs to one
    pub fn example_id(&self) -> Option<&str> {
        match self {
            EvalError::Shape { id, .. } | EvalError::Model { id, .. } => Some(id),
            _ => None,
        }
    }
}
