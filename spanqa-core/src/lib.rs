//! spanqa - answer-span selection and scoring for extractive QA
//!
//! A model emits two score vectors per example (start and end of the
//! answer). This crate turns them into the most likely valid span, renders
//! the span back into text and grades it against the human references with
//! Exact-Match and token F1.
//!
//! # Example
//!
//! ```rust
//! use spanqa::{Evaluator, Example, ModelResult, ScorePair, ScoringModel};
//!
//! struct Peak;
//!
//! impl ScoringModel for Peak {
//!     fn name(&self) -> &str { "peak" }
//!
//!     fn predict(&self, _example: &Example) -> ModelResult<ScorePair> {
//!         let mut start = vec![0.0; 8];
//!         let mut end = vec![0.0; 8];
//!         start[2] = 5.0;
//!         end[2] = 5.0;
//!         Ok(ScorePair::new(start, end))
//!     }
//! }
//!
//! let example = Example::new("q1", "what color is the fox", "the quick brown fox jumps")
//!     .with_answers(["brown", "the brown fox"]);
//!
//! let report = Evaluator::default().evaluate(&[example], &Peak).unwrap();
//! assert_eq!(report.mean_exact_match, 1.0);
//! assert_eq!(report.outcomes[0].answer, "brown");
//! ```

mod error;

pub mod eval;
pub mod example;
pub mod metrics;
pub mod model;
pub mod render;
pub mod span;
pub mod text;

pub use error::{DataShapeError, EvalError, ModelError, Result, SpanError, TokenizerError};
pub use eval::{EvaluationReport, Evaluator, ExampleFailure, ExampleOutcome, Inspection, MetricSummary};
pub use example::Example;
pub use metrics::{best_of, exact_match, f1, MetricEngine, MetricResult};
pub use model::{ModelResult, ScorePair, ScoringModel};
pub use render::{render, NO_ANSWER};
pub use span::{ScoreMatrix, ScoreTransform, ScoreVector, Span, SpanSelector, MAX_SPAN_LEN};
pub use text::Tokenizer;
