//! Evaluation driver
//!
//! Runs select → render → score for each example. Batch evaluation and the
//! single-example inspection share one scoring routine, so the two
//! can never disagree.

use serde::Serialize;

use crate::error::{EvalError, Result, SpanError};
use crate::example::Example;
use crate::metrics::{MetricEngine, MetricResult};
use crate::model::{ScorePair, ScoringModel};
use crate::render::render;
use crate::span::{ScoreTransform, Span, SpanSelector};
use crate::text::Tokenizer;

/// Scored prediction for one example
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleOutcome {
    pub id: String,
    pub span: Span,
    pub answer: String,
    pub metrics: MetricResult,
}

/// An example that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleFailure {
    pub id: String,
    pub error: String,
}

/// Everything [`Evaluator::evaluate`] computed for a batch
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub model: String,
    pub mean_exact_match: f64,
    pub mean_f1: f64,
    pub outcomes: Vec<ExampleOutcome>,
    pub failures: Vec<ExampleFailure>,
}

/// Headline numbers of a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub scored: usize,
    pub failed: usize,
    pub mean_exact_match: f64,
    pub mean_f1: f64,
}

impl EvaluationReport {
    pub fn summary(&self) -> MetricSummary {
        MetricSummary {
            scored: self.outcomes.len(),
            failed: self.failures.len(),
            mean_exact_match: self.mean_exact_match,
            mean_f1: self.mean_f1,
        }
    }

    pub fn outcome(&self, id: &str) -> Option<&ExampleOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }
}

/// Single-example diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub outcome: ExampleOutcome,
    pub question: String,
    pub context: String,
    pub references: Vec<String>,
    pub tokens: Vec<String>,
    pub valid_len: usize,
    /// Matrix value of the selected span
    pub span_score: f64,
    pub scores: ScorePair,
}

impl Inspection {
    pub fn answer(&self) -> &str {
        &self.outcome.answer
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    selector: SpanSelector,
    metrics: MetricEngine,
}

impl Evaluator {
    pub fn new(selector: SpanSelector, tokenizer: Tokenizer) -> Self {
        Self {
            selector,
            metrics: MetricEngine::new(tokenizer),
        }
    }

    /// Evaluator with a custom span length and transform, default tokenizer
    pub fn with_max_span_len(max_span_len: usize, transform: ScoreTransform) -> std::result::Result<Self, SpanError> {
        let selector = SpanSelector::new(max_span_len)?.with_transform(transform);
        Ok(Self::new(selector, Tokenizer::new()))
    }

    pub fn selector(&self) -> &SpanSelector {
        &self.selector
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        self.metrics.tokenizer()
    }

    /// Evaluate every example and average EM and F1.
    ///
    /// Examples the model or the selector reject are recorded as failures and
    /// left out of the means. If every example of a non-empty batch fails the
    /// whole call fails with [`EvalError::Systemic`].
    pub fn evaluate<M: ScoringModel + ?Sized>(&self, examples: &[Example], model: &M) -> Result<EvaluationReport> {
        let scored = examples
            .iter()
            .map(|example| self.score_example(example, model).map(|s| s.outcome))
            .collect();
        self.collect_report(model.name(), scored)
    }

    /// [`Evaluator::evaluate`] with examples mapped on the rayon pool
    #[cfg(feature = "parallel")]
    pub fn evaluate_par<M: ScoringModel + ?Sized>(&self, examples: &[Example], model: &M) -> Result<EvaluationReport> {
        use rayon::prelude::*;

        let scored = examples
            .par_iter()
            .map(|example| self.score_example(example, model).map(|s| s.outcome))
            .collect();
        self.collect_report(model.name(), scored)
    }

    /// Score one example and keep the intermediate values for display
    pub fn inspect<M: ScoringModel + ?Sized>(&self, example: &Example, model: &M) -> Result<Inspection> {
        let scored = self.score_example(example, model)?;
        Ok(Inspection {
            outcome: scored.outcome,
            question: example.question.clone(),
            context: example.context.clone(),
            references: example.answers.clone(),
            tokens: scored.tokens,
            valid_len: scored.valid_len,
            span_score: scored.span_score,
            scores: scored.scores,
        })
    }

    fn score_example<M: ScoringModel + ?Sized>(&self, example: &Example, model: &M) -> Result<Scored> {
        let scores = model.predict(example).map_err(|source| EvalError::Model {
            id: example.id.clone(),
            source,
        })?;

        let (span, span_score) = self.selector.select_pair(&scores).map_err(|source| EvalError::Shape {
            id: example.id.clone(),
            source,
        })?;

        let tokens = example.context_tokens(self.tokenizer());
        let valid_len = tokens.len();
        let answer = render(&span, &tokens, valid_len);
        let metrics = self.metrics.best_of(&answer, example.answers.as_slice());

        tracing::debug!(
            id = %example.id,
            selected = %span,
            padded_len = scores.padded_len(),
            valid_len,
            answer = %answer,
            em = metrics.exact_match,
            f1 = metrics.f1,
            "Scored example"
        );

        Ok(Scored {
            outcome: ExampleOutcome {
                id: example.id.clone(),
                span,
                answer,
                metrics,
            },
            tokens,
            valid_len,
            span_score,
            scores,
        })
    }

    fn collect_report(&self, model: &str, scored: Vec<Result<ExampleOutcome>>) -> Result<EvaluationReport> {
        let total = scored.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for result in scored {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!("Skipping example: {}", e);
                    failures.push(ExampleFailure {
                        id: e.example_id().unwrap_or_default().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if total > 0 && outcomes.is_empty() {
            let first = failures.first().map(|f| f.error.clone()).unwrap_or_default();
            return Err(EvalError::Systemic { count: total, first });
        }

        let (mean_exact_match, mean_f1) = if outcomes.is_empty() {
            (0.0, 0.0)
        } else {
            let n = outcomes.len() as f64;
            let em: f64 = outcomes.iter().map(|o| o.metrics.exact_match).sum();
            let f1: f64 = outcomes.iter().map(|o| o.metrics.f1).sum();
            (em / n, f1 / n)
        };

        tracing::info!(
            "Evaluated {} examples with {}: EM {:.4}, F1 {:.4} ({} failed)",
            outcomes.len(),
            model,
            mean_exact_match,
            mean_f1,
            failures.len()
        );

        Ok(EvaluationReport {
            model: model.to_string(),
            mean_exact_match,
            mean_f1,
            outcomes,
            failures,
        })
    }
}

struct Scored {
    outcome: ExampleOutcome,
    tokens: Vec<String>,
    valid_len: usize,
    span_score: f64,
    scores: ScorePair,
}
