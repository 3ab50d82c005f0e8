//! End-to-end evaluation through a mock scoring model

use std::collections::HashMap;

use spanqa::{
    EvalError, Evaluator, Example, ModelError, ModelResult, ScorePair, ScoringModel, NO_ANSWER,
};

const PADDED_LEN: usize = 12;

/// Replays hand-written scores keyed by example id
struct MockModel {
    scores: HashMap<String, ScorePair>,
}

impl MockModel {
    fn new() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    fn peak(mut self, id: &str, start: usize, end: usize) -> Self {
        let mut s = vec![-3.0; PADDED_LEN];
        let mut e = vec![-3.0; PADDED_LEN];
        s[start] = 6.0;
        e[end] = 6.0;
        self.scores.insert(id.to_string(), ScorePair::new(s, e));
        self
    }

    fn raw(mut self, id: &str, start: Vec<f64>, end: Vec<f64>) -> Self {
        self.scores.insert(id.to_string(), ScorePair::new(start, end));
        self
    }
}

impl ScoringModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn predict(&self, example: &Example) -> ModelResult<ScorePair> {
        self.scores
            .get(&example.id)
            .cloned()
            .ok_or_else(|| ModelError::MissingScores(example.id.clone()))
    }
}

fn fox() -> Example {
    Example::new("fox", "what color is the fox", "the quick brown fox jumps")
        .with_answers(["brown", "the brown fox", "brown fox", ""])
}

fn butler() -> Example {
    Example::new("butler", "who did it", "In the end, the butler did it.")
        .with_answers(["the butler"])
}

#[test]
fn brown_fox_scenario() {
    let model = MockModel::new().peak("fox", 2, 2);
    let report = Evaluator::default().evaluate(&[fox()], &model).unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.answer, "brown");
    assert_eq!((outcome.span.start(), outcome.span.end()), (2, 2));
    assert_eq!(outcome.metrics.exact_match, 1.0);
    assert_eq!(outcome.metrics.f1, 1.0);
    assert_eq!(report.mean_exact_match, 1.0);
    assert_eq!(report.mean_f1, 1.0);
}

#[test]
fn means_average_over_examples() {
    // "the butler did it" against "the butler": EM 0, F1 2/3
    let model = MockModel::new().peak("fox", 2, 2).peak("butler", 3, 6);
    let report = Evaluator::default()
        .evaluate(&[fox(), butler()], &model)
        .unwrap();

    assert_eq!(report.outcome("butler").unwrap().answer, "the butler did it");
    assert_eq!(report.mean_exact_match, 0.5);
    assert!((report.mean_f1 - (1.0 + 2.0 / 3.0) / 2.0).abs() < 1e-9);
}

#[test]
fn repeated_answer_token_keeps_f1_bounded() {
    let example = Example::new("nyc", "which city", "new new york").with_answers(["new"]);
    let model = MockModel::new().peak("nyc", 0, 1);
    let report = Evaluator::default().evaluate(&[example], &model).unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.answer, "new new");
    assert_eq!(outcome.metrics.exact_match, 0.0);
    assert_eq!(outcome.metrics.f1, 1.0);
    assert!(report.mean_f1 <= 1.0);
}

#[test]
fn shape_error_does_not_abort_batch() {
    let model = MockModel::new()
        .peak("fox", 2, 3)
        .raw("butler", vec![0.0; 5], vec![0.0; 4]);
    let report = Evaluator::default()
        .evaluate(&[fox(), butler()], &model)
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, "butler");
    assert_eq!(report.outcomes[0].answer, "brown fox");
    assert_eq!(report.summary().failed, 1);
    assert_eq!(report.mean_exact_match, 1.0);
}

#[test]
fn non_finite_scores_are_reported() {
    let mut start = vec![0.0; PADDED_LEN];
    start[1] = f64::NAN;
    let model = MockModel::new()
        .peak("fox", 2, 2)
        .raw("butler", start, vec![0.0; PADDED_LEN]);
    let report = Evaluator::default()
        .evaluate(&[fox(), butler()], &model)
        .unwrap();
    assert!(report.failures[0].error.contains("not finite"));
}

#[test]
fn every_example_failing_is_systemic() {
    let model = MockModel::new();
    let err = Evaluator::default()
        .evaluate(&[fox(), butler()], &model)
        .unwrap_err();
    match err {
        EvalError::Systemic { count, first } => {
            assert_eq!(count, 2);
            assert!(first.contains("fox"));
        }
        other => panic!("expected systemic failure, got {other:?}"),
    }
}

#[test]
fn span_in_padding_renders_sentinel() {
    let model = MockModel::new().peak("fox", 9, 10);
    let inspection = Evaluator::default().inspect(&fox(), &model).unwrap();
    assert_eq!(inspection.answer(), NO_ANSWER);
    assert_eq!(inspection.outcome.metrics.exact_match, 0.0);
    assert_eq!(inspection.outcome.metrics.f1, 0.0);
    assert_eq!(inspection.tokens.len(), 5);
}

#[test]
fn inspect_reports_same_values_as_evaluate() {
    let model = MockModel::new().peak("fox", 1, 3).peak("butler", 3, 4);
    let evaluator = Evaluator::default();
    let report = evaluator.evaluate(&[fox(), butler()], &model).unwrap();

    for example in [fox(), butler()] {
        let inspection = evaluator.inspect(&example, &model).unwrap();
        assert_eq!(Some(&inspection.outcome), report.outcome(&example.id));
        assert_eq!(inspection.references, example.answers);
    }
}

#[test]
fn missing_scores_surface_in_inspect() {
    let err = Evaluator::default()
        .inspect(&fox(), &MockModel::new())
        .unwrap_err();
    assert_eq!(err.example_id(), Some("fox"));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_matches_sequential() {
    let model = MockModel::new().peak("fox", 2, 2).peak("butler", 3, 6);
    let examples = [fox(), butler()];
    let evaluator = Evaluator::default();
    let seq = evaluator.evaluate(&examples, &model).unwrap();
    let par = evaluator.evaluate_par(&examples, &model).unwrap();
    assert_eq!(seq.outcomes, par.outcomes);
    assert!((seq.mean_f1 - par.mean_f1).abs() < 1e-12);
}
