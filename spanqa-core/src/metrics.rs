//! Exact-Match and token F1 against reference answers

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text::Tokenizer;

/// EM and F1 for one prediction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// 1.0 on an exact match, 0.0 otherwise
    pub exact_match: f64,
    /// Token-overlap F1 in [0, 1]
    pub f1: f64,
}

impl MetricResult {
    pub fn new(exact_match: f64, f1: f64) -> Self {
        Self { exact_match, f1 }
    }

    /// Componentwise maximum; EM and F1 may come from different references
    pub fn max(self, other: MetricResult) -> MetricResult {
        MetricResult {
            exact_match: self.exact_match.max(other.exact_match),
            f1: self.f1.max(other.f1),
        }
    }
}

/// Metric functions bound to one tokenizer
#[derive(Debug, Clone, Default)]
pub struct MetricEngine {
    tokenizer: Tokenizer,
}

impl MetricEngine {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn exact_match(&self, pred: &str, truth: &str) -> f64 {
        exact_match(pred, truth)
    }

    /// Token F1 using this engine's tokenizer.
    ///
    /// A predicted token counts once per occurrence when it appears anywhere
    /// in the truth; this is containment, not bag intersection. The recall
    /// numerator is capped at the truth length so the score stays in [0, 1].
    pub fn f1(&self, pred: &str, truth: &str) -> f64 {
        let pred_tokens = self.tokenizer.tokenize(pred);
        let truth_tokens = self.tokenizer.tokenize(truth);
        token_f1(&pred_tokens, &truth_tokens)
    }

    /// Best EM and best F1 over all references
    pub fn best_of<S: AsRef<str>>(&self, pred: &str, truths: &[S]) -> MetricResult {
        truths
            .iter()
            .map(|truth| {
                let truth = truth.as_ref();
                MetricResult::new(self.exact_match(pred, truth), self.f1(pred, truth))
            })
            .fold(MetricResult::default(), MetricResult::max)
    }
}

/// Exact match after normalizing the reference.
///
/// The reference has hyphens turned into spaces and ASCII punctuation
/// removed. The prediction only has its hyphens turned into spaces. Both are
/// compared lowercase as whole strings. A reference that normalizes to the
/// empty string never matches; a whitespace-only one is compared as is.
pub fn exact_match(pred: &str, truth: &str) -> f64 {
    let truth = normalize_truth(truth);
    if truth.is_empty() {
        return 0.0;
    }
    let pred = pred.replace('-', " ").to_lowercase();
    if pred == truth {
        1.0
    } else {
        0.0
    }
}

/// Token F1 with the default tokenizer
pub fn f1(pred: &str, truth: &str) -> f64 {
    MetricEngine::default().f1(pred, truth)
}

/// [`MetricEngine::best_of`] with the default tokenizer
pub fn best_of<S: AsRef<str>>(pred: &str, truths: &[S]) -> MetricResult {
    MetricEngine::default().best_of(pred, truths)
}

fn normalize_truth(truth: &str) -> String {
    truth
        .replace('-', " ")
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase()
}

fn token_f1(pred: &[String], truth: &[String]) -> f64 {
    let truth_set: HashSet<&str> = truth.iter().map(String::as_str).collect();
    let tp = pred.iter().filter(|t| truth_set.contains(t.as_str())).count();
    if tp == 0 {
        return 0.0;
    }
    let precision = tp as f64 / pred.len() as f64;
    let recall = tp.min(truth.len()) as f64 / truth.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_basic() {
        assert_eq!(exact_match("brown", "brown"), 1.0);
        assert_eq!(exact_match("Brown", "brown"), 1.0);
        assert_eq!(exact_match("brown fox", "brown"), 0.0);
    }

    #[test]
    fn test_exact_match_hyphen() {
        assert_eq!(exact_match("the sky", "the-sky"), 1.0);
        assert_eq!(exact_match("the-sky", "the sky"), 1.0);
    }

    #[test]
    fn test_exact_match_asymmetry() {
        // Reference punctuation is stripped, prediction punctuation is not.
        assert_eq!(exact_match("blue", "Blue."), 1.0);
        assert_eq!(exact_match("blue.", "blue"), 0.0);
    }

    #[test]
    fn test_exact_match_empty_reference() {
        assert_eq!(exact_match("", ""), 0.0);
        assert_eq!(exact_match("-", ""), 0.0);
        assert_eq!(exact_match("brown", "!!"), 0.0);
        assert_eq!(exact_match("  ", "  "), 1.0);
    }

    #[test]
    fn test_f1_documented_example() {
        let score = f1("the butler did it", "the butler");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_f1_identity_and_disjoint() {
        assert_eq!(f1("quick brown fox", "quick brown fox"), 1.0);
        assert_eq!(f1("red", "blue"), 0.0);
    }

    #[test]
    fn test_f1_empty_inputs() {
        assert_eq!(f1("brown", ""), 0.0);
        assert_eq!(f1("", "brown"), 0.0);
        assert_eq!(f1("", ""), 0.0);
    }

    #[test]
    fn test_f1_counts_repeats_by_containment() {
        // "the the" vs "the cat": both predicted tokens are contained.
        // precision 2/2, recall 2/2 under containment counting.
        let score = f1("the the", "the cat");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_f1_repeated_prediction_tokens_stay_bounded() {
        assert_eq!(f1("the the the", "the"), 1.0);
        assert_eq!(best_of("kiwi kiwi", &["kiwi"]).f1, 1.0);
        assert!(f1("new new york", "new") <= 1.0);
    }

    #[test]
    fn test_f1_is_punctuation_insensitive() {
        assert_eq!(f1("Brown, fox!", "brown fox"), 1.0);
    }

    #[test]
    fn test_best_of() {
        let refs = ["the sky is blue", "blue", "red", "green"];
        let result = best_of("blue", &refs);
        assert_eq!(result.exact_match, 1.0);
        assert_eq!(result.f1, 1.0);
    }

    #[test]
    fn test_best_of_independent_max() {
        // EM comes from "fox!", F1 from "brown fox" would be lower; both maxed.
        let refs = vec!["fox!".to_string(), "brown fox jumps".to_string()];
        let result = best_of("fox", refs.as_slice());
        assert_eq!(result.exact_match, 1.0);
        assert_eq!(result.f1, 1.0);

        let refs = ["brown fox jumps", "lazy dog"];
        let result = best_of("brown fox", &refs);
        assert_eq!(result.exact_match, 0.0);
        assert!((result.f1 - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_best_of_no_references() {
        let empty: [&str; 0] = [];
        assert_eq!(best_of("anything", &empty), MetricResult::default());
    }

    #[test]
    fn test_engine_custom_tokenizer() {
        let engine = MetricEngine::new(Tokenizer::with_pattern("[.]").unwrap());
        // Hyphen survives tokenization, so the tokens differ.
        assert_eq!(engine.f1("well-known", "well known"), 0.0);
        assert_eq!(MetricEngine::default().f1("well-known", "wellknown"), 1.0);
    }
}
