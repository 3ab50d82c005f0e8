//! Question-overlap baseline
//!
//! Scores each paragraph position by how many question words sit near it.
//! Positions whose own token appears in the question are pushed down, so the
//! baseline tends to pick a word next to the question words rather than one of
//! them. It needs no trained weights and gives the harness something to run
//! against when no score file is supplied.

use std::collections::HashSet;

use spanqa::{Example, ModelError, ModelResult, ScorePair, ScoringModel, Tokenizer};

/// Score given to positions past the end of the paragraph
pub const PADDING_SCORE: f64 = -1.0e4;

/// Tokens on each side counted as "near"
const WINDOW: usize = 3;

/// Penalty for a position whose token is itself a question word
const QUESTION_WORD_PENALTY: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct OverlapBaseline {
    padded_len: usize,
    tokenizer: Tokenizer,
}

impl OverlapBaseline {
    pub fn new(padded_len: usize, tokenizer: Tokenizer) -> Self {
        Self { padded_len, tokenizer }
    }

    pub fn padded_len(&self) -> usize {
        self.padded_len
    }

    fn position_scores(&self, paragraph: &[String], question: &HashSet<String>) -> Vec<f64> {
        let mut scores = vec![PADDING_SCORE; self.padded_len];
        for (i, score) in scores.iter_mut().enumerate().take(paragraph.len()) {
            let lo = i.saturating_sub(WINDOW);
            let hi = (i + WINDOW + 1).min(paragraph.len());
            let near = (lo..hi)
                .filter(|&j| j != i && question.contains(&paragraph[j]))
                .count() as f64;
            let own = if question.contains(&paragraph[i]) {
                QUESTION_WORD_PENALTY
            } else {
                0.0
            };
            *score = near - own;
        }
        scores
    }
}

impl ScoringModel for OverlapBaseline {
    fn name(&self) -> &str {
        "overlap-baseline"
    }

    fn predict(&self, example: &Example) -> ModelResult<ScorePair> {
        if self.padded_len == 0 {
            return Err(ModelError::Inference("padded length is zero".to_string()));
        }

        let mut paragraph = example.context_tokens(&self.tokenizer);
        if paragraph.len() > self.padded_len {
            tracing::debug!(
                id = %example.id,
                tokens = paragraph.len(),
                padded_len = self.padded_len,
                "Truncating paragraph"
            );
            paragraph.truncate(self.padded_len);
        }

        let question: HashSet<String> = self.tokenizer.tokenize(&example.question).into_iter().collect();
        let scores = self.position_scores(&paragraph, &question);
        Ok(ScorePair::new(scores.clone(), scores))
    }
}
