//! Evaluation examples

use serde::{Deserialize, Serialize};

use crate::text::Tokenizer;

/// Most reference answers an example carries
pub const MAX_REFERENCES: usize = 4;

/// A question over a paragraph with its human reference answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub question: String,
    pub context: String,
    /// Reference answers; empty strings are kept and simply never match
    #[serde(default)]
    pub answers: Vec<String>,
    /// Ground-truth start word, only present in training data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_word: Option<usize>,
    /// Ground-truth end word, only present in training data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_word: Option<usize>,
}

impl Example {
    pub fn new(id: impl Into<String>, question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            context: context.into(),
            answers: Vec::new(),
            start_word: None,
            end_word: None,
        }
    }

    /// Set the reference answers, keeping at most [`MAX_REFERENCES`]
    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers = answers.into_iter().take(MAX_REFERENCES).map(Into::into).collect();
        self
    }

    pub fn with_ground_truth(mut self, start_word: usize, end_word: usize) -> Self {
        self.start_word = Some(start_word);
        self.end_word = Some(end_word);
        self
    }

    /// Paragraph tokens, from the full untruncated context
    pub fn context_tokens(&self, tokenizer: &Tokenizer) -> Vec<String> {
        tokenizer.tokenize(&self.context)
    }

    /// Real (unpadded) paragraph length in tokens
    pub fn valid_len(&self, tokenizer: &Tokenizer) -> usize {
        tokenizer.valid_len(&self.context)
    }
}
