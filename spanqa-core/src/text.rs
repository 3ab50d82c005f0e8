//! Word tokenizer shared by span rendering and F1 scoring
//!
//! Paragraph token indices produced here must line up with the positions the
//! model scored, so every component that needs tokens goes through the same
//! [`Tokenizer`].

use regex::Regex;

use crate::error::TokenizerError;

/// Pattern equivalent to the built-in ASCII punctuation set
pub const DEFAULT_PUNCTUATION: &str = "[[:punct:]]";

#[derive(Debug, Clone)]
enum Punctuation {
    Ascii,
    Pattern(Regex),
}

/// Lowercasing whitespace tokenizer that deletes punctuation
#[derive(Debug, Clone)]
pub struct Tokenizer {
    punctuation: Punctuation,
}

impl Tokenizer {
    /// Tokenizer stripping ASCII punctuation `!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~`
    pub fn new() -> Self {
        Self {
            punctuation: Punctuation::Ascii,
        }
    }

    /// Tokenizer stripping every match of `pattern` instead
    pub fn with_pattern(pattern: &str) -> Result<Self, TokenizerError> {
        if pattern == DEFAULT_PUNCTUATION {
            return Ok(Self::new());
        }
        Ok(Self {
            punctuation: Punctuation::Pattern(Regex::new(pattern)?),
        })
    }

    /// Lowercase, strip punctuation and split on whitespace.
    ///
    /// Punctuation is deleted, not replaced, so `"don't"` becomes `"dont"`
    /// and `"well-known"` becomes `"wellknown"`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Number of real tokens in `text`
    pub fn valid_len(&self, text: &str) -> usize {
        self.clean(text).split_whitespace().count()
    }

    fn clean(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        match &self.punctuation {
            Punctuation::Ascii => lower.chars().filter(|c| !c.is_ascii_punctuation()).collect(),
            Punctuation::Pattern(re) => re.replace_all(&lower, "").into_owned(),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
