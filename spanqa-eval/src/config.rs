//! Configuration management for the evaluation harness
//!
//! Loads selection, tokenizer and output settings from TOML files and turns
//! them into the core [`Evaluator`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use spanqa::text::DEFAULT_PUNCTUATION;
use spanqa::{Evaluator, ScoreTransform, SpanSelector, Tokenizer, MAX_SPAN_LEN};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Span selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Longest answer span in tokens
    #[serde(default = "default_max_span_len")]
    pub max_span_len: usize,
    /// Transform applied to raw scores before the outer product
    #[serde(default)]
    pub transform: ScoreTransform,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_span_len: default_max_span_len(),
            transform: ScoreTransform::default(),
        }
    }
}

/// Tokenizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Regex of characters deleted before splitting on whitespace
    #[serde(default = "default_punctuation")]
    pub punctuation: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            punctuation: default_punctuation(),
        }
    }
}

/// Settings for the built-in baseline model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Length every score vector is padded or truncated to
    #[serde(default = "default_padded_len")]
    pub padded_len: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            padded_len: default_padded_len(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_true")]
    pub write_json: bool,
    /// Number of per-example diagnostics printed after a run
    #[serde(default = "default_show_examples")]
    pub show_examples: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            write_json: true,
            show_examples: default_show_examples(),
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_max_span_len() -> usize { MAX_SPAN_LEN }
fn default_punctuation() -> String { DEFAULT_PUNCTUATION.to_string() }
fn default_padded_len() -> usize { 400 }
fn default_output_dir() -> String { "results/runs".to_string() }
fn default_show_examples() -> usize { 5 }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = ["config/spanqa.toml", "spanqa-eval/config/spanqa.toml"];

        for path in &config_paths {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(ConfigError::Io(_)) => {}
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the evaluator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection.max_span_len == 0 {
            return Err(ConfigError::Invalid("selection.max_span_len must be at least 1".to_string()));
        }
        if self.model.padded_len == 0 {
            return Err(ConfigError::Invalid("model.padded_len must be at least 1".to_string()));
        }
        self.tokenizer()?;
        Ok(())
    }

    pub fn selector(&self) -> Result<SpanSelector, ConfigError> {
        let selector = SpanSelector::new(self.selection.max_span_len)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(selector.with_transform(self.selection.transform))
    }

    pub fn tokenizer(&self) -> Result<Tokenizer, ConfigError> {
        Tokenizer::with_pattern(&self.tokenizer.punctuation).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Evaluator built from the selection and tokenizer sections
    pub fn evaluator(&self) -> Result<Evaluator, ConfigError> {
        Ok(Evaluator::new(self.selector()?, self.tokenizer()?))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
