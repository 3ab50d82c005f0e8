//! Evaluation harness for extractive question answering
//!
//! Loads datasets and model scores from disk, runs them through the
//! [`spanqa`] evaluator and reports Exact Match and F1.
//!
//! # Example
//!
//! ```no_run
//! use spanqa_eval::{
//!     config::Config,
//!     dataset::load_examples,
//!     models::PrecomputedScores,
//!     reporting::print_console_report,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default();
//!     let examples = load_examples("data/dev.json")?;
//!     let model = PrecomputedScores::from_json_file("data/dev-scores.json")?;
//!
//!     let report = config.evaluator()?.evaluate(&examples, &model)?;
//!     print_console_report(&report, &examples, config.output.show_examples);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod models;
pub mod reporting;

pub use config::{Config, ConfigError};
pub use dataset::LoadError;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dataset::{load_examples, LoadError};
    pub use crate::models::{OverlapBaseline, PrecomputedScores};
    pub use crate::reporting::{print_console_report, print_inspection, JsonSummary};
    pub use spanqa::{Evaluator, Example, ScoringModel};
}
