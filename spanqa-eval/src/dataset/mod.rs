//! Evaluation datasets

pub mod loader;

pub use loader::{load_examples, load_examples_from_json_str, load_examples_from_jsonl_str, LoadError};

use spanqa::Example;

/// Find an example by id
pub fn find_example<'a>(examples: &'a [Example], id: &str) -> Option<&'a Example> {
    examples.iter().find(|e| e.id == id)
}
