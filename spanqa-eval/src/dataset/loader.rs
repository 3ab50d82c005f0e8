//! Example loading from JSON and JSON Lines files

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use spanqa::Example;

/// Error type for dataset loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Duplicate example id: {0}")]
    DuplicateId(String),
}

/// Top-level dataset file: either `{"examples": [...]}` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Wrapped { examples: Vec<ExampleRecord> },
    Bare(Vec<ExampleRecord>),
}

/// Ids may be written as strings or as integers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(i64),
}

/// One example as written on disk (flat, human-friendly schema)
#[derive(Debug, Deserialize)]
struct ExampleRecord {
    #[serde(default)]
    id: Option<RecordId>,
    question: String,
    context: String,
    #[serde(default)]
    answers: Vec<String>,
    #[serde(default)]
    answer1: Option<String>,
    #[serde(default)]
    answer2: Option<String>,
    #[serde(default)]
    answer3: Option<String>,
    #[serde(default)]
    answer4: Option<String>,
    #[serde(default)]
    start_word: Option<usize>,
    #[serde(default)]
    end_word: Option<usize>,
}

impl ExampleRecord {
    /// Convert to an `Example`; `index` names examples that carry no id.
    fn into_example(self, index: usize) -> Example {
        let id = match self.id {
            Some(RecordId::Text(s)) => s,
            Some(RecordId::Number(n)) => n.to_string(),
            None => format!("ex-{}", index),
        };

        // A list wins over the numbered columns; absent columns are skipped
        let answers = if self.answers.is_empty() {
            [self.answer1, self.answer2, self.answer3, self.answer4]
                .into_iter()
                .flatten()
                .collect()
        } else {
            self.answers
        };

        let mut example = Example::new(id, self.question, self.context).with_answers(answers);
        example.start_word = self.start_word;
        example.end_word = self.end_word;
        example
    }
}

/// Load examples from a file, choosing the format by extension.
///
/// `.jsonl` files are read as JSON Lines; everything else as a JSON document.
pub fn load_examples(path: impl AsRef<Path>) -> Result<Vec<Example>, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let examples = match ext {
        "jsonl" => load_examples_from_jsonl_str(&content)?,
        _ => load_examples_from_json_str(&content)?,
    };
    tracing::info!("Loaded {} examples from {:?}", examples.len(), path);
    Ok(examples)
}

/// Load examples from a JSON document
pub fn load_examples_from_json_str(content: &str) -> Result<Vec<Example>, LoadError> {
    let file: DatasetFile = serde_json::from_str(content)
        .map_err(|e| LoadError::Parse(format!("JSON parse error: {}", e)))?;
    let records = match file {
        DatasetFile::Wrapped { examples } => examples,
        DatasetFile::Bare(examples) => examples,
    };
    finish(records)
}

/// Load examples from JSON Lines, one record per non-blank line
pub fn load_examples_from_jsonl_str(content: &str) -> Result<Vec<Example>, LoadError> {
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: ExampleRecord = serde_json::from_str(line)
            .map_err(|e| LoadError::Parse(format!("line {}: {}", line_no + 1, e)))?;
        records.push(record);
    }
    finish(records)
}

fn finish(records: Vec<ExampleRecord>) -> Result<Vec<Example>, LoadError> {
    let examples: Vec<Example> = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| record.into_example(idx))
        .collect();

    let mut seen = HashSet::new();
    for example in &examples {
        if !seen.insert(example.id.as_str()) {
            return Err(LoadError::DuplicateId(example.id.clone()));
        }
    }

    Ok(examples)
}
