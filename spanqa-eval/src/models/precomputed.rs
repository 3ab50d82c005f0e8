//! Scores produced offline by an external model

use std::path::Path;

use indexmap::IndexMap;
use spanqa::{Example, ModelError, ModelResult, ScorePair, ScoringModel};

use crate::dataset::LoadError;

/// Start/end score vectors keyed by example id, in file order
#[derive(Debug, Clone, Default)]
pub struct PrecomputedScores {
    name: String,
    scores: IndexMap<String, ScorePair>,
}

impl PrecomputedScores {
    pub fn new(scores: IndexMap<String, ScorePair>) -> Self {
        Self {
            name: "precomputed".to_string(),
            scores,
        }
    }

    /// Label reported in summaries instead of `precomputed`
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load a `{"<id>": {"start": [...], "end": [...]}}` file.
    ///
    /// The model is named after the file stem.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut model = Self::from_json_str(&content)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            model.name = stem.to_string();
        }
        tracing::info!("Loaded scores for {} examples from {:?}", model.len(), path);
        Ok(model)
    }

    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        let scores: IndexMap<String, ScorePair> = serde_json::from_str(content)
            .map_err(|e| LoadError::Parse(format!("score file: {}", e)))?;
        Ok(Self::new(scores))
    }

    pub fn insert(&mut self, id: impl Into<String>, scores: ScorePair) {
        self.scores.insert(id.into(), scores);
    }

    pub fn get(&self, id: &str) -> Option<&ScorePair> {
        self.scores.get(id)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }
}

impl ScoringModel for PrecomputedScores {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, example: &Example) -> ModelResult<ScorePair> {
        self.scores
            .get(&example.id)
            .cloned()
            .ok_or_else(|| ModelError::MissingScores(example.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORES: &str = r#"{
        "b": {"start": [0.0, 1.0], "end": [1.0, 0.0]},
        "a": {"start": [2.0], "end": [3.0]}
    }"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let model = PrecomputedScores::from_json_str(SCORES).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(model.get("a").unwrap().start, vec![2.0]);
    }

    #[test]
    fn test_predict_and_missing() {
        let model = PrecomputedScores::from_json_str(SCORES).unwrap();
        let hit = model.predict(&Example::new("b", "q", "c")).unwrap();
        assert_eq!(hit.padded_len(), 2);

        let miss = model.predict(&Example::new("zzz", "q", "c")).unwrap_err();
        assert!(matches!(miss, ModelError::MissingScores(id) if id == "zzz"));
    }

    #[test]
    fn test_name_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bidaf-dev.json");
        std::fs::write(&path, SCORES).unwrap();
        let model = PrecomputedScores::from_json_file(&path).unwrap();
        assert_eq!(model.name(), "bidaf-dev");
    }

    #[test]
    fn test_malformed_scores() {
        let bad = r#"{"a": {"start": [1.0]}}"#;
        assert!(matches!(PrecomputedScores::from_json_str(bad), Err(LoadError::Parse(_))));
    }
}
