//! Constrained arg-max over start/end score vectors
//!
//! The selector works on the padded length of the score vectors. It never
//! sees how many real tokens the paragraph has; mapping a span that points
//! into padding back to text is the renderer's job.

use serde::{Deserialize, Serialize};

use crate::error::{DataShapeError, SpanError};
use crate::model::ScorePair;

/// Longest answer, in tokens, the selector will consider
pub const MAX_SPAN_LEN: usize = 15;

/// One score per padded token position
pub type ScoreVector = Vec<f64>;

/// Inclusive token span with `start <= end < start + max_len`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, max_len: usize) -> Result<Self, SpanError> {
        if max_len == 0 {
            return Err(SpanError::ZeroMaxLen);
        }
        if end < start {
            return Err(SpanError::Reversed { start, end });
        }
        if end - start >= max_len {
            return Err(SpanError::TooLong { start, end, max_len });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of tokens covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a span covers at least one position
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Order-preserving map applied to raw scores before the outer product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTransform {
    /// `exp(x - max(x))`, turning logits into unnormalized probabilities
    #[default]
    Exp,
    /// Scores are already on a comparable positive scale
    Identity,
}

impl ScoreTransform {
    pub fn apply(&self, scores: &[f64]) -> ScoreVector {
        match self {
            ScoreTransform::Exp => {
                let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                scores.iter().map(|s| (s - max).exp()).collect()
            }
            ScoreTransform::Identity => scores.to_vec(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTransform::Exp => "exp",
            ScoreTransform::Identity => "identity",
        }
    }
}

impl std::str::FromStr for ScoreTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exp" => Ok(ScoreTransform::Exp),
            "identity" => Ok(ScoreTransform::Identity),
            other => Err(format!("unknown score transform: {}", other)),
        }
    }
}

/// Masked outer product of transformed start and end scores.
///
/// Cell `(i, j)` holds `start[i] * end[j]` when `i <= j < i + max_span_len`
/// and zero otherwise. Stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    size: usize,
    max_span_len: usize,
    cells: Vec<f64>,
}

impl ScoreMatrix {
    /// Build the masked matrix from already-transformed scores
    pub fn outer(start: &[f64], end: &[f64], max_span_len: usize) -> Result<Self, DataShapeError> {
        if start.len() != end.len() {
            return Err(DataShapeError::LengthMismatch {
                start: start.len(),
                end: end.len(),
            });
        }
        let size = start.len();
        let mut cells = vec![0.0; size * size];
        for (i, s) in start.iter().enumerate() {
            let row = &mut cells[i * size..(i + 1) * size];
            for j in i..size.min(i.saturating_add(max_span_len)) {
                row[j] = s * end[j];
            }
        }
        Ok(Self {
            size,
            max_span_len,
            cells,
        })
    }

    /// Padded length along each axis
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_span_len(&self) -> usize {
        self.max_span_len
    }

    /// Whether `(i, j)` satisfies the ordering and length constraint
    pub fn is_valid(&self, i: usize, j: usize) -> bool {
        i < self.size && j < self.size && i <= j && j < i.saturating_add(self.max_span_len)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.cells[i * self.size + j])
        } else {
            None
        }
    }

    /// Highest valid cell, first in row-major order on ties.
    ///
    /// Only valid cells compete, so a masked zero can never beat a scored
    /// cell. When every valid cell is zero the result is `(0, 0)`.
    pub fn argmax(&self) -> Option<(Span, f64)> {
        if self.size == 0 || self.max_span_len == 0 {
            return None;
        }
        let mut best = (0, 0, self.cells[0]);
        for i in 0..self.size {
            let row = &self.cells[i * self.size..(i + 1) * self.size];
            for (j, &value) in row
                .iter()
                .enumerate()
                .take(self.size.min(i.saturating_add(self.max_span_len)))
                .skip(i)
            {
                if value > best.2 {
                    best = (i, j, value);
                }
            }
        }
        Some((
            Span {
                start: best.0,
                end: best.1,
            },
            best.2,
        ))
    }
}

/// Picks the best valid span from a pair of score vectors
#[derive(Debug, Clone, Copy)]
pub struct SpanSelector {
    max_span_len: usize,
    transform: ScoreTransform,
}

impl SpanSelector {
    pub fn new(max_span_len: usize) -> Result<Self, SpanError> {
        if max_span_len == 0 {
            return Err(SpanError::ZeroMaxLen);
        }
        Ok(Self {
            max_span_len,
            transform: ScoreTransform::default(),
        })
    }

    pub fn with_transform(mut self, transform: ScoreTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn max_span_len(&self) -> usize {
        self.max_span_len
    }

    pub fn transform(&self) -> ScoreTransform {
        self.transform
    }

    /// Best span for one example
    pub fn select(&self, start: &[f64], end: &[f64]) -> Result<Span, DataShapeError> {
        self.select_scored(start, end).map(|(span, _)| span)
    }

    /// Best span together with its matrix value
    pub fn select_scored(&self, start: &[f64], end: &[f64]) -> Result<(Span, f64), DataShapeError> {
        let matrix = self.matrix(start, end)?;
        // validate() rejected empty vectors, so the matrix has a (0, 0) cell
        matrix.argmax().ok_or(DataShapeError::Empty)
    }

    pub fn select_pair(&self, scores: &ScorePair) -> Result<(Span, f64), DataShapeError> {
        self.select_scored(&scores.start, &scores.end)
    }

    /// Best span for each row of a fixed-shape batch.
    ///
    /// Rows whose length differs from the first row are reported as
    /// [`DataShapeError::BatchShape`]; all other rows go through
    /// [`SpanSelector::select`] unchanged.
    pub fn select_batch(&self, batch: &[ScorePair]) -> Vec<Result<Span, DataShapeError>> {
        let expected = match batch.first() {
            Some(first) => first.start.len(),
            None => return Vec::new(),
        };

        batch
            .iter()
            .enumerate()
            .map(|(row, pair)| {
                let len = pair.start.len().max(pair.end.len());
                if pair.start.len() == pair.end.len() && len != expected {
                    return Err(DataShapeError::BatchShape { row, len, expected });
                }
                self.select(&pair.start, &pair.end)
            })
            .collect()
    }

    /// The masked score matrix the selection is made from
    pub fn matrix(&self, start: &[f64], end: &[f64]) -> Result<ScoreMatrix, DataShapeError> {
        validate(start, end)?;
        let start = self.transform.apply(start);
        let end = self.transform.apply(end);
        ScoreMatrix::outer(&start, &end, self.max_span_len)
    }
}

impl Default for SpanSelector {
    fn default() -> Self {
        Self {
            max_span_len: MAX_SPAN_LEN,
            transform: ScoreTransform::default(),
        }
    }
}

fn validate(start: &[f64], end: &[f64]) -> Result<(), DataShapeError> {
    if start.len() != end.len() {
        return Err(DataShapeError::LengthMismatch {
            start: start.len(),
            end: end.len(),
        });
    }
    if start.is_empty() {
        return Err(DataShapeError::Empty);
    }
    for (vector, scores) in [("start", start), ("end", end)] {
        if let Some((index, &value)) = scores.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DataShapeError::NonFinite { vector, index, value });
        }
    }
    Ok(())
}
