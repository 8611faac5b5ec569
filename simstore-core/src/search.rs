//! Exact cosine-similarity search over an [`EmbeddingMatrix`].
//!
//! Search is brute force: every stored row is scored against the query.
//! It provides:
//! - 100% recall (exact results)
//! - Deterministic ranking: score descending, then insertion order
//! - O(N·D) scoring plus O(N + k log k) selection of the best `k`

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{Error, Result};
use crate::matrix::EmbeddingMatrix;
use crate::similarity;

/// Default cap on the number of results returned by a search.
pub const DEFAULT_MAXIMUM_RESULTS: usize = 16;

/// Default lower bound on result scores.
pub const DEFAULT_MINIMUM_SCORE: f32 = 0.0;

/// Filters applied to a ranked search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Results scoring below this are dropped. Must lie in `[-1, 1]`.
    pub minimum_score: f32,
    /// At most this many results are returned. `0` returns nothing.
    pub maximum_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            minimum_score: DEFAULT_MINIMUM_SCORE,
            maximum_results: DEFAULT_MAXIMUM_RESULTS,
        }
    }
}

impl SearchOptions {
    /// Creates options with the defaults (`minimum_score = 0`, `maximum_results = 16`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum score. Chainable.
    pub fn with_minimum_score(mut self, minimum_score: f32) -> Self {
        self.minimum_score = minimum_score;
        self
    }

    /// Sets the maximum number of results. Chainable.
    pub fn with_maximum_results(mut self, maximum_results: usize) -> Self {
        self.maximum_results = maximum_results;
        self
    }

    /// Checks that the options are in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if `minimum_score` is NaN or outside `[-1, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.minimum_score) {
            return Err(Error::InvalidOptions(format!(
                "minimum_score must be within [-1, 1], got {}",
                self.minimum_score
            )));
        }
        Ok(())
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<P> {
    /// Row position of the match, i.e. its insertion order.
    pub index: usize,
    /// Cosine similarity with the query, in `[-1, 1]`.
    pub score: f32,
    /// The payload stored alongside the matched embedding.
    pub payload: P,
}

/// A scored row, before payloads are attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRow {
    /// Row position in the matrix.
    pub index: usize,
    /// Cosine similarity with the query.
    pub score: f32,
}

impl ScoredRow {
    /// Rank order: higher score first, lower index breaks ties.
    #[inline]
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Scores every row of `matrix` against `query`.
///
/// The returned vector is indexed by row position.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `query` differs in length from the rows.
pub fn score_all<T: Element>(matrix: &EmbeddingMatrix<T>, query: &[T]) -> Result<Vec<f32>> {
    if query.len() != matrix.dimension() {
        return Err(Error::DimensionMismatch {
            expected: matrix.dimension(),
            got: query.len(),
        });
    }

    let query_norm = similarity::norm(query);
    Ok(matrix
        .iter_rows_with_norms()
        .map(|(row, row_norm)| {
            similarity::cosine_with_norms(similarity::dot_product(query, row), query_norm, row_norm)
        })
        .collect())
}

/// Ranks the rows of `matrix` against `query` and applies `options`.
///
/// Returns at most `options.maximum_results` rows, best first, all scoring
/// at least `options.minimum_score`. Equal scores are ordered by row index.
///
/// # Errors
///
/// - [`Error::InvalidOptions`] if `options` fail validation.
/// - [`Error::DimensionMismatch`] if `query` differs in length from the rows.
pub fn rank<T: Element>(
    matrix: &EmbeddingMatrix<T>,
    query: &[T],
    options: &SearchOptions,
) -> Result<Vec<ScoredRow>> {
    options.validate()?;

    let scores = score_all(matrix, query)?;
    let candidates = scores.len();

    // Rows below the threshold can never be emitted, so they are dropped
    // before selection rather than walked past afterwards.
    let mut ranked: Vec<ScoredRow> = scores
        .into_iter()
        .enumerate()
        .filter(|(_, score)| *score >= options.minimum_score)
        .map(|(index, score)| ScoredRow { index, score })
        .collect();

    let k = options.maximum_results;
    if k == 0 {
        ranked.clear();
    } else if k < ranked.len() {
        ranked.select_nth_unstable_by(k - 1, ScoredRow::rank_cmp);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(ScoredRow::rank_cmp);

    tracing::trace!(
        candidates,
        returned = ranked.len(),
        minimum_score = options.minimum_score,
        maximum_results = options.maximum_results,
        "ranked search candidates"
    );

    Ok(ranked)
}
