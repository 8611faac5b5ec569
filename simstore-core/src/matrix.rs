//! Row-major embedding matrix.
//!
//! The matrix owns one contiguous buffer of `rows * dimension` components
//! and a parallel vector of row norms. Norms are computed once when rows
//! enter the matrix so that a query only pays for its dot products.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::element::Element;
use crate::error::{Error, Result};
use crate::similarity;

/// A dense `[rows, dimension]` matrix of embeddings.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix<T> {
    data: Vec<T>,
    norms: Vec<f64>,
    dimension: usize,
}

impl<T: Element> EmbeddingMatrix<T> {
    /// Stacks row slices into a `[k, D]` block.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyBatch`] if `rows` is empty.
    /// - [`Error::EmptyEmbedding`] if the first row has no components.
    /// - [`Error::DimensionMismatch`] if any row differs in length from the first.
    pub fn stack<'a, I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [T]>,
    {
        let mut rows = rows.into_iter().peekable();
        let dimension = match rows.peek() {
            Some(first) => first.len(),
            None => return Err(Error::EmptyBatch),
        };
        if dimension == 0 {
            return Err(Error::EmptyEmbedding);
        }

        let (lower, _) = rows.size_hint();
        let mut matrix = Self {
            data: Vec::with_capacity(lower * dimension),
            norms: Vec::with_capacity(lower),
            dimension,
        };
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    /// Builds a matrix from owned nested rows, as produced by decoding.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        Self::stack(rows.iter().map(Vec::as_slice))
    }

    /// Consumes `self` and returns it grown by `block`'s rows.
    ///
    /// The existing buffer is moved into the result, never copied, so the
    /// previous matrix cannot outlive this call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the widths differ; `self` is
    /// dropped in that case, so callers validate before concatenating.
    pub fn concat(mut self, block: EmbeddingMatrix<T>) -> Result<Self> {
        if block.dimension != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                got: block.dimension,
            });
        }
        self.data.extend_from_slice(&block.data);
        self.norms.extend_from_slice(&block.norms);
        Ok(self)
    }

    fn push_row(&mut self, row: &[T]) -> Result<()> {
        if row.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                got: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        self.norms.push(similarity::norm(row));
        Ok(())
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.norms.len()
    }

    /// Returns the row width.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns row `index`, if present.
    #[inline]
    pub fn row(&self, index: usize) -> Option<&[T]> {
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.data.get(start..end)
    }

    /// Returns the cached L2 norm of row `index`, if present.
    #[inline]
    pub fn row_norm(&self, index: usize) -> Option<f64> {
        self.norms.get(index).copied()
    }

    /// Iterates rows in insertion order.
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.data.chunks_exact(self.dimension)
    }

    /// Iterates `(row, norm)` pairs in insertion order.
    pub(crate) fn iter_rows_with_norms(&self) -> impl Iterator<Item = (&[T], f64)> + '_ {
        self.iter_rows().zip(self.norms.iter().copied())
    }

    /// Copies the matrix out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }

    /// Returns the flat row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// Writes the matrix as a sequence of sequences without copying it.
impl<T: Element> Serialize for EmbeddingMatrix<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows()))?;
        for row in self.iter_rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
