//! Embedding type for simstore.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::similarity;

/// A dense, fixed-length embedding with components of kind `T`.
///
/// This is the typed value accepted at the API boundary. Plain `Vec<T>` and
/// `&[T]` convert into it, so callers rarely need to name it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound = "T: Element")]
pub struct Embedding<T> {
    data: Vec<T>,
}

impl<T: Element> Embedding<T> {
    /// Creates a new embedding from a slice.
    ///
    /// # Example
    ///
    /// ```
    /// use simstore_core::Embedding;
    ///
    /// let e = Embedding::new(&[1.0f32, 2.0, 3.0]);
    /// assert_eq!(e.dimension(), 3);
    /// ```
    #[inline]
    pub fn new(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Creates an embedding from an owned `Vec<T>`.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Returns the dimension (length) of the embedding.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Returns a slice view of the components.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns true if the embedding has zero components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Computes the L2 norm, widened to `f64`.
    #[inline]
    pub fn norm(&self) -> f64 {
        similarity::norm(&self.data)
    }

    /// Consumes the embedding and returns the underlying data.
    #[inline]
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

impl<T: Element> From<Vec<T>> for Embedding<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Element> From<&[T]> for Embedding<T> {
    fn from(data: &[T]) -> Self {
        Self::new(data)
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Embedding<T> {
    fn from(data: [T; N]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl<T> AsRef<[T]> for Embedding<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T> std::ops::Index<usize> for Embedding<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_creation() {
        let e = Embedding::new(&[1.0f32, 2.0, 3.0]);
        assert_eq!(e.dimension(), 3);
        assert_eq!(e[0], 1.0);
        assert_eq!(e[2], 3.0);
    }

    #[test]
    fn test_embedding_from_array() {
        let e: Embedding<i32> = [1, 2].into();
        assert_eq!(e.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_embedding_norm() {
        let e = Embedding::from_vec(vec![3i64, 4]);
        assert!((e.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_embedding() {
        let e: Embedding<f64> = Vec::new().into();
        assert!(e.is_empty());
        assert_eq!(e.norm(), 0.0);
    }

    #[test]
    fn test_embedding_serializes_as_plain_sequence() {
        let e = Embedding::new(&[1.5f32, -2.0]);
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Embedding<f32> = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
