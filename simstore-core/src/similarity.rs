//! Similarity primitives for embedding comparisons.
//!
//! All functions accept any [`Element`] kind and accumulate in `f64`, so
//! integer embeddings do not overflow and `f32` embeddings keep precision
//! across long dimensions.

use crate::element::Element;

/// Computes the dot product (inner product) between two vectors.
///
/// Formula: sum(a[i] * b[i])
#[inline]
pub fn dot_product<T: Element>(a: &[T], b: &[T]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.to_f64() * y.to_f64())
        .sum()
}

/// Computes the L2 (Euclidean) norm of a vector.
#[inline]
pub fn norm<T: Element>(a: &[T]) -> f64 {
    a.iter()
        .map(|x| {
            let x = x.to_f64();
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Computes cosine similarity between two vectors.
///
/// Formula: (a · b) / (||a|| * ||b||)
/// Range: [-1, 1] where 1 = identical direction, -1 = opposite direction.
///
/// A zero-norm operand scores `0`.
#[inline]
pub fn cosine_similarity<T: Element>(a: &[T], b: &[T]) -> f32 {
    cosine_with_norms(dot_product(a, b), norm(a), norm(b))
}

/// Turns a precomputed dot product and norms into a cosine score.
///
/// Degenerate inputs (zero or non-finite denominators, NaN components) map
/// to `0`. Rounding overshoot is clamped into `[-1, 1]` and `-0.0` is
/// normalised to `0.0` so that ranking by total order is well behaved.
#[inline]
pub fn cosine_with_norms(dot: f64, norm_a: f64, norm_b: f64) -> f32 {
    let denominator = norm_a * norm_b;
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let score = dot / denominator;
    if !score.is_finite() || score == 0.0 {
        return 0.0;
    }

    score.clamp(-1.0, 1.0) as f32
}
