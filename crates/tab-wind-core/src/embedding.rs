//! Vector similarity helpers.
//!
//! Scores are cosine similarities in `[-1.0, 1.0]`. Degenerate inputs
//! (a zero vector, or two vectors of different length) score `NaN`, and
//! [`compare_scores`] always orders `NaN` after every real score.

use std::cmp::Ordering;

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `NaN` when either vector has zero norm (including empty
/// vectors) or when the lengths differ.
///
/// # Formula
///
/// ```text
///            a · b
/// cos(θ) = ─────────
///          ‖a‖ × ‖b‖
/// ```
///
/// # Example
///
/// ```rust
/// use tab_wind_core::embedding::cosine_similarity;
///
/// let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]);
/// assert!((sim - 1.0).abs() < 1e-6);
/// assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_nan());
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::NAN;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    // 0 / 0 for a zero norm
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Order two scores descending, with `NaN` after every real number.
///
/// Two `NaN`s compare equal, so a stable sort keeps their input order.
pub fn compare_scores(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = vec![0.3, -1.2, 4.0, 0.5];
        let b = vec![2.0, 0.1, -0.7, 1.5];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_nan() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).is_nan());
        assert!(cosine_similarity(&[], &[]).is_nan());
    }

    #[test]
    fn test_cosine_different_lengths_is_nan() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0];
        assert!(cosine_similarity(&a, &b).is_nan());
    }

    #[test]
    fn test_compare_scores_descending() {
        let mut scores = vec![0.1, 0.9, -0.5, 0.4];
        scores.sort_by(|a, b| compare_scores(*a, *b));
        assert_eq!(scores, vec![0.9, 0.4, 0.1, -0.5]);
    }

    #[test]
    fn test_compare_scores_nan_last() {
        let mut scores = vec![f32::NAN, -1.0, 0.5, f32::NAN, 0.0];
        scores.sort_by(|a, b| compare_scores(*a, *b));
        assert_eq!(&scores[..3], &[0.5, 0.0, -1.0]);
        assert!(scores[3].is_nan());
        assert!(scores[4].is_nan());
    }
}
