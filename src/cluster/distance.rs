// Cosine distance between document vectors.
//
// TF-IDF weights are non-negative, so in practice distances fall in [0, 1]:
// 0 for identical term profiles, 1 for documents with nothing in common.
// A zero vector (a document with no terms) is at distance 1 from everything.

use super::tfidf::{SparseVector, TfIdfMatrix};

/// Distance assigned when a vector has zero norm.
pub const ZERO_NORM_DISTANCE: f64 = 1.0;

/// `1 - (u·v) / (‖u‖‖v‖)`, clamped to [0, 2].
pub fn cosine_distance(u: &SparseVector, v: &SparseVector) -> f64 {
    from_parts(u.dot(v), u.norm(), v.norm())
}

/// Cosine distance over dense slices of equal length.
pub fn cosine_distance_dense(u: &[f64], v: &[f64]) -> f64 {
    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let norm_u = u.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_v = v.iter().map(|b| b * b).sum::<f64>().sqrt();
    from_parts(dot, norm_u, norm_v)
}

fn from_parts(dot: f64, norm_u: f64, norm_v: f64) -> f64 {
    if norm_u == 0.0 || norm_v == 0.0 {
        return ZERO_NORM_DISTANCE;
    }
    (1.0 - dot / (norm_u * norm_v)).clamp(0.0, 2.0)
}

/// Full symmetric pairwise distance matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Row-major values, `n * n` long.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn set(&mut self, i: usize, j: usize, d: f64) {
        self.values[i * self.n + j] = d;
        self.values[j * self.n + i] = d;
    }
}

/// Compute every pairwise document distance. Norms are computed once per row.
pub fn pairwise_distances(matrix: &TfIdfMatrix) -> DistanceMatrix {
    let n = matrix.n_rows();
    let norms: Vec<f64> = matrix.rows().iter().map(SparseVector::norm).collect();
    let mut out = DistanceMatrix {
        n,
        values: vec![0.0; n * n],
    };
    for i in 0..n {
        for j in (i + 1)..n {
            let dot = matrix.row(i).dot(matrix.row(j));
            out.set(i, j, from_parts(dot, norms[i], norms[j]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(entries: &[(usize, f64)]) -> SparseVector {
        SparseVector::from_entries(entries.to_vec())
    }

    #[test]
    fn test_identical_is_zero() {
        let a = v(&[(0, 0.3), (2, 0.9)]);
        assert!(cosine_distance(&a, &a).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_is_one() {
        let a = v(&[(0, 1.0)]);
        let b = v(&[(1, 1.0)]);
        assert_eq!(cosine_distance(&a, &b), 1.0);
    }

    #[test]
    fn test_zero_vector_is_one() {
        let a = v(&[]);
        let b = v(&[(1, 1.0)]);
        assert_eq!(cosine_distance(&a, &b), ZERO_NORM_DISTANCE);
        assert_eq!(cosine_distance(&a, &a), ZERO_NORM_DISTANCE);
    }

    #[test]
    fn test_magnitude_does_not_matter() {
        let a = v(&[(0, 1.0), (1, 2.0)]);
        let b = v(&[(0, 10.0), (1, 20.0)]);
        assert!(cosine_distance(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_dense_is_two() {
        let d = cosine_distance_dense(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sparse_and_dense_agree() {
        let a = [0.2, 0.0, 0.7, 0.1];
        let b = [0.0, 0.5, 0.4, 0.3];
        let sparse = cosine_distance(
            &v(&[(0, 0.2), (2, 0.7), (3, 0.1)]),
            &v(&[(1, 0.5), (2, 0.4), (3, 0.3)]),
        );
        assert!((sparse - cosine_distance_dense(&a, &b)).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_is_symmetric_with_zero_diagonal() {
        let m = TfIdfMatrix::from_dense(&[
            vec![1.0, 0.0, 0.5],
            vec![0.2, 0.8, 0.0],
            vec![0.0, 0.0, 0.0],
        ]);
        let d = pairwise_distances(&m);
        assert_eq!(d.len(), 3);
        for i in 0..3 {
            assert_eq!(d.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(d.get(i, j), d.get(j, i));
            }
        }
        assert_eq!(d.get(0, 2), 1.0);
    }
}
