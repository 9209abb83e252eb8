//! Exact k-nearest-neighbor ground truth by linear scan.
//!
//! For every query vector, the engine computes the squared Euclidean distance
//! to every base vector and keeps the `k` smallest through a bounded
//! [`SizedHeap`]. No pruning or approximation is applied: the result is the
//! exact answer that approximate indices are measured against.
//!
//! Candidates are ordered by `(distance, index)`, so two base rows at the
//! same distance always resolve to the smaller row index. Results are
//! therefore byte-identical across runs and thread counts.

use distances::vectors::euclidean_sq;
use rayon::prelude::*;

use crate::{Error, Result, SizedHeap, VectorMatrix};

/// The number of neighbors stored in a standard ground-truth file.
pub const DEFAULT_K: usize = 100;

/// Computes the exact `k` nearest base rows for every query row.
///
/// Returns a matrix of shape `(query.cardinality(), k)` whose `i`-th row
/// holds the indices of the base rows nearest to query row `i`, ordered by
/// non-decreasing squared Euclidean distance. A zero-row query matrix yields
/// the zero-row sentinel.
///
/// Query rows are processed in parallel; they share no mutable state and the
/// output ordering does not depend on the number of threads.
///
/// # Errors
///
/// * `InvalidArgument` if `k` is zero, if the base matrix is empty, if `k`
///   exceeds the number of base rows, or if the base rows cannot be indexed
///   by an `i32`.
/// * `DimensionMismatch` if the base and query column counts differ.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn compute_ground_truth(
    base: &VectorMatrix<f32>,
    query: &VectorMatrix<f32>,
    k: usize,
) -> Result<VectorMatrix<i32>> {
    if k == 0 {
        return Err(Error::InvalidArgument("k must be positive".to_string()));
    }
    if base.is_empty() {
        return Err(Error::InvalidArgument(
            "base matrix has no rows, so no neighbors exist".to_string(),
        ));
    }
    if k > base.cardinality() {
        return Err(Error::InvalidArgument(format!(
            "k = {k} exceeds the {} base rows",
            base.cardinality()
        )));
    }
    if i32::try_from(base.cardinality()).is_err() {
        return Err(Error::InvalidArgument(format!(
            "{} base rows cannot be indexed by the 4-byte entries of an index file",
            base.cardinality()
        )));
    }
    if query.is_empty() {
        return Ok(VectorMatrix::empty());
    }
    if base.dimensionality() != query.dimensionality() {
        return Err(Error::DimensionMismatch {
            base: base.dimensionality(),
            query: query.dimensionality(),
        });
    }

    let values = query
        .par_rows()
        .flat_map_iter(|row| knn(base, row, k).into_iter().map(|(i, _)| i as i32))
        .collect::<Vec<_>>();
    VectorMatrix::from_flat(values, k)
}

/// The exact `k` nearest base rows to one query vector, by linear scan.
///
/// Returns at most `k` pairs of `(base row index, squared distance)`, ordered
/// by `(distance, index)` ascending. The caller must ensure the query has the
/// same dimensionality as the base rows.
#[must_use]
pub fn knn(base: &VectorMatrix<f32>, query: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut hits = SizedHeap::new(k);
    for (i, row) in base.rows().enumerate() {
        hits.push((euclidean_sq::<f32, f32>(row, query), i));
    }
    hits.into_sorted().into_iter().map(|(d, i)| (i, d)).collect()
}

/// Parallel version of [`knn`], scanning the base rows across threads.
///
/// Each thread folds its share of the base into its own [`SizedHeap`]; the
/// heaps are then merged, so the result is identical to the serial scan.
#[must_use]
pub fn par_knn(base: &VectorMatrix<f32>, query: &[f32], k: usize) -> Vec<(usize, f32)> {
    base.par_rows()
        .enumerate()
        .fold(
            || SizedHeap::new(k),
            |mut hits, (i, row)| {
                hits.push((euclidean_sq::<f32, f32>(row, query), i));
                hits
            },
        )
        .reduce(
            || SizedHeap::new(k),
            |mut a, b| {
                a.merge(b);
                a
            },
        )
        .into_sorted()
        .into_iter()
        .map(|(d, i)| (i, d))
        .collect()
}

/// Tests for the ground-truth engine.
#[cfg(test)]
mod tests {
    use crate::{Error, VectorMatrix};

    use super::{compute_ground_truth, knn, par_knn};

    /// The base matrix used throughout: distances from the origin are
    /// 0 (row 0), 1 (row 1), 1 (row 2), and 50 (row 3).
    fn tiny_base() -> VectorMatrix<f32> {
        VectorMatrix::from_rows(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
        ])
        .unwrap_or_else(|e| unreachable!("{e}"))
    }

    #[test]
    fn tiny_exactness() -> Result<(), String> {
        let base = tiny_base();
        let query = VectorMatrix::from_rows(vec![vec![0.0, 0.0]]).map_err(|e| e.to_string())?;

        let gt = compute_ground_truth(&base, &query, 2).map_err(|e| e.to_string())?;
        assert_eq!(gt.cardinality(), 1);
        assert_eq!(gt.dimensionality(), 2);
        // Rows 1 and 2 tie at distance 1; the smaller index wins.
        assert_eq!(gt.get(0), &[0, 1]);

        let gt = compute_ground_truth(&base, &query, 4).map_err(|e| e.to_string())?;
        assert_eq!(gt.get(0), &[0, 1, 2, 3]);

        Ok(())
    }

    #[test]
    fn knn_distances() {
        let base = tiny_base();
        let hits = knn(&base, &[0.0, 0.0], 4);
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0], (0, 0.0));
        assert!(float_cmp::approx_eq!(f32, hits[1].1, 1.0));
        assert!(float_cmp::approx_eq!(f32, hits[2].1, 1.0));
        assert!(float_cmp::approx_eq!(f32, hits[3].1, 50.0));
    }

    #[test]
    fn par_matches_serial() {
        let base = tiny_base();
        for k in 1..=4 {
            assert_eq!(knn(&base, &[0.5, 0.5], k), par_knn(&base, &[0.5, 0.5], k));
        }
    }

    #[test]
    fn empty_query() -> Result<(), String> {
        let base = tiny_base();
        let gt = compute_ground_truth(&base, &VectorMatrix::empty(), 2).map_err(|e| e.to_string())?;
        assert!(gt.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_arguments() {
        let base = tiny_base();
        let query = VectorMatrix::from_rows(vec![vec![0.0_f32, 0.0]]).unwrap_or_else(|e| unreachable!("{e}"));

        assert!(matches!(
            compute_ground_truth(&base, &query, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_ground_truth(&base, &query, 5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_ground_truth(&VectorMatrix::empty(), &query, 1),
            Err(Error::InvalidArgument(_))
        ));

        let skewed = VectorMatrix::from_rows(vec![vec![0.0_f32, 0.0, 0.0]]).unwrap_or_else(|e| unreachable!("{e}"));
        assert!(matches!(
            compute_ground_truth(&base, &skewed, 2),
            Err(Error::DimensionMismatch { base: 2, query: 3 })
        ));
    }
}
