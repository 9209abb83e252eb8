//! Spot-checks of a stored ground-truth matrix against recomputation.
//!
//! Verification re-runs the exact engine on a sample of query rows and
//! compares the stored neighbor rows against the fresh results. The content
//! comparison is order-independent and strict; the ordering comparison of
//! the leading entries is advisory only, since distance ties can legitimately
//! produce different valid orderings in files written by other tools.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{ground_truth, Error, Result, VectorMatrix};

/// Number of leading entries compared for the advisory ordering check.
const ORDER_PREFIX: usize = 5;

/// The outcome of checking one sampled query row.
pub struct RowCheck {
    /// Index of the sampled query row.
    pub query_index: usize,
    /// Stored entries that are not in the recomputed exact neighbor set.
    pub missing: Vec<i32>,
    /// Whether the first few stored entries match the recomputed order.
    ///
    /// Advisory: a `false` here never fails the verification on its own.
    pub ordered_prefix: bool,
}

impl RowCheck {
    /// Whether the stored neighbor set matches the recomputed set exactly.
    #[must_use]
    pub fn contents_match(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Aggregated verification results over the sampled query rows.
pub struct VerificationReport {
    /// The number of neighbors per ground-truth row.
    pub k: usize,
    /// Per-row outcomes, in ascending order of query index.
    pub rows: Vec<RowCheck>,
}

impl VerificationReport {
    /// Passes iff every sampled row's content check succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.rows.iter().all(RowCheck::contents_match)
    }

    /// The sampled rows whose content check failed.
    pub fn failures(&self) -> impl Iterator<Item = &RowCheck> {
        self.rows.iter().filter(|row| !row.contents_match())
    }
}

/// Verifies a stored ground-truth matrix by recomputing a sample of rows.
///
/// Draws `sample_size` distinct query rows (all rows when `sample_size`
/// covers the whole query set), recomputes the exact top-k neighbors of each
/// with the same distance definition used by
/// [`compute_ground_truth`](crate::ground_truth::compute_ground_truth), and
/// checks the stored row against the recomputed set. Pass `seed` to make the
/// sample reproducible.
///
/// # Errors
///
/// * `InvalidArgument` if the ground-truth row count differs from the query
///   row count.
/// * `DimensionMismatch` if the base and query column counts differ.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn verify(
    base: &VectorMatrix<f32>,
    query: &VectorMatrix<f32>,
    ground_truth: &VectorMatrix<i32>,
    sample_size: usize,
    seed: Option<u64>,
) -> Result<VerificationReport> {
    if ground_truth.cardinality() != query.cardinality() {
        return Err(Error::InvalidArgument(format!(
            "ground truth has {} rows but query has {}",
            ground_truth.cardinality(),
            query.cardinality()
        )));
    }
    if !query.is_empty() && base.dimensionality() != query.dimensionality() {
        return Err(Error::DimensionMismatch {
            base: base.dimensionality(),
            query: query.dimensionality(),
        });
    }

    let k = ground_truth.dimensionality();
    let sampled = if sample_size >= query.cardinality() {
        (0..query.cardinality()).collect::<Vec<_>>()
    } else {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut indices = rand::seq::index::sample(&mut rng, query.cardinality(), sample_size).into_vec();
        indices.sort_unstable();
        indices
    };

    let rows = sampled
        .into_iter()
        .map(|query_index| {
            let stored = ground_truth.get(query_index);
            let exact = ground_truth::par_knn(base, query.get(query_index), k);
            let exact_set = exact.iter().map(|&(i, _)| i as i32).collect::<HashSet<_>>();

            let missing = stored
                .iter()
                .copied()
                .filter(|index| !exact_set.contains(index))
                .collect::<Vec<_>>();

            let prefix = ORDER_PREFIX.min(stored.len()).min(exact.len());
            let ordered_prefix = stored[..prefix]
                .iter()
                .zip(exact[..prefix].iter())
                .all(|(&s, &(e, _))| s == e as i32);

            RowCheck {
                query_index,
                missing,
                ordered_prefix,
            }
        })
        .collect();

    Ok(VerificationReport { k, rows })
}

/// Tests for the verification layer.
#[cfg(test)]
mod tests {
    use crate::{ground_truth::compute_ground_truth, VectorMatrix};

    use super::verify;

    /// A small deterministic pair of base and query matrices.
    fn small_pair() -> (VectorMatrix<f32>, VectorMatrix<f32>) {
        let base = symagen::random_data::random_tabular_seedable(50, 8, -1.0_f32, 1.0, 42);
        let query = symagen::random_data::random_tabular_seedable(9, 8, -1.0_f32, 1.0, 43);
        (
            VectorMatrix::from_rows(base).unwrap_or_else(|e| unreachable!("{e}")),
            VectorMatrix::from_rows(query).unwrap_or_else(|e| unreachable!("{e}")),
        )
    }

    #[test]
    fn self_consistency() -> Result<(), String> {
        let (base, query) = small_pair();
        let gt = compute_ground_truth(&base, &query, 10).map_err(|e| e.to_string())?;

        let report = verify(&base, &query, &gt, query.cardinality(), Some(42)).map_err(|e| e.to_string())?;
        assert_eq!(report.k, 10);
        assert_eq!(report.rows.len(), query.cardinality());
        assert!(report.passed());
        assert!(report.rows.iter().all(|row| row.ordered_prefix));

        Ok(())
    }

    #[test]
    fn sampling_is_bounded_and_seeded() -> Result<(), String> {
        let (base, query) = small_pair();
        let gt = compute_ground_truth(&base, &query, 5).map_err(|e| e.to_string())?;

        let report = verify(&base, &query, &gt, 3, Some(7)).map_err(|e| e.to_string())?;
        assert_eq!(report.rows.len(), 3);

        let again = verify(&base, &query, &gt, 3, Some(7)).map_err(|e| e.to_string())?;
        let indices = |r: &super::VerificationReport| r.rows.iter().map(|c| c.query_index).collect::<Vec<_>>();
        assert_eq!(indices(&report), indices(&again));

        Ok(())
    }

    #[test]
    fn detects_corruption() -> Result<(), String> {
        let (base, query) = small_pair();
        let gt = compute_ground_truth(&base, &query, 5).map_err(|e| e.to_string())?;

        // Swap one stored entry for the index of the farthest base row, which
        // cannot be among the 5 nearest.
        let full_scan = crate::ground_truth::knn(&base, query.get(4), base.cardinality());
        let farthest = full_scan.last().map_or(0, |&(i, _)| i);
        let mut rows = (0..gt.cardinality()).map(|i| gt.get(i).to_vec()).collect::<Vec<_>>();
        rows[4][0] = i32::try_from(farthest).map_err(|e| e.to_string())?;
        let tampered = VectorMatrix::from_rows(rows).map_err(|e| e.to_string())?;

        let report = verify(&base, &query, &tampered, query.cardinality(), Some(42)).map_err(|e| e.to_string())?;
        assert!(!report.passed());
        assert!(report.failures().any(|row| row.query_index == 4));

        Ok(())
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let (base, query) = small_pair();
        let gt = VectorMatrix::from_rows(vec![vec![0, 1, 2]]).unwrap_or_else(|e| unreachable!("{e}"));
        assert!(verify(&base, &query, &gt, 10, None).is_err());
    }
}
