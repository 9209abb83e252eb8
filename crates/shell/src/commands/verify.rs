//! Verifying a stored ground-truth file against recomputation.

use truthset::{vecs, verify::VerificationReport};

use super::DatasetArgs;

/// Reads the base, query, and ground-truth files and recomputes a sample of
/// rows, failing when any stored row's contents are wrong.
pub fn check(paths: &DatasetArgs, sample: usize, seed: Option<u64>) -> Result<(), String> {
    let [base_path, query_path, ground_truth_path] = paths.resolve()?;

    ftlog::info!("Reading base vectors from {base_path:?}");
    let base = vecs::read::<f32, _>(&base_path).map_err(|e| e.to_string())?;

    ftlog::info!("Reading query vectors from {query_path:?}");
    let query = vecs::read::<f32, _>(&query_path).map_err(|e| e.to_string())?;

    ftlog::info!("Reading ground truth from {ground_truth_path:?}");
    let ground_truth = vecs::read::<i32, _>(&ground_truth_path).map_err(|e| e.to_string())?;
    ftlog::info!(
        "Ground truth: {} rows of {} neighbors",
        ground_truth.cardinality(),
        ground_truth.dimensionality()
    );

    let report =
        truthset::verify::verify(&base, &query, &ground_truth, sample, seed).map_err(|e| e.to_string())?;
    log_report(&report);

    if report.passed() {
        println!("VERIFICATION PASSED: checked {} rows", report.rows.len());
        Ok(())
    } else {
        println!("VERIFICATION FAILED: see the log file for details");
        Err(format!(
            "verification failed for {} of {} sampled rows",
            report.failures().count(),
            report.rows.len()
        ))
    }
}

/// Logs the per-row outcomes of a verification report.
pub fn log_report(report: &VerificationReport) {
    for row in &report.rows {
        if row.contents_match() {
            ftlog::info!("query {}: all {} stored neighbors are exact", row.query_index, report.k);
        } else {
            ftlog::error!(
                "query {}: {} stored neighbors are not in the exact set: {:?}",
                row.query_index,
                row.missing.len(),
                row.missing
            );
        }
        if !row.ordered_prefix {
            // Advisory only; ties can reorder the leading entries.
            ftlog::warn!("query {}: leading entries differ in order", row.query_index);
        }
    }
}
