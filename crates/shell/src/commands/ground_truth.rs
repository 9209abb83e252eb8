//! Computing and writing the exact ground truth for a dataset.

use truthset::{ground_truth::compute_ground_truth, vecs};

use super::DatasetArgs;

/// Reads the base and query files, computes the exact top-`k` neighbors,
/// writes them out, and re-checks a sample of rows from the written file.
pub fn compute(paths: &DatasetArgs, k: usize, sample: usize, seed: Option<u64>) -> Result<(), String> {
    let [base_path, query_path, out_path] = paths.resolve()?;

    ftlog::info!("Reading base vectors from {base_path:?}");
    let base = vecs::read::<f32, _>(&base_path).map_err(|e| e.to_string())?;
    ftlog::info!(
        "Base: {} vectors of dimensionality {}",
        base.cardinality(),
        base.dimensionality()
    );

    ftlog::info!("Reading query vectors from {query_path:?}");
    let query = vecs::read::<f32, _>(&query_path).map_err(|e| e.to_string())?;
    ftlog::info!(
        "Query: {} vectors of dimensionality {}",
        query.cardinality(),
        query.dimensionality()
    );

    ftlog::info!("Computing the {k} nearest neighbors of every query vector");
    let ground_truth = compute_ground_truth(&base, &query, k).map_err(|e| e.to_string())?;

    ftlog::info!("Writing ground truth to {out_path:?}");
    vecs::write(&out_path, &ground_truth, vecs::DEFAULT_INDEX_BATCH).map_err(|e| e.to_string())?;

    if sample > 0 {
        // Read back the file we just wrote, so the check also covers the codec.
        let stored = vecs::read::<i32, _>(&out_path).map_err(|e| e.to_string())?;
        let report = truthset::verify::verify(&base, &query, &stored, sample, seed).map_err(|e| e.to_string())?;
        super::verify::log_report(&report);
        if !report.passed() {
            return Err(format!(
                "verification failed for {} of {} sampled rows",
                report.failures().count(),
                report.rows.len()
            ));
        }
    }

    ftlog::info!("Finished ground truth for {}", query.name());
    Ok(())
}
