//! Sampling a raw dataset down to a workable size.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use truthset::{ground_truth::compute_ground_truth, vecs, VectorMatrix};

use crate::data::DatasetLayout;

/// Samples the raw base and query files down by the given factors, writes
/// the reduced files under the standard layout, and computes their ground
/// truth.
pub fn reduce(
    dataset: &str,
    source: &Path,
    base_factor: usize,
    query_factor: usize,
    k: usize,
    seed: Option<u64>,
) -> Result<(), String> {
    if base_factor == 0 || query_factor == 0 {
        return Err("reduction factors must be positive".to_string());
    }

    let layout = DatasetLayout::new(source, dataset);
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let base = sample_file(&layout.raw_base_path(), &layout.base_path(), base_factor, &mut rng)?;
    let query = sample_file(&layout.raw_query_path(), &layout.query_path(), query_factor, &mut rng)?;

    ftlog::info!(
        "Computing the {k} nearest neighbors for the reduced {} queries",
        query.cardinality()
    );
    let ground_truth = compute_ground_truth(&base, &query, k).map_err(|e| e.to_string())?;

    let out_path = layout.ground_truth_path();
    ftlog::info!("Writing ground truth to {out_path:?}");
    vecs::write(&out_path, &ground_truth, vecs::DEFAULT_INDEX_BATCH).map_err(|e| e.to_string())?;

    Ok(())
}

/// Reads a raw vector file, keeps one of every `factor` rows at random, and
/// writes the reduced matrix to `out_path`.
fn sample_file(
    raw_path: &PathBuf,
    out_path: &PathBuf,
    factor: usize,
    rng: &mut StdRng,
) -> Result<VectorMatrix<f32>, String> {
    ftlog::info!("Reading raw vectors from {raw_path:?}");
    let raw = vecs::read::<f32, _>(raw_path).map_err(|e| e.to_string())?;

    let keep = raw.cardinality() / factor;
    let mut indices = rand::seq::index::sample(rng, raw.cardinality(), keep).into_vec();
    indices.sort_unstable();
    let reduced = raw.select(&indices);

    ftlog::info!(
        "Writing {} of {} vectors to {out_path:?}",
        reduced.cardinality(),
        raw.cardinality()
    );
    vecs::write(out_path, &reduced, vecs::DEFAULT_VALUE_BATCH).map_err(|e| e.to_string())?;

    Ok(reduced)
}
