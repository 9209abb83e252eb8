//! The commands under the `shell` CLI.

pub mod ground_truth;
pub mod info;
pub mod reduce;
pub mod verify;

use std::path::PathBuf;

use clap::Subcommand;

use crate::data::DatasetLayout;

/// The subcommands of the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the exact k-nearest-neighbor ground truth for a dataset.
    GroundTruth {
        /// Which base, query, and ground-truth files to use.
        #[command(flatten)]
        paths: DatasetArgs,

        /// The number of neighbors to record per query.
        #[arg(short('k'), long, default_value_t = truthset::DEFAULT_K)]
        k: usize,

        /// Number of query rows to re-check after writing. Zero skips the check.
        #[arg(long, default_value_t = 10)]
        sample: usize,
    },
    /// Verify a stored ground-truth file by recomputing a sample of rows.
    Verify {
        /// Which base, query, and ground-truth files to use.
        #[command(flatten)]
        paths: DatasetArgs,

        /// Number of query rows to recompute and compare.
        #[arg(long, default_value_t = 10)]
        sample: usize,
    },
    /// Print layout information about a vector file.
    Info {
        /// Path to the `.fvecs` or `.ivecs` file.
        path: PathBuf,
    },
    /// Sample a raw dataset down and compute ground truth for the result.
    Reduce {
        /// Dataset name; raw files are expected under `{source}/{name}_raw/`.
        #[arg(short('d'), long)]
        dataset: String,

        /// Directory containing the dataset directories.
        #[arg(long, default_value = ".")]
        source: PathBuf,

        /// Keep one of every `base_factor` base vectors.
        #[arg(long, default_value_t = 100)]
        base_factor: usize,

        /// Keep one of every `query_factor` query vectors.
        #[arg(long, default_value_t = 10)]
        query_factor: usize,

        /// The number of neighbors to record per query.
        #[arg(short('k'), long, default_value_t = truthset::DEFAULT_K)]
        k: usize,
    },
}

/// Base, query, and ground-truth file locations, either through the standard
/// dataset layout or as explicit paths.
#[derive(clap::Args, Debug)]
pub struct DatasetArgs {
    /// Dataset name; files follow the `{source}/{name}/{name}_base.fvecs` layout.
    #[arg(short('d'), long)]
    dataset: Option<String>,

    /// Directory containing the dataset directories.
    #[arg(long, default_value = ".")]
    source: PathBuf,

    /// Explicit path to the base vectors file.
    #[arg(long, conflicts_with = "dataset")]
    base_path: Option<PathBuf>,

    /// Explicit path to the query vectors file.
    #[arg(long, conflicts_with = "dataset")]
    query_path: Option<PathBuf>,

    /// Explicit path to the ground-truth file.
    #[arg(long, conflicts_with = "dataset")]
    ground_truth_path: Option<PathBuf>,
}

impl DatasetArgs {
    /// Resolves to `[base, query, ground_truth]` paths.
    ///
    /// # Errors
    ///
    /// * If neither a dataset name nor all three explicit paths were given.
    pub fn resolve(&self) -> Result<[PathBuf; 3], String> {
        if let Some(name) = &self.dataset {
            let layout = DatasetLayout::new(&self.source, name);
            return Ok([layout.base_path(), layout.query_path(), layout.ground_truth_path()]);
        }
        match (&self.base_path, &self.query_path, &self.ground_truth_path) {
            (Some(base), Some(query), Some(ground_truth)) => {
                Ok([base.clone(), query.clone(), ground_truth.clone()])
            }
            _ => Err(
                "provide either --dataset or all of --base-path, --query-path, and --ground-truth-path".to_string(),
            ),
        }
    }
}
