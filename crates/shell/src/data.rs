//! Where a dataset's files live on disk.

use std::path::{Path, PathBuf};

/// The file layout of one named dataset under a source directory.
///
/// The reduced dataset lives at `{source}/{name}/{name}_base.fvecs`,
/// `..._query.fvecs`, and `..._groundtruth.ivecs`; the raw downloads live
/// under `{source}/{name}_raw/`. An explicit value object instead of
/// process-wide defaults, so two datasets can be handled in one process.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    /// The directory holding the dataset directories.
    source: PathBuf,
    /// The dataset name, e.g. `gist` or `sift`.
    name: String,
}

impl DatasetLayout {
    /// Creates the layout for `name` under `source`.
    pub fn new(source: &Path, name: &str) -> Self {
        Self {
            source: source.to_path_buf(),
            name: name.to_string(),
        }
    }

    /// Path of the base vectors file.
    pub fn base_path(&self) -> PathBuf {
        self.source.join(&self.name).join(format!("{}_base.fvecs", self.name))
    }

    /// Path of the query vectors file.
    pub fn query_path(&self) -> PathBuf {
        self.source.join(&self.name).join(format!("{}_query.fvecs", self.name))
    }

    /// Path of the ground-truth file.
    pub fn ground_truth_path(&self) -> PathBuf {
        self.source
            .join(&self.name)
            .join(format!("{}_groundtruth.ivecs", self.name))
    }

    /// Path of the raw (unreduced) base vectors file.
    pub fn raw_base_path(&self) -> PathBuf {
        self.source
            .join(format!("{}_raw", self.name))
            .join(format!("{}_base.fvecs", self.name))
    }

    /// Path of the raw (unreduced) query vectors file.
    pub fn raw_query_path(&self) -> PathBuf {
        self.source
            .join(format!("{}_raw", self.name))
            .join(format!("{}_query.fvecs", self.name))
    }
}
