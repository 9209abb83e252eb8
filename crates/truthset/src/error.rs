//! Errors for the codec and the ground-truth engine.

use std::path::PathBuf;

/// A `Result` whose error type is [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced while reading, writing, or computing over vector datasets.
///
/// Every variant is fatal to the operation that produced it and carries
/// enough context to diagnose the failure without re-running. The only
/// advisory signal in this crate is the ordering warning inside a
/// [`VerificationReport`](crate::verify::VerificationReport), which is report
/// data, not an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The on-disk layout of a vector file is malformed.
    ///
    /// Raised for a non-positive dimensionality prefix, a file size that is
    /// not an exact multiple of the record size, or records with differing
    /// dimensionalities. Never silently repaired.
    #[error("malformed vector file {path:?}: {reason}")]
    Format {
        /// The file with the malformed layout.
        path: PathBuf,
        /// What was wrong with the layout.
        reason: String,
    },

    /// The base and query matrices have different numbers of columns.
    #[error("dimension mismatch: base vectors have {base} columns but query vectors have {query}")]
    DimensionMismatch {
        /// Columns in the base matrix.
        base: usize,
        /// Columns in the query matrix.
        query: usize,
    },

    /// A caller-supplied argument made the operation impossible.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying storage failed. No retry is attempted here.
    #[error("io failure on {path:?}: {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The error reported by the operating system.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for an [`Error::Io`] with path context.
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an [`Error::Format`] with path context.
    pub(crate) fn format<P: Into<PathBuf>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
