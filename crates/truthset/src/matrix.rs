//! A dense matrix of fixed-dimensionality vectors.

use distances::Number;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A dense, row-major matrix of `cardinality` vectors, each with
/// `dimensionality` elements of a single numeric kind.
///
/// All rows live in one contiguous buffer, so the matrix owns its storage
/// outright and its lifetime is independent of whatever IO buffer it was
/// decoded from. The dimensionality is stored once for the whole matrix; the
/// redundant per-record dimension field of the on-disk format is stripped on
/// read and re-synthesized on write by the [`vecs`](crate::vecs) codec.
///
/// A matrix is immutable once built. The zero-row matrix is a valid "empty"
/// sentinel with dimensionality zero.
#[derive(Clone, Serialize, Deserialize)]
pub struct VectorMatrix<T> {
    /// The elements of all rows, concatenated in row order.
    values: Vec<T>,
    /// The number of rows.
    cardinality: usize,
    /// The number of columns in every row. Zero iff the matrix is empty.
    dimensionality: usize,
    /// The name of the dataset this matrix belongs to.
    name: String,
}

impl<T: Number> VectorMatrix<T> {
    /// The empty sentinel: zero rows and zero columns.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            cardinality: 0,
            dimensionality: 0,
            name: "unnamed".to_string(),
        }
    }

    /// Creates a matrix from a flat, row-major buffer of elements.
    ///
    /// An empty buffer yields the empty sentinel regardless of the requested
    /// dimensionality.
    ///
    /// # Errors
    ///
    /// * If `dimensionality` is zero while `values` is non-empty.
    /// * If the buffer length is not a multiple of `dimensionality`.
    pub fn from_flat(values: Vec<T>, dimensionality: usize) -> Result<Self> {
        if values.is_empty() {
            return Ok(Self::empty());
        }
        if dimensionality == 0 {
            return Err(Error::InvalidArgument(
                "dimensionality must be positive for a non-empty matrix".to_string(),
            ));
        }
        if values.len() % dimensionality != 0 {
            return Err(Error::InvalidArgument(format!(
                "{} elements cannot form rows of {dimensionality} columns",
                values.len()
            )));
        }
        let cardinality = values.len() / dimensionality;
        Ok(Self {
            values,
            cardinality,
            dimensionality,
            name: "unnamed".to_string(),
        })
    }

    /// Creates a matrix from individual row vectors.
    ///
    /// An empty collection yields the empty sentinel.
    ///
    /// # Errors
    ///
    /// * If the first row is empty.
    /// * If any row has a different length than the first.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let dimensionality = first.len();
        if dimensionality == 0 {
            return Err(Error::InvalidArgument(
                "rows must have at least one column".to_string(),
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dimensionality {
                return Err(Error::InvalidArgument(format!(
                    "non-uniform rows: row {i} has {} columns but row 0 has {dimensionality}",
                    row.len()
                )));
            }
        }
        let cardinality = rows.len();
        let values = rows.into_iter().flatten().collect();
        Ok(Self {
            values,
            cardinality,
            dimensionality,
            name: "unnamed".to_string(),
        })
    }

    /// The number of rows.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// The number of columns in every row. Zero iff the matrix is empty.
    #[must_use]
    pub const fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Whether this is the zero-row sentinel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cardinality == 0
    }

    /// The name of the dataset this matrix belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Changes the name of the matrix.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Returns the row at the given index.
    ///
    /// # Panics
    ///
    /// If `index >= self.cardinality()`.
    #[must_use]
    pub fn get(&self, index: usize) -> &[T] {
        assert!(
            index < self.cardinality,
            "row index {index} out of bounds for {} rows",
            self.cardinality
        );
        &self.values[(index * self.dimensionality)..((index + 1) * self.dimensionality)]
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // A chunk size must be positive even for the empty sentinel.
        self.values.chunks_exact(self.dimensionality.max(1))
    }

    /// Iterates over the rows in parallel, preserving row order.
    pub fn par_rows(&self) -> impl IndexedParallelIterator<Item = &[T]> {
        self.values.par_chunks_exact(self.dimensionality.max(1))
    }

    /// Copies the given rows, in the given order, into a new matrix.
    ///
    /// Selecting zero rows yields the empty sentinel.
    ///
    /// # Panics
    ///
    /// If any index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        if indices.is_empty() {
            return Self::empty().with_name(&self.name);
        }
        let values = indices
            .iter()
            .flat_map(|&i| self.get(i).iter().copied())
            .collect();
        Self {
            values,
            cardinality: indices.len(),
            dimensionality: self.dimensionality,
            name: self.name.clone(),
        }
    }
}
