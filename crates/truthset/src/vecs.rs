//! Reading and writing `.fvecs`/`.ivecs` vector files.
//!
//! A vector file is a flat concatenation of records with no outer header, no
//! footer, and no count field. Each record is a 4-byte little-endian `i32`
//! dimensionality followed by that many 4-byte elements (`f32` for value
//! files, `i32` for index files). Although every record carries its own
//! dimensionality, the format requires it to be uniform across the file; the
//! record count is implicit in the file size.

use std::io::Write;
use std::path::Path;

use distances::Number;

use crate::{Error, Result, VectorMatrix};

/// Default number of rows per write batch for value (`.fvecs`) files.
pub const DEFAULT_VALUE_BATCH: usize = 100_000;

/// Default number of rows per write batch for index (`.ivecs`) files.
pub const DEFAULT_INDEX_BATCH: usize = 10_000;

/// The number of bytes in the per-record dimensionality prefix.
const DIM_PREFIX_BYTES: usize = 4;

/// Reads a whole vector file into an owned [`VectorMatrix`].
///
/// An empty file yields the empty sentinel. The per-record dimensionality
/// prefixes are validated and stripped; the returned matrix is a contiguous
/// copy whose lifetime is independent of the read buffer. The matrix is
/// named after the file stem.
///
/// # Errors
///
/// * `Io` if the file cannot be read.
/// * `Format` if the leading dimensionality is non-positive, if the file
///   size is not an exact multiple of the record size, or if any record
///   declares a different dimensionality than the first.
pub fn read<T: Number, P: AsRef<Path>>(path: P) -> Result<VectorMatrix<T>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::io(path, source))?;
    if bytes.is_empty() {
        return Ok(VectorMatrix::empty().with_name(&name_of(path)));
    }
    if bytes.len() < DIM_PREFIX_BYTES {
        return Err(Error::format(
            path,
            format!("{} bytes is too small to hold a record header", bytes.len()),
        ));
    }

    let dim_prefix = read_i32(&bytes[..DIM_PREFIX_BYTES]);
    if dim_prefix <= 0 {
        return Err(Error::format(
            path,
            format!("non-positive dimensionality {dim_prefix}"),
        ));
    }
    let dimensionality = dim_prefix as usize;

    let record_size = DIM_PREFIX_BYTES + dimensionality * T::NUM_BYTES;
    if bytes.len() % record_size != 0 {
        return Err(Error::format(
            path,
            format!(
                "file size {} is not a multiple of the {record_size}-byte record size",
                bytes.len()
            ),
        ));
    }

    let cardinality = bytes.len() / record_size;
    let mut values = Vec::with_capacity(cardinality * dimensionality);
    for record in bytes.chunks_exact(record_size) {
        let row_prefix = read_i32(&record[..DIM_PREFIX_BYTES]);
        if row_prefix != dim_prefix {
            return Err(Error::format(
                path,
                format!("non-uniform vector sizes: expected {dim_prefix}, found {row_prefix}"),
            ));
        }
        values.extend(record[DIM_PREFIX_BYTES..].chunks_exact(T::NUM_BYTES).map(T::from_le_bytes));
    }

    VectorMatrix::from_flat(values, dimensionality).map(|matrix| matrix.with_name(&name_of(path)))
}

/// Writes a [`VectorMatrix`] as a vector file, creating missing parent
/// directories.
///
/// Rows are encoded as dimensionality-prefixed records and flushed in
/// batches of `batch_size` rows; batching affects IO granularity only, not
/// the byte layout. A zero-row matrix produces a zero-length file.
///
/// No partial-write recovery is attempted: on failure the partially written
/// file is left as-is for the caller to clean up or overwrite.
///
/// # Errors
///
/// * `InvalidArgument` if the dimensionality does not fit the 4-byte record
///   header.
/// * `Io` on any storage failure.
pub fn write<T: Number, P: AsRef<Path>>(path: P, matrix: &VectorMatrix<T>, batch_size: usize) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::io(path, source))?;
        }
    }

    let file = std::fs::File::create(path).map_err(|source| Error::io(path, source))?;
    let mut file = std::io::BufWriter::new(file);

    let dim_prefix = i32::try_from(matrix.dimensionality()).map_err(|_| {
        Error::InvalidArgument(format!(
            "dimensionality {} does not fit in the 4-byte record header",
            matrix.dimensionality()
        ))
    })?;

    let batch_size = batch_size.max(1);
    let record_size = DIM_PREFIX_BYTES + matrix.dimensionality() * T::NUM_BYTES;
    let mut buffer = Vec::with_capacity(batch_size.min(matrix.cardinality()) * record_size);
    let mut buffered_rows = 0;
    for row in matrix.rows() {
        buffer.extend_from_slice(&dim_prefix.to_le_bytes());
        for &value in row {
            buffer.extend(value.to_le_bytes());
        }
        buffered_rows += 1;
        if buffered_rows == batch_size {
            file.write_all(&buffer).map_err(|source| Error::io(path, source))?;
            buffer.clear();
            buffered_rows = 0;
        }
    }
    if !buffer.is_empty() {
        file.write_all(&buffer).map_err(|source| Error::io(path, source))?;
    }
    file.flush().map_err(|source| Error::io(path, source))
}

/// Layout information about a vector file, gathered from its size and first
/// record header only.
pub struct VecsInfo {
    /// The dimensionality declared by the first record.
    pub dimensionality: usize,
    /// The number of whole records the file holds.
    pub cardinality: usize,
    /// The size of one record in bytes, header included.
    pub record_size: usize,
    /// The total file size in bytes.
    pub file_size: u64,
    /// Whether the file size is not an exact multiple of the record size.
    ///
    /// [`read`] fails hard on such files; here it is only reported, so
    /// damaged files can still be examined.
    pub truncated: bool,
}

/// Inspects a vector file without reading its records.
///
/// Assumes the format's fixed 4-byte element width, so the result is
/// independent of element kind.
///
/// # Errors
///
/// * `Io` if the file cannot be opened or its metadata read.
/// * `Format` if the file is too small to hold a record header or declares a
///   non-positive dimensionality.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<VecsInfo> {
    use std::io::Read;

    let path = path.as_ref();
    let mut file = std::fs::File::open(path).map_err(|source| Error::io(path, source))?;
    let file_size = file
        .metadata()
        .map_err(|source| Error::io(path, source))?
        .len();
    if file_size == 0 {
        return Ok(VecsInfo {
            dimensionality: 0,
            cardinality: 0,
            record_size: 0,
            file_size,
            truncated: false,
        });
    }

    let mut prefix = [0_u8; DIM_PREFIX_BYTES];
    file.read_exact(&mut prefix)
        .map_err(|_| Error::format(path, format!("{file_size} bytes is too small to hold a record header")))?;
    let dim_prefix = i32::from_le_bytes(prefix);
    if dim_prefix <= 0 {
        return Err(Error::format(
            path,
            format!("non-positive dimensionality {dim_prefix}"),
        ));
    }

    let dimensionality = dim_prefix as usize;
    let record_size = DIM_PREFIX_BYTES * (dimensionality + 1);
    let cardinality = usize::try_from(file_size).map_or(0, |size| size / record_size);
    let truncated = file_size % (record_size as u64) != 0;
    Ok(VecsInfo {
        dimensionality,
        cardinality,
        record_size,
        file_size,
        truncated,
    })
}

/// Decodes a little-endian `i32` from the first four bytes of a slice.
fn read_i32(bytes: &[u8]) -> i32 {
    <i32 as Number>::from_le_bytes(bytes)
}

/// The file stem of a path, used to name matrices after their files.
fn name_of(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "unnamed".to_string(), |stem| stem.to_string_lossy().to_string())
}
