//! Tests of the vector-file codec.

use truthset::{vecs, Error, VectorMatrix};

/// Builds a raw vector file from `(prefix, payload)` records.
fn raw_file(records: &[(i32, &[f32])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for &(prefix, payload) in records {
        bytes.extend_from_slice(&prefix.to_le_bytes());
        for &value in payload {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes
}

#[test]
fn round_trip_values() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("values.fvecs");

    let matrix = VectorMatrix::from_rows(vec![
        vec![0.0_f32, 1.5, -2.25],
        vec![3.0, -4.5, 5.125],
        vec![f32::MIN, 0.0, f32::MAX],
    ])
    .map_err(|e| e.to_string())?;

    vecs::write(&path, &matrix, vecs::DEFAULT_VALUE_BATCH).map_err(|e| e.to_string())?;
    let read_back = vecs::read::<f32, _>(&path).map_err(|e| e.to_string())?;

    assert_eq!(read_back.cardinality(), matrix.cardinality());
    assert_eq!(read_back.dimensionality(), matrix.dimensionality());
    assert_eq!(read_back.name(), "values");
    for i in 0..matrix.cardinality() {
        assert_eq!(read_back.get(i), matrix.get(i));
    }

    Ok(())
}

#[test]
fn round_trip_indices() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("indices.ivecs");

    let matrix =
        VectorMatrix::from_rows(vec![vec![0_i32, 7, 99], vec![i32::MIN, -1, i32::MAX]]).map_err(|e| e.to_string())?;

    vecs::write(&path, &matrix, vecs::DEFAULT_INDEX_BATCH).map_err(|e| e.to_string())?;
    let read_back = vecs::read::<i32, _>(&path).map_err(|e| e.to_string())?;

    assert_eq!(read_back.cardinality(), 2);
    assert_eq!(read_back.dimensionality(), 3);
    for i in 0..matrix.cardinality() {
        assert_eq!(read_back.get(i), matrix.get(i));
    }

    Ok(())
}

#[test]
fn round_trip_empty() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("empty.fvecs");

    vecs::write(&path, &VectorMatrix::<f32>::empty(), vecs::DEFAULT_VALUE_BATCH).map_err(|e| e.to_string())?;
    let size = std::fs::metadata(&path).map_err(|e| e.to_string())?.len();
    assert_eq!(size, 0);

    let read_back = vecs::read::<f32, _>(&path).map_err(|e| e.to_string())?;
    assert!(read_back.is_empty());
    assert_eq!(read_back.dimensionality(), 0);

    Ok(())
}

#[test]
fn small_batches_do_not_change_the_layout() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let batched = tmp_dir.path().join("batched.fvecs");
    let unbatched = tmp_dir.path().join("unbatched.fvecs");

    let rows = symagen::random_data::random_tabular_seedable(37, 4, -1.0_f32, 1.0, 42);
    let matrix = VectorMatrix::from_rows(rows).map_err(|e| e.to_string())?;

    vecs::write(&batched, &matrix, 5).map_err(|e| e.to_string())?;
    vecs::write(&unbatched, &matrix, vecs::DEFAULT_VALUE_BATCH).map_err(|e| e.to_string())?;

    let batched = std::fs::read(&batched).map_err(|e| e.to_string())?;
    let unbatched = std::fs::read(&unbatched).map_err(|e| e.to_string())?;
    assert_eq!(batched, unbatched);

    Ok(())
}

#[test]
fn write_creates_parent_directories() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("nested").join("dirs").join("values.fvecs");

    let matrix = VectorMatrix::from_rows(vec![vec![1.0_f32, 2.0]]).map_err(|e| e.to_string())?;
    vecs::write(&path, &matrix, vecs::DEFAULT_VALUE_BATCH).map_err(|e| e.to_string())?;

    assert!(path.exists());
    Ok(())
}

#[test]
fn non_uniform_dimensionality_is_rejected() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("non-uniform.fvecs");

    // Both records are 12 bytes, so the size check passes, but the second
    // record declares a different dimensionality.
    let bytes = raw_file(&[(2, &[1.0, 2.0]), (3, &[4.0, 5.0])]);
    std::fs::write(&path, bytes).map_err(|e| e.to_string())?;

    let result = vecs::read::<f32, _>(&path);
    assert!(matches!(result, Err(Error::Format { .. })));

    Ok(())
}

#[test]
fn non_positive_dimensionality_is_rejected() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;

    for prefix in [0_i32, -3] {
        let path = tmp_dir.path().join(format!("dim-{prefix}.fvecs"));
        std::fs::write(&path, prefix.to_le_bytes()).map_err(|e| e.to_string())?;
        assert!(matches!(vecs::read::<f32, _>(&path), Err(Error::Format { .. })));
    }

    Ok(())
}

#[test]
fn truncated_files_are_rejected() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("truncated.fvecs");

    let mut bytes = raw_file(&[(2, &[1.0, 2.0])]);
    bytes.extend_from_slice(&[0_u8; 6]);
    std::fs::write(&path, bytes).map_err(|e| e.to_string())?;

    assert!(matches!(vecs::read::<f32, _>(&path), Err(Error::Format { .. })));

    let path = tmp_dir.path().join("tiny.fvecs");
    std::fs::write(&path, [1_u8, 2]).map_err(|e| e.to_string())?;
    assert!(matches!(vecs::read::<f32, _>(&path), Err(Error::Format { .. })));

    Ok(())
}

#[test]
fn missing_files_are_io_errors() {
    let result = vecs::read::<f32, _>("no/such/file.fvecs");
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn inspection() -> Result<(), String> {
    let tmp_dir = tempdir::TempDir::new("testing").map_err(|e| e.to_string())?;
    let path = tmp_dir.path().join("values.fvecs");

    let matrix = VectorMatrix::from_rows(vec![vec![1.0_f32, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).map_err(|e| e.to_string())?;
    vecs::write(&path, &matrix, vecs::DEFAULT_VALUE_BATCH).map_err(|e| e.to_string())?;

    let info = vecs::inspect(&path).map_err(|e| e.to_string())?;
    assert_eq!(info.dimensionality, 3);
    assert_eq!(info.cardinality, 2);
    assert_eq!(info.record_size, 16);
    assert_eq!(info.file_size, 32);
    assert!(!info.truncated);

    // A damaged file is still inspectable, unlike `read`.
    let mut bytes = std::fs::read(&path).map_err(|e| e.to_string())?;
    bytes.truncate(30);
    let damaged = tmp_dir.path().join("damaged.fvecs");
    std::fs::write(&damaged, bytes).map_err(|e| e.to_string())?;

    let info = vecs::inspect(&damaged).map_err(|e| e.to_string())?;
    assert_eq!(info.cardinality, 1);
    assert!(info.truncated);

    let empty = tmp_dir.path().join("empty.fvecs");
    std::fs::write(&empty, []).map_err(|e| e.to_string())?;
    let info = vecs::inspect(&empty).map_err(|e| e.to_string())?;
    assert_eq!(info.cardinality, 0);
    assert_eq!(info.dimensionality, 0);
    assert!(!info.truncated);

    Ok(())
}
