//! Printing layout information about a vector file.

use std::io::Read;
use std::path::Path;

use distances::Number;
use truthset::vecs;

/// How many leading elements of the first record to print as a sample.
const SAMPLE_LEN: usize = 4;

/// Inspects a vector file and prints its layout and a sample of its values.
pub fn report(path: &Path) -> Result<(), String> {
    let info = vecs::inspect(path).map_err(|e| e.to_string())?;

    println!("File: {}", path.display());
    println!("Dimensionality: {}", info.dimensionality);
    println!("Number of vectors: {}", info.cardinality);
    #[allow(clippy::cast_precision_loss)]
    let megabytes = info.file_size as f64 / (1024.0 * 1024.0);
    println!("File size: {megabytes:.2} MB ({} bytes)", info.file_size);
    println!("Vector size: {} bytes", info.record_size);

    if info.truncated {
        println!(
            "Warning: file size ({} bytes) is not a multiple of the vector size ({} bytes)",
            info.file_size, info.record_size
        );
        println!("This might indicate a corrupted or incomplete file");
    }

    if info.cardinality > 0 {
        let dim = info.dimensionality;
        let sample = match path.extension().and_then(std::ffi::OsStr::to_str) {
            Some("fvecs") => format_sample(&read_sample::<f32>(path, dim)?, dim, |v| format!("{v:.4}")),
            Some("ivecs") => format_sample(&read_sample::<i32>(path, dim)?, dim, |v| format!("{v}")),
            _ => return Err(format!("file must be .fvecs or .ivecs: {}", path.display())),
        };
        println!("Sample values: {sample}");
    }

    Ok(())
}

/// Reads the first few elements of the first record.
fn read_sample<T: Number>(path: &Path, dimensionality: usize) -> Result<Vec<T>, String> {
    let take = dimensionality.min(SAMPLE_LEN);
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut buffer = vec![0_u8; 4 + take * T::NUM_BYTES];
    file.read_exact(&mut buffer).map_err(|e| e.to_string())?;
    Ok(buffer[4..].chunks_exact(T::NUM_BYTES).map(T::from_le_bytes).collect())
}

/// Joins sample values, marking that more follow when the record is longer.
fn format_sample<T>(values: &[T], dimensionality: usize, fmt: impl Fn(&T) -> String) -> String {
    let mut sample = values.iter().map(fmt).collect::<Vec<_>>().join(", ");
    if dimensionality > values.len() {
        sample.push_str(", ...");
    }
    sample
}
