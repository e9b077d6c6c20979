//! Reading persisted result tables.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IoError;
use crate::parquet_read;
use crate::record::OosRecord;

/// Reads one result table written by [`write_results`](crate::write_results).
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist,
/// [`IoError::Validation`] if its schema is not the result schema, and
/// [`IoError::Parquet`] on decoding failures.
pub fn read_results(path: &Path) -> Result<Vec<OosRecord>, IoError> {
    let batches = parquet_read::read_batches(path)?;
    parquet_read::batches_to_records(&batches)
}

/// Reads and concatenates every `*.parquet` file directly inside `dir`, in
/// file-name order.
///
/// # Errors
///
/// Returns [`IoError::NoResultFiles`] if the directory is missing or holds
/// no Parquet file, or any error of [`read_results`].
pub fn read_result_dir(dir: &Path) -> Result<Vec<OosRecord>, IoError> {
    let no_files = || IoError::NoResultFiles {
        dir: dir.to_path_buf(),
    };

    let entries = std::fs::read_dir(dir).map_err(|_| no_files())?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(no_files());
    }

    let mut out = Vec::new();
    for file in &files {
        let records = read_results(file)?;
        debug!(file = %file.display(), rows = records.len(), "read result table");
        out.extend(records);
    }
    Ok(out)
}
