//! High-level Parquet writer configuration and write-once result files.

use std::io::ErrorKind;
use std::path::Path;

use arrow::array::RecordBatch;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write;
use crate::record::OosRecord;
use crate::validate::validate_records;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing result tables to Parquet.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Returns the compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Writes a result table to `path`, refusing to replace an existing file.
///
/// The table is first written to a temporary file in the target directory
/// and then linked into place without clobbering, so a concurrent writer or
/// a file created in the meantime makes this call fail with
/// [`IoError::AlreadyExists`] instead of being overwritten. The temporary
/// file is removed in every case. Missing parent directories are created.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration or any row is
/// invalid, [`IoError::AlreadyExists`] if `path` exists, and
/// [`IoError::Parquet`] or [`IoError::Io`] if encoding or file I/O fails.
pub fn write_results(
    path: &Path,
    records: &[OosRecord],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    validate_records(records).finish()?;

    if path.exists() {
        return Err(IoError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| IoError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let schema = parquet_write::build_schema();
    let props = WriterProperties::builder()
        .set_compression(config.compression.to_parquet()?)
        .set_max_row_group_size(config.row_group_size)
        .build();

    let batches: Vec<RecordBatch> = records
        .chunks(config.row_group_size)
        .map(|chunk| parquet_write::records_to_record_batch(chunk, &schema))
        .collect::<Result<Vec<_>, _>>()?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".oos-")
        .suffix(".parquet.tmp")
        .tempfile_in(dir)
        .map_err(|e| IoError::Io {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

    parquet_write::write_batches(tmp.as_file_mut(), &batches, &schema, props)?;

    tmp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            IoError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io {
                path: path.to_path_buf(),
                reason: e.error.to_string(),
            }
        }
    })?;

    debug!(path = %path.display(), rows = records.len(), "wrote result table");
    Ok(())
}
