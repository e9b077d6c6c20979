//! # oos-io
//!
//! Reads daily flood-exposure tables per country and reads and writes the
//! per-combination result tables of the out-of-season grid search as
//! Parquet. Also owns the on-disk layout of those result files.

mod adm;
mod error;
mod exposure;
mod layout;
mod parquet_read;
mod parquet_write;
mod reader;
mod record;
mod source;
mod validate;
mod writer;

pub use adm::AdmLevel;
pub use error::IoError;
pub use exposure::{ExposureRow, ExposureTable};
pub use layout::{ResultLayout, format_threshold};
pub use reader::{read_result_dir, read_results};
pub use record::{OosRecord, RESULT_COLUMNS};
pub use source::{ExposureSource, MemorySource, ParquetSource};
pub use writer::{Compression, WriterConfig, write_results};
