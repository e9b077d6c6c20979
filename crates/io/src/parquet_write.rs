//! Low-level Parquet column building.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray, UInt8Array, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;
use crate::record::{OosRecord, RESULT_COLUMNS};

/// Arrow type of every result column, aligned with [`RESULT_COLUMNS`].
pub(crate) const RESULT_TYPES: [DataType; 13] = [
    DataType::Utf8,
    DataType::UInt8,
    DataType::Utf8,
    DataType::Utf8,
    DataType::Float64,
    DataType::Float64,
    DataType::Boolean,
    DataType::Boolean,
    DataType::UInt32,
    DataType::UInt32,
    DataType::Float64,
    DataType::UInt32,
    DataType::Utf8,
];

/// Builds the Arrow schema for result tables.
pub(crate) fn build_schema() -> Schema {
    Schema::new(
        RESULT_COLUMNS
            .iter()
            .zip(RESULT_TYPES.iter())
            .map(|(name, dt)| Field::new(*name, dt.clone(), false))
            .collect::<Vec<_>>(),
    )
}

/// Converts result rows into one Arrow [`RecordBatch`].
pub(crate) fn records_to_record_batch(
    records: &[OosRecord],
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.iso3.as_str()),
        )),
        Arc::new(UInt8Array::from_iter_values(
            records.iter().map(|r| r.adm_level),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.pcode.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.month_day.to_string()),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.zero_pct),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.context_zero_pct),
        )),
        Arc::new(BooleanArray::from(
            records
                .iter()
                .map(|r| r.is_out_of_season_raw)
                .collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            records
                .iter()
                .map(|r| r.is_out_of_season)
                .collect::<Vec<_>>(),
        )),
        Arc::new(UInt32Array::from_iter_values(
            records.iter().map(|r| r.rolling_sum_days),
        )),
        Arc::new(UInt32Array::from_iter_values(
            records.iter().map(|r| r.context_window_days),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.percentage_threshold),
        )),
        Arc::new(UInt32Array::from_iter_values(
            records.iter().map(|r| r.min_oos_run_length),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.data.as_str()),
        )),
    ];

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es as one Parquet file to `sink`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if batch writing or file finalisation fails.
pub(crate) fn write_batches<W: Write + Send>(
    sink: W,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let mut writer = ArrowWriter::try_new(sink, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
