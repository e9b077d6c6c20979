//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt8Type, UInt32Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;
use crate::exposure::ExposureRow;
use crate::parquet_write::RESULT_TYPES;
use crate::record::{OosRecord, RESULT_COLUMNS};
use crate::validate::ValidationCollector;

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(batches)
}

// ---------------------------------------------------------------------------
// Result tables
// ---------------------------------------------------------------------------

/// Validates a batch against the 13-column result schema.
///
/// # Errors
///
/// Returns [`IoError::Validation`] listing every column whose name or type
/// differs from the expected schema.
pub(crate) fn validate_result_schema(batch: &RecordBatch) -> Result<(), IoError> {
    let num_cols = batch.num_columns();
    if num_cols != RESULT_COLUMNS.len() {
        return Err(IoError::Validation {
            count: 1,
            details: format!("expected {} columns, got {num_cols}", RESULT_COLUMNS.len()),
        });
    }

    let schema = batch.schema();
    let mut c = ValidationCollector::new();

    for (i, (expected_name, expected_type)) in RESULT_COLUMNS.iter().zip(&RESULT_TYPES).enumerate()
    {
        let field = schema.field(i);
        if field.name() != *expected_name {
            c.push(format!(
                "column {i}: expected '{expected_name}', got '{}'",
                field.name()
            ));
        } else if field.data_type() != expected_type {
            c.push(format!(
                "column '{expected_name}': expected {expected_type}, got {}",
                field.data_type()
            ));
        }
        if batch.column(i).null_count() > 0 {
            c.push(format!("column '{expected_name}' contains nulls"));
        }
    }

    c.finish()
}

/// Converts validated result batches back into rows, in file order.
///
/// # Errors
///
/// Returns [`IoError::Calendar`] if a `month_day` label is malformed.
pub(crate) fn batches_to_records(batches: &[RecordBatch]) -> Result<Vec<OosRecord>, IoError> {
    let mut out = Vec::with_capacity(batches.iter().map(|b| b.num_rows()).sum());

    for batch in batches {
        validate_result_schema(batch)?;

        let iso3 = batch.column(0).as_string::<i32>();
        let adm_level = batch.column(1).as_primitive::<UInt8Type>();
        let pcode = batch.column(2).as_string::<i32>();
        let month_day = batch.column(3).as_string::<i32>();
        let zero_pct = batch.column(4).as_primitive::<Float64Type>();
        let context_zero_pct = batch.column(5).as_primitive::<Float64Type>();
        let is_raw = batch.column(6).as_boolean();
        let is_oos = batch.column(7).as_boolean();
        let rolling_sum_days = batch.column(8).as_primitive::<UInt32Type>();
        let context_window_days = batch.column(9).as_primitive::<UInt32Type>();
        let threshold = batch.column(10).as_primitive::<Float64Type>();
        let min_run = batch.column(11).as_primitive::<UInt32Type>();
        let data = batch.column(12).as_string::<i32>();

        for row in 0..batch.num_rows() {
            out.push(OosRecord {
                iso3: iso3.value(row).to_string(),
                adm_level: adm_level.value(row),
                pcode: pcode.value(row).to_string(),
                month_day: month_day.value(row).parse()?,
                zero_pct: zero_pct.value(row),
                context_zero_pct: context_zero_pct.value(row),
                is_out_of_season_raw: is_raw.value(row),
                is_out_of_season: is_oos.value(row),
                rolling_sum_days: rolling_sum_days.value(row),
                context_window_days: context_window_days.value(row),
                percentage_threshold: threshold.value(row),
                min_oos_run_length: min_run.value(row),
                data: data.value(row).to_string(),
            });
        }
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Exposure tables
// ---------------------------------------------------------------------------

fn column<'a>(batch: &'a RecordBatch, name: &str, path: &Path) -> Result<&'a ArrayRef, IoError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn is_date_type(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Date32
            | DataType::Date64
            | DataType::Timestamp(_, _)
    )
}

/// Extracts `pcode`, `adm_level`, `valid_date` and `sum` from exposure
/// batches. Other columns are ignored.
///
/// Dates are rendered as text and parsed later per region, so a malformed
/// date fails only the region it belongs to.
///
/// # Errors
///
/// Returns [`IoError::MissingColumn`] for an absent column and
/// [`IoError::Validation`] for unsupported types, nulls, or adm levels that
/// do not fit in `u8`.
pub(crate) fn batches_to_exposure(
    batches: &[RecordBatch],
    path: &Path,
) -> Result<Vec<ExposureRow>, IoError> {
    let mut out = Vec::new();
    let mut c = ValidationCollector::new();
    let mut offset = 0;

    for batch in batches {
        let pcode_col = column(batch, "pcode", path)?;
        let adm_col = column(batch, "adm_level", path)?;
        let date_col = column(batch, "valid_date", path)?;
        let sum_col = column(batch, "sum", path)?;

        if !is_date_type(date_col.data_type()) {
            return Err(IoError::Validation {
                count: 1,
                details: format!("unsupported valid_date type {}", date_col.data_type()),
            });
        }
        for (name, col) in [
            ("pcode", pcode_col),
            ("adm_level", adm_col),
            ("valid_date", date_col),
            ("sum", sum_col),
        ] {
            if col.null_count() > 0 {
                c.push(format!("column '{name}' contains {} nulls", col.null_count()));
            }
        }

        let pcode = cast(pcode_col, &DataType::Utf8)?;
        let adm = cast(adm_col, &DataType::Int64)?;
        let date = cast(date_col, &DataType::Utf8)?;
        let sum = cast(sum_col, &DataType::Float64)?;

        let pcode = pcode.as_string::<i32>();
        let adm = adm.as_primitive::<Int64Type>();
        let date = date.as_string::<i32>();
        let sum = sum.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            if pcode.is_null(row) || adm.is_null(row) || date.is_null(row) || sum.is_null(row) {
                continue;
            }
            let Ok(adm_level) = u8::try_from(adm.value(row)) else {
                c.push(format!(
                    "adm_level out of range at row {}: {}",
                    offset + row,
                    adm.value(row)
                ));
                continue;
            };
            out.push(ExposureRow {
                pcode: pcode.value(row).to_string(),
                adm_level,
                valid_date: date.value(row).to_string(),
                value: sum.value(row),
            });
        }
        offset += batch.num_rows();
    }

    c.finish()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};

    use super::*;
    use crate::parquet_write;

    fn record() -> OosRecord {
        OosRecord {
            iso3: "tcd".to_string(),
            adm_level: 0,
            pcode: "TD".to_string(),
            month_day: "02-29".parse().unwrap(),
            zero_pct: 25.0,
            context_zero_pct: 30.0,
            is_out_of_season_raw: false,
            is_out_of_season: false,
            rolling_sum_days: 5,
            context_window_days: 20,
            percentage_threshold: 97.0,
            min_oos_run_length: 30,
            data: "prod".to_string(),
        }
    }

    fn exposure_batch(dates: ArrayRef) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("pcode", DataType::Utf8, false),
            Field::new("adm_level", DataType::Int32, false),
            Field::new("valid_date", dates.data_type().clone(), false),
            Field::new("sum", DataType::Float64, false),
            Field::new("extra", DataType::Int32, false),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec!["NE001", "NE002"])),
                Arc::new(Int32Array::from(vec![1, 1])),
                dates,
                Arc::new(Float64Array::from(vec![0.0, 3.5])),
                Arc::new(Int32Array::from(vec![7, 8])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn result_batch_round_trip() {
        let schema = parquet_write::build_schema();
        let batch = parquet_write::records_to_record_batch(&[record()], &schema).unwrap();
        assert!(validate_result_schema(&batch).is_ok());
        let back = batches_to_records(&[batch]).unwrap();
        assert_eq!(back, vec![record()]);
    }

    #[test]
    fn validate_result_schema_wrong_column_count() {
        let batch = exposure_batch(Arc::new(StringArray::from(vec!["2020-01-01", "2020-01-02"])));
        match validate_result_schema(&batch).unwrap_err() {
            IoError::Validation { details, .. } => {
                assert!(details.contains("expected 13 columns, got 5"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn exposure_from_string_dates() {
        let batch = exposure_batch(Arc::new(StringArray::from(vec![
            "2020-01-01",
            "2020-01-02 00:00:00",
        ])));
        let rows = batches_to_exposure(&[batch], Path::new("ner.parquet")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ExposureRow::new("NE001", 1, "2020-01-01", 0.0));
        assert_eq!(rows[1].valid_date, "2020-01-02 00:00:00");
    }

    #[test]
    fn exposure_from_date32() {
        // 18262 days after the epoch is 2020-01-01.
        let batch = exposure_batch(Arc::new(Date32Array::from(vec![18262, 18263])));
        let rows = batches_to_exposure(&[batch], Path::new("ner.parquet")).unwrap();
        assert_eq!(rows[0].valid_date, "2020-01-01");
        assert_eq!(rows[1].valid_date, "2020-01-02");
    }

    #[test]
    fn exposure_missing_column() {
        let schema = Schema::new(vec![Field::new("pcode", DataType::Utf8, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(StringArray::from(vec!["NE001"]))],
        )
        .unwrap();
        match batches_to_exposure(&[batch], Path::new("ner.parquet")).unwrap_err() {
            IoError::MissingColumn { name, .. } => assert_eq!(name, "adm_level"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn exposure_unsupported_date_type() {
        let batch = exposure_batch(Arc::new(Float64Array::from(vec![1.0, 2.0])));
        assert!(matches!(
            batches_to_exposure(&[batch], Path::new("ner.parquet")).unwrap_err(),
            IoError::Validation { .. }
        ));
    }

    #[test]
    fn read_batches_file_not_found() {
        let result = read_batches(Path::new("/nonexistent/path/file.parquet"));
        match result.unwrap_err() {
            IoError::FileNotFound { path } => {
                assert_eq!(path.to_str().unwrap(), "/nonexistent/path/file.parquet");
            }
            other => panic!("expected FileNotFound error, got {other:?}"),
        }
    }
}
