use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, Department, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Schema-level problems in a source file. Parse failures from the format
/// crates are passed through as `anyhow` errors with row context.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing '{0}' column")]
    MissingColumn(&'static str),
    #[error("row {row}: '{column}' is {value}, expected a percentage in 0–100")]
    PercentageOutOfRange {
        row: usize,
        column: &'static str,
        value: f64,
    },
    #[error("row {0}: unexpected null value")]
    NullCell(usize),
    #[error("unsupported column type {0}")]
    UnsupportedColumnType(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an enrollment dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the original source format (`university_student_data.csv`)
/// * `.json`    – records-oriented array of row objects
/// * `.parquet` – scalar Int64 / Float64 / Utf8 columns
///
/// All formats share the same header schema: `Year`, `Term`,
/// `Retention Rate (%)`, `Student Satisfaction (%)`, `Enrolled`, plus the
/// four department columns (`Engineering Enrolled`, …).
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Row schema shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One row as it appears in the source file, department columns flattened.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Year")]
    year: i64,
    #[serde(rename = "Term")]
    term: String,
    #[serde(rename = "Retention Rate (%)")]
    retention_rate: f64,
    #[serde(rename = "Student Satisfaction (%)")]
    satisfaction_score: f64,
    #[serde(rename = "Enrolled")]
    enrolled_total: u64,
    #[serde(rename = "Engineering Enrolled")]
    engineering: u64,
    #[serde(rename = "Business Enrolled")]
    business: u64,
    #[serde(rename = "Arts Enrolled")]
    arts: u64,
    #[serde(rename = "Science Enrolled")]
    science: u64,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<Record> {
        check_percentage(row, "Retention Rate (%)", self.retention_rate)?;
        check_percentage(row, "Student Satisfaction (%)", self.satisfaction_score)?;

        let enrolled_by_department: BTreeMap<Department, u64> = [
            (Department::Engineering, self.engineering),
            (Department::Business, self.business),
            (Department::Arts, self.arts),
            (Department::Science, self.science),
        ]
        .into_iter()
        .collect();

        Ok(Record {
            year: self.year,
            term: self.term,
            retention_rate: self.retention_rate,
            satisfaction_score: self.satisfaction_score,
            enrolled_total: self.enrolled_total,
            enrolled_by_department,
        })
    }
}

fn check_percentage(row: usize, column: &'static str, value: f64) -> Result<(), LoadError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(LoadError::PercentageOutOfRange { row, column, value });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV from any reader so tests can feed in-memory bytes.
fn load_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record(row_no)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Year": 2020,
///     "Term": "Fall",
///     "Retention Rate (%)": 85.0,
///     "Student Satisfaction (%)": 78.0,
///     "Enrolled": 1200,
///     "Engineering Enrolled": 400,
///     "Business Enrolled": 350,
///     "Arts Enrolled": 250,
///     "Science Enrolled": 200
///   },
///   ...
/// ]
/// ```
fn load_json(text: &str) -> Result<Dataset> {
    let raw: Vec<RawRecord> = serde_json::from_str(text).context("parsing JSON records")?;

    let records: Vec<Record> = raw
        .into_iter()
        .enumerate()
        .map(|(row, r)| r.into_record(row))
        .collect::<Result<_>>()?;

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with scalar columns under the shared schema.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer columns may be Int32 or Int64,
/// percentage columns Float32 or Float64.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let col = |name: &'static str| -> Result<Arc<dyn Array>> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            Ok(Arc::clone(batch.column(idx)))
        };

        let year_col = col("Year")?;
        let term_col = col("Term")?;
        let retention_col = col("Retention Rate (%)")?;
        let satisfaction_col = col("Student Satisfaction (%)")?;
        let enrolled_col = col("Enrolled")?;
        let dept_cols: Vec<(Department, Arc<dyn Array>)> = Department::ALL
            .iter()
            .map(|&d| Ok((d, col(d.column_name())?)))
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            let row_no = row_base + row;

            let retention_rate = read_f64(&retention_col, row)?;
            let satisfaction_score = read_f64(&satisfaction_col, row)?;
            check_percentage(row_no, "Retention Rate (%)", retention_rate)?;
            check_percentage(row_no, "Student Satisfaction (%)", satisfaction_score)?;

            let enrolled_by_department: BTreeMap<Department, u64> = dept_cols
                .iter()
                .map(|(d, c)| Ok((*d, read_u64(c, row)?)))
                .collect::<Result<_>>()?;

            records.push(Record {
                year: read_i64(&year_col, row)?,
                term: read_string(&term_col, row)?,
                retention_rate,
                satisfaction_score,
                enrolled_total: read_u64(&enrolled_col, row)?,
                enrolled_by_department,
            });
        }
        row_base += batch.num_rows();
    }

    Ok(Dataset::from_records(records))
}

// -- Arrow scalar helpers --

fn unsupported(col: &Arc<dyn Array>) -> LoadError {
    LoadError::UnsupportedColumnType(format!("{:?}", col.data_type()))
}

fn read_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        return Err(LoadError::NullCell(row).into());
    }
    match col.data_type() {
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        _ => Err(unsupported(col).into()),
    }
}

fn read_u64(col: &Arc<dyn Array>, row: usize) -> Result<u64> {
    let v = read_i64(col, row)?;
    u64::try_from(v).with_context(|| format!("negative count {v} in row {row}"))
}

fn read_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        return Err(LoadError::NullCell(row).into());
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        // Integer-typed percentage columns are fine too.
        DataType::Int32 | DataType::Int64 => Ok(read_i64(col, row)? as f64),
        _ => Err(unsupported(col).into()),
    }
}

fn read_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Err(LoadError::NullCell(row).into());
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        _ => Err(unsupported(col).into()),
    }
}
