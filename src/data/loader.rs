use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};

use super::model::{DatasetRecord, Table};
use crate::error::{Error, Result};

/// Column holding fold labels in the flat (CSV / Parquet) layout.
pub const FOLDS_COLUMN: &str = "Folds";

/// Prefix marking coordinate columns in the flat layout.
pub const COORDINATES_PREFIX: &str = "Coordinates.";

/// File extensions a dataset container may have.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json", "csv", "parquet", "pq"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset container from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – named arrays, see [`read_json`]
/// * `.csv`     – flat table with a `Folds` column, see [`read_csv`]
/// * `.parquet` – same flat layout as CSV
pub fn load_file(path: &Path) -> Result<DatasetRecord> {
    let record = match extension(path).as_str() {
        "json" => read_json(open(path)?)?,
        "csv" => read_csv(open(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };
    log::info!(
        "Loaded {} samples x {} columns from {} (coordinates: {})",
        record.len(),
        record.dataset.n_cols(),
        path.display(),
        record.has_coordinates()
    );
    Ok(record)
}

/// Write a dataset container.  The format follows the file extension.
pub fn save_file(record: &DatasetRecord, path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "json" => write_json(record, create(path)?)?,
        "csv" => write_csv(record, create(path)?)?,
        "parquet" | "pq" => save_parquet(record, path)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    }
    log::info!("Wrote {} samples to {}", record.len(), path.display());
    Ok(())
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(path, e))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| Error::io(path, e))
}

// ---------------------------------------------------------------------------
// JSON container
// ---------------------------------------------------------------------------

/// On-disk JSON schema: the three named arrays of a dataset.
///
/// ```json
/// {
///   "dataset_columns": ["Altitude", "SOC_target"],
///   "dataset_data": [[52.1, 0.81], [53.0, null]],
///   "folds": [1, 2],
///   "coordinates_columns": ["x_coord", "y_coord"],
///   "coordinates_data": [[4.1e5, 5.8e6], [4.1e5, 5.8e6]]
/// }
/// ```
///
/// `null` cells stand for missing values (NaN).
#[derive(Debug, Serialize, Deserialize)]
struct JsonContainer {
    dataset_columns: Option<Vec<String>>,
    dataset_data: Option<Vec<Vec<Option<f64>>>>,
    folds: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coordinates_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coordinates_data: Option<Vec<Vec<Option<f64>>>>,
}

/// Parse a JSON container from any reader.
pub fn read_json<R: Read>(reader: R) -> Result<DatasetRecord> {
    let container: JsonContainer = serde_json::from_reader(reader)?;

    let (Some(columns), Some(data)) = (container.dataset_columns, container.dataset_data) else {
        return Err(Error::MissingComponent("Dataset"));
    };
    let folds = container.folds.ok_or(Error::MissingComponent("Folds"))?;
    let dataset = Table::new(columns, fill_nan(data))?;

    let coordinates = match (container.coordinates_columns, container.coordinates_data) {
        (Some(cols), Some(data)) => Some(Table::new(cols, fill_nan(data))?),
        (None, None) => None,
        _ => {
            return Err(Error::Malformed(
                "coordinates need both 'coordinates_columns' and 'coordinates_data'".into(),
            ))
        }
    };

    DatasetRecord::new(dataset, folds, coordinates)
}

/// Serialize a record as a JSON container.
pub fn write_json<W: Write>(record: &DatasetRecord, writer: W) -> Result<()> {
    record.validate()?;
    let container = JsonContainer {
        dataset_columns: Some(record.dataset.columns().to_vec()),
        dataset_data: Some(to_optional(record.dataset.rows(), "dataset")?),
        folds: Some(record.folds.clone()),
        coordinates_columns: record.coordinates.as_ref().map(|c| c.columns().to_vec()),
        coordinates_data: record
            .coordinates
            .as_ref()
            .map(|c| to_optional(c.rows(), "coordinates"))
            .transpose()?,
    };
    serde_json::to_writer(writer, &container)?;
    Ok(())
}

fn fill_nan(rows: Vec<Vec<Option<f64>>>) -> Vec<Vec<f64>> {
    rows.into_iter()
        .map(|r| r.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect()
}

/// NaN becomes `null`. Infinite cells are rejected: JSON has no literal
/// for them and they would read back as NaN.
fn to_optional(rows: &[Vec<f64>], part: &str) -> Result<Vec<Vec<Option<f64>>>> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            r.iter()
                .map(|&v| {
                    if v.is_infinite() {
                        Err(Error::Malformed(format!(
                            "{part} row {i}: infinite value {v} cannot be stored as JSON"
                        )))
                    } else {
                        Ok((!v.is_nan()).then_some(v))
                    }
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Flat layout (shared by CSV and Parquet)
// ---------------------------------------------------------------------------

/// Split flat columns into dataset / coordinates and attach the folds.
fn assemble_flat(columns: Vec<(String, Vec<f64>)>, folds: Option<Vec<i64>>) -> Result<DatasetRecord> {
    let folds = folds.ok_or(Error::MissingComponent("Folds"))?;

    let (coords, data): (Vec<_>, Vec<_>) = columns
        .into_iter()
        .partition(|(name, _)| name.starts_with(COORDINATES_PREFIX));

    let n_rows = folds.len();
    let dataset = if data.is_empty() {
        Table::new(Vec::new(), vec![Vec::new(); n_rows])?
    } else {
        Table::from_columns(data)?
    };

    let coordinates = if coords.is_empty() {
        None
    } else {
        let stripped = coords
            .into_iter()
            .map(|(name, values)| (name[COORDINATES_PREFIX.len()..].to_string(), values))
            .collect();
        Some(Table::from_columns(stripped)?)
    };

    DatasetRecord::new(dataset, folds, coordinates)
}

/// Inverse of [`assemble_flat`]: column names and row-major cells.
/// Expects a validated record.
fn flatten(record: &DatasetRecord) -> (Vec<String>, Vec<Vec<f64>>) {
    let mut header: Vec<String> = record.dataset.columns().to_vec();
    header.push(FOLDS_COLUMN.to_string());
    if let Some(coords) = &record.coordinates {
        header.extend(
            coords
                .columns()
                .iter()
                .map(|c| format!("{COORDINATES_PREFIX}{c}")),
        );
    }

    let rows = (0..record.len())
        .map(|i| {
            let mut row = record.dataset.rows()[i].clone();
            row.push(record.folds[i] as f64);
            if let Some(coords) = &record.coordinates {
                row.extend_from_slice(&coords.rows()[i]);
            }
            row
        })
        .collect();
    (header, rows)
}

// ---------------------------------------------------------------------------
// CSV container
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sample per row.
/// The `Folds` column holds integer fold labels, `Coordinates.<name>`
/// columns form the coordinate table, everything else is the dataset.
/// Empty cells are missing values (NaN).
pub fn read_csv<R: Read>(reader: R) -> Result<DatasetRecord> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let folds_idx = headers.iter().position(|h| h == FOLDS_COLUMN);

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    let mut folds = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        for (col_idx, cell) in record.iter().enumerate() {
            if Some(col_idx) == folds_idx {
                folds.push(parse_fold(cell, row_no)?);
            } else {
                let v = parse_cell(cell).ok_or_else(|| {
                    Error::Malformed(format!(
                        "CSV row {row_no}, column '{}': '{cell}' is not a number",
                        headers[col_idx]
                    ))
                })?;
                values[col_idx].push(v);
            }
        }
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .enumerate()
        .filter(|(i, _)| Some(*i) != folds_idx)
        .map(|(_, pair)| pair)
        .collect();

    assemble_flat(columns, folds_idx.map(|_| folds))
}

/// Serialize a record in the flat CSV layout.
pub fn write_csv<W: Write>(record: &DatasetRecord, writer: W) -> Result<()> {
    record.validate()?;
    let (header, rows) = flatten(record);
    let folds_idx = record.dataset.n_cols();

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&header)?;
    for row in rows {
        let cells = row.iter().enumerate().map(|(i, v)| {
            if i == folds_idx {
                format!("{}", *v as i64)
            } else if v.is_nan() {
                String::new()
            } else {
                v.to_string()
            }
        });
        writer.write_record(cells)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn parse_cell(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

fn parse_fold(s: &str, row: usize) -> Result<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    // Folds exported from R are often stored as doubles ("3.0").
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 => Ok(f as i64),
        _ => Err(Error::Malformed(format!(
            "row {row}: fold label '{s}' is not an integer"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Parquet container
// ---------------------------------------------------------------------------

/// Load a Parquet file in the flat layout.
///
/// Data and coordinate columns may be Float64, Float32, Int64 or Int32;
/// nulls become NaN.  `Folds` must be an integer column.
fn load_parquet(path: &Path) -> Result<DatasetRecord> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let folds_idx = names.iter().position(|n| n == FOLDS_COLUMN);

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    let mut folds = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        for (col_idx, name) in names.iter().enumerate() {
            let col = batch.column(col_idx);
            if Some(col_idx) == folds_idx {
                folds.extend(extract_i64(col, name)?);
            } else {
                values[col_idx].extend(extract_f64(col, name)?);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .enumerate()
        .filter(|(i, _)| Some(*i) != folds_idx)
        .map(|(_, pair)| pair)
        .collect();

    assemble_flat(columns, folds_idx.map(|_| folds))
}

/// Write a record as a single-batch Parquet file in the flat layout.
fn save_parquet(record: &DatasetRecord, path: &Path) -> Result<()> {
    record.validate()?;
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for name in record.dataset.columns() {
        let values = record.dataset.column(name).unwrap_or_default();
        fields.push(Field::new(name, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values)));
    }

    fields.push(Field::new(FOLDS_COLUMN, DataType::Int64, false));
    arrays.push(Arc::new(Int64Array::from(record.folds.clone())));

    if let Some(coords) = &record.coordinates {
        for name in coords.columns() {
            let values = coords.column(name).unwrap_or_default();
            fields.push(Field::new(
                format!("{COORDINATES_PREFIX}{name}"),
                DataType::Float64,
                false,
            ));
            arrays.push(Arc::new(Float64Array::from(values)));
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

// -- Arrow helpers --

fn extract_f64(col: &ArrayRef, name: &str) -> Result<Vec<f64>> {
    macro_rules! collect_as_f64 {
        ($ty:ty) => {{
            let arr = col
                .as_any()
                .downcast_ref::<$ty>()
                .ok_or_else(|| Error::Malformed(format!("column '{name}': unexpected array type")))?;
            Ok(arr
                .iter()
                .map(|v| v.map(|x| x as f64).unwrap_or(f64::NAN))
                .collect())
        }};
    }

    match col.data_type() {
        DataType::Float64 => collect_as_f64!(Float64Array),
        DataType::Float32 => collect_as_f64!(Float32Array),
        DataType::Int64 => collect_as_f64!(Int64Array),
        DataType::Int32 => collect_as_f64!(Int32Array),
        other => Err(Error::Malformed(format!(
            "column '{name}' has type {other:?}, expected a numeric column"
        ))),
    }
}

fn extract_i64(col: &ArrayRef, name: &str) -> Result<Vec<i64>> {
    if col.null_count() > 0 {
        return Err(Error::Malformed(format!("column '{name}' contains nulls")));
    }
    match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.values().to_vec())
            .ok_or_else(|| Error::Malformed(format!("column '{name}': expected Int64Array"))),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.values().iter().map(|&v| v as i64).collect())
            .ok_or_else(|| Error::Malformed(format!("column '{name}': expected Int32Array"))),
        other => Err(Error::Malformed(format!(
            "column '{name}' has type {other:?}, expected an integer column"
        ))),
    }
}
