use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::Dataset;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a signal table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma separated, first line is the header
/// * `.tsv`          – tab separated, first line is the header
/// * `.parquet`      – one record per row, one column per sample
///
/// Every row is one subject; every column one sample.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow::anyhow!("unsupported file extension: .{other}")),
    };
    loaded.map_err(|cause| LoadError::new(path, cause))
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row followed by rows of samples. All rows must have as many
/// fields as the header.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .context("opening table")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("table has no columns");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(Dataset::from_cells(headers, rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file where each column holds one sample position.
///
/// Numeric and string columns are accepted; nulls become empty cells.
/// Works with files written by `df.to_parquet()` from a wide frame.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    for field in schema.fields() {
        if !is_cell_type(field.data_type()) {
            bail!(
                "column '{}' has unsupported type {:?}",
                field.name(),
                field.data_type()
            );
        }
    }
    let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    if headers.is_empty() {
        bail!("parquet file has no columns");
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        Ok(String::new())
                    } else {
                        array_value_to_string(col, row)
                            .with_context(|| format!("row {}", rows.len()))
                    }
                })
                .collect::<Result<Vec<String>>>()?;
            rows.push(cells);
        }
    }

    Ok(Dataset::from_cells(headers, rows))
}

fn is_cell_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
    )
}
