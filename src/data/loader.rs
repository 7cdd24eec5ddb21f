use std::path::Path;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::filter;
use super::model::{CellValue, ClimateDataset, ColumnNames, Table};
use crate::config::ColumnConfig;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load, clean and validate the input file in one go.
///
/// `header_row` is the 0-based physical row holding the column names; rows
/// above it are discarded.
pub fn load_dataset(
    path: &Path,
    header_row: usize,
    columns: &ColumnConfig,
) -> Result<ClimateDataset, LoadError> {
    let mut table = load_table(path, header_row)?;

    let dropped = filter::drop_unlabeled(&mut table, &columns.unlabeled_prefix);
    if !dropped.is_empty() {
        debug!("Dropped unlabeled columns {dropped:?}");
    }
    filter::rename_mass_balance(&mut table, &columns.mass_source, &columns.mass_balance);

    info!("Columns in table: {:?}", table.columns());

    let dataset = ClimateDataset::from_table(
        &table,
        ColumnNames {
            year: &columns.year,
            temperature: &columns.temperature,
            mass_balance: &columns.mass_balance,
        },
    )?;
    info!(
        "Loaded {} years ({} temperature sources) from {}",
        dataset.len(),
        dataset.temperatures.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse a file into a raw [`Table`]. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet
/// * `.csv` – comma separated, same header-row convention as spreadsheets
/// * `.parquet` – flat columns, the schema supplies the header
pub fn load_table(path: &Path, header_row: usize) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, header_row),
        "csv" => load_csv(path, header_row),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path, header_row: usize) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::unreadable(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::unreadable(path, "workbook has no worksheets"))?
        .map_err(|e| LoadError::unreadable(path, e))?;

    table_from_range(&range, header_row)
}

/// Build a table from a worksheet range using physical row numbers.
///
/// calamine trims leading blank rows and columns off a range, so cells are
/// addressed absolutely: a blank first row still counts as row 0.
fn table_from_range(range: &Range<Data>, header_row: usize) -> Result<Table, LoadError> {
    let Some((last_row, last_col)) = range.end() else {
        return Err(LoadError::MissingHeader { header_row });
    };
    let header_pos = u32::try_from(header_row)
        .ok()
        .filter(|&r| r <= last_row)
        .ok_or(LoadError::MissingHeader { header_row })?;

    let cell = |row: u32, col: u32| {
        range
            .get_value((row, col))
            .map(cell_from_data)
            .unwrap_or(CellValue::Empty)
    };

    let header = (0..=last_col).map(|c| cell(header_pos, c)).collect();
    let rows = (header_pos + 1..=last_row)
        .map(|r| (0..=last_col).map(|c| cell(r, c)).collect())
        .collect();

    Ok(Table::from_rows(header, rows, header_row + 2))
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Records are counted as the CSV reader yields them, so `header_row` = 1
/// means "the second record" (a title line above the header).
fn load_csv(path: &Path, header_row: usize) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::unreadable(path, e))?;

    let mut records: Vec<Vec<CellValue>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::unreadable(path, e))?;
        records.push(record.iter().map(CellValue::parse).collect());
    }

    if header_row >= records.len() {
        return Err(LoadError::MissingHeader { header_row });
    }
    let rows = records.split_off(header_row + 1);
    let header = records
        .pop()
        .ok_or(LoadError::MissingHeader { header_row })?;

    Ok(Table::from_rows(header, rows, header_row + 2))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per series.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::unreadable(path, e))?;
    let header: Vec<CellValue> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| CellValue::Text(f.name().clone()))
        .collect();
    let reader = builder.build().map_err(|e| LoadError::unreadable(path, e))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::unreadable(path, e))?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| cell_from_arrow(col, row))
                    .collect(),
            );
        }
    }

    Ok(Table::from_rows(header, rows, 1))
}

/// Extract a single cell from an Arrow column at a given row.
fn cell_from_arrow(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        CellValue::Float(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        CellValue::Float(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        CellValue::Integer(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        CellValue::Integer(arr.value(row) as i64)
    } else if let Some(arr) = any.downcast_ref::<StringArray>() {
        CellValue::Text(arr.value(row).to_string())
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        CellValue::Text(arr.value(row).to_string())
    } else if let Some(arr) = any.downcast_ref::<BooleanArray>() {
        CellValue::Bool(arr.value(row))
    } else {
        CellValue::Text(format!("{:?}", col.data_type()))
    }
}
