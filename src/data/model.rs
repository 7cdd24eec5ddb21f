use std::collections::BTreeMap;
use std::fmt;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the input table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what spreadsheet readers hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => write!(f, "<empty>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a text field (CSV cells arrive untyped).
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric reading of the cell. Blank cells read as NaN, numbers stored
    /// as text are accepted, anything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Empty => Some(f64::NAN),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell as a column name. Whole floats lose their fraction so
    /// a header typed as `2000` in a spreadsheet stays `2000`.
    fn header_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(format!("{v:.0}")),
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the raw loaded sheet
// ---------------------------------------------------------------------------

/// Name given to a column whose header cell is blank. Matches what pandas
/// produces, so the unlabeled-column filter treats both the same way.
pub fn placeholder_name(index: usize) -> String {
    format!("Unnamed: {index}")
}

/// A rectangular table: named columns over row-major cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    /// 1-based row number in the source file, per data row.
    row_numbers: Vec<usize>,
}

impl Table {
    /// Build a table from a header row and the data rows below it.
    ///
    /// * blank header cells become `Unnamed: <index>`
    /// * repeated names get a `.1`, `.2`, ... suffix
    /// * rows are padded or truncated to the header width
    /// * rows with no non-blank cell are skipped
    ///
    /// `first_row_number` is the 1-based source row of `rows[0]`.
    pub fn from_rows(
        header: Vec<CellValue>,
        rows: Vec<Vec<CellValue>>,
        first_row_number: usize,
    ) -> Self {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let base = cell.header_text().unwrap_or_else(|| placeholder_name(i));
                let count = seen.entry(base.clone()).or_insert(0);
                let name = if *count == 0 {
                    base
                } else {
                    format!("{base}.{count}")
                };
                *count += 1;
                name
            })
            .collect();

        let width = columns.len();
        let mut kept = Vec::with_capacity(rows.len());
        let mut row_numbers = Vec::with_capacity(rows.len());
        for (offset, mut row) in rows.into_iter().enumerate() {
            row.resize(width, CellValue::Empty);
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            kept.push(row);
            row_numbers.push(first_row_number + offset);
        }

        Table {
            columns,
            rows: kept,
            row_numbers,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Keep only the columns for which `keep` returns true.
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let mask: Vec<bool> = self.columns.iter().map(|c| keep(c)).collect();
        let mut it = mask.iter();
        self.columns.retain(|_| *it.next().unwrap_or(&true));
        for row in &mut self.rows {
            let mut it = mask.iter();
            row.retain(|_| *it.next().unwrap_or(&true));
        }
    }

    /// Rename a column in place. Returns false when `from` is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Read a column as numbers, blank cells becoming NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, LoadError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            })?;

        self.rows
            .iter()
            .zip(&self.row_numbers)
            .map(|(row, &row_no)| {
                row[idx].as_f64().ok_or_else(|| LoadError::InvalidCell {
                    column: name.to_string(),
                    row: row_no,
                    value: row[idx].to_string(),
                })
            })
            .collect()
    }

    /// Like [`Table::numeric_column`] but blank cells are rejected too.
    pub fn required_numeric_column(&self, name: &str) -> Result<Vec<f64>, LoadError> {
        let values = self.numeric_column(name)?;
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            let idx = self.column_index(name).unwrap_or_default();
            return Err(LoadError::InvalidCell {
                column: name.to_string(),
                row: self.row_numbers[pos],
                value: self.rows[pos][idx].to_string(),
            });
        }
        Ok(values)
    }
}

// ---------------------------------------------------------------------------
// ClimateDataset – the validated series the chart is drawn from
// ---------------------------------------------------------------------------

/// A named numeric sequence aligned by row with the dataset's years.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Column names the dataset is extracted with.
#[derive(Debug, Clone, Copy)]
pub struct ColumnNames<'a> {
    pub year: &'a str,
    pub temperature: &'a [String],
    pub mass_balance: &'a str,
}

/// Years, temperature anomaly series and mass balance, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateDataset {
    pub years: Vec<f64>,
    pub temperatures: Vec<Series>,
    pub mass_balance: Series,
}

impl ClimateDataset {
    /// Pull the expected columns out of a cleaned table.
    ///
    /// Columns are checked in the order year, temperature sources, mass
    /// balance; the first missing one is reported.
    pub fn from_table(table: &Table, names: ColumnNames<'_>) -> Result<Self, LoadError> {
        let years = table.required_numeric_column(names.year)?;
        let temperatures = names
            .temperature
            .iter()
            .map(|name| {
                Ok(Series {
                    name: name.clone(),
                    values: table.numeric_column(name)?,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        let mass_balance = Series {
            name: names.mass_balance.to_string(),
            values: table.numeric_column(names.mass_balance)?,
        };

        if years.is_empty() {
            return Err(LoadError::Empty);
        }

        Ok(ClimateDataset {
            years,
            temperatures,
            mass_balance,
        })
    }

    /// Number of rows (years).
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Year at `row`, truncated to an integer.
    pub fn year_label(&self, row: usize) -> Option<i64> {
        self.years.get(row).map(|y| y.trunc() as i64)
    }

    pub fn year_extent(&self) -> Option<(f64, f64)> {
        extent(self.years.iter().copied())
    }

    /// Min/max over every temperature source and every year.
    pub fn temperature_extent(&self) -> Option<(f64, f64)> {
        extent(
            self.temperatures
                .iter()
                .flat_map(|s| s.values.iter().copied()),
        )
    }

    pub fn mass_balance_extent(&self) -> Option<(f64, f64)> {
        extent(self.mass_balance.values.iter().copied())
    }

    /// Mean of the temperature sources at one row. Blank (NaN) cells are
    /// skipped; a row with no values at all gives NaN.
    pub fn annual_mean(&self, row: usize) -> Option<f64> {
        if row >= self.len() {
            return None;
        }
        let (sum, count) = self
            .temperatures
            .iter()
            .map(|s| s.values[row])
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        if count == 0 {
            Some(f64::NAN)
        } else {
            Some(sum / count as f64)
        }
    }
}

/// Min and max of the non-NaN values, `None` if there are none.
fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: Iterator<Item = f64>,
{
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn temperature_names() -> Vec<String> {
        ["A", "B", "C"].iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> Table {
        Table::from_rows(
            vec![text("year"), text("A"), text("B"), text("C"), text("MB")],
            vec![
                vec![
                    CellValue::Integer(2000),
                    CellValue::Float(0.5),
                    CellValue::Float(0.25),
                    CellValue::Float(0.75),
                    CellValue::Float(-1.0),
                ],
                vec![
                    CellValue::Integer(2001),
                    CellValue::Float(1.0),
                    CellValue::Empty,
                    CellValue::Float(2.0),
                    CellValue::Float(-2.0),
                ],
            ],
            3,
        )
    }

    #[test]
    fn blank_and_duplicate_headers_are_named() {
        let table = Table::from_rows(
            vec![text("x"), CellValue::Empty, text("x"), CellValue::Float(2000.0)],
            vec![],
            3,
        );
        assert_eq!(table.columns(), ["x", "Unnamed: 1", "x.1", "2000"]);
    }

    #[test]
    fn empty_rows_are_skipped_and_numbered() {
        let table = Table::from_rows(
            vec![text("v")],
            vec![
                vec![CellValue::Integer(1)],
                vec![CellValue::Empty],
                vec![text("oops")],
            ],
            3,
        );
        assert_eq!(table.len(), 2);
        match table.numeric_column("v") {
            Err(LoadError::InvalidCell { row, value, .. }) => {
                assert_eq!(row, 5);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn short_rows_are_padded() {
        let table = Table::from_rows(
            vec![text("a"), text("b")],
            vec![vec![CellValue::Integer(1)]],
            1,
        );
        let b = table.numeric_column("b").unwrap();
        assert!(b[0].is_nan());
    }

    #[test]
    fn retain_and_rename_columns() {
        let mut table = sample_table();
        table.retain_columns(|c| c != "B");
        assert_eq!(table.columns(), ["year", "A", "C", "MB"]);
        assert!(table.rename_column("MB", "MassBalance"));
        assert!(!table.rename_column("missing", "x"));
        assert_eq!(
            table.numeric_column("MassBalance").unwrap(),
            vec![-1.0, -2.0]
        );
    }

    #[test]
    fn dataset_reports_first_missing_column() {
        let table = sample_table();
        let temps = vec!["A".to_string(), "Z".to_string()];
        let err = ClimateDataset::from_table(
            &table,
            ColumnNames {
                year: "year",
                temperature: &temps,
                mass_balance: "MB",
            },
        )
        .unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "Z"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn annual_mean_skips_blank_cells() {
        let temps = temperature_names();
        let ds = ClimateDataset::from_table(
            &sample_table(),
            ColumnNames {
                year: "year",
                temperature: &temps,
                mass_balance: "MB",
            },
        )
        .unwrap();
        assert_abs_diff_eq!(ds.annual_mean(0).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ds.annual_mean(1).unwrap(), 1.5, epsilon = 1e-12);
        assert_eq!(ds.annual_mean(2), None);
        assert_eq!(ds.temperature_extent(), Some((0.25, 2.0)));
        assert_eq!(ds.mass_balance_extent(), Some((-2.0, -1.0)));
        assert_eq!(ds.year_label(1), Some(2001));
    }

    #[test]
    fn annual_mean_ignores_column_order() {
        let forward = temperature_names();
        let reversed: Vec<String> = forward.iter().rev().cloned().collect();
        let table = sample_table();
        let a = ClimateDataset::from_table(
            &table,
            ColumnNames {
                year: "year",
                temperature: &forward,
                mass_balance: "MB",
            },
        )
        .unwrap();
        let b = ClimateDataset::from_table(
            &table,
            ColumnNames {
                year: "year",
                temperature: &reversed,
                mass_balance: "MB",
            },
        )
        .unwrap();
        for row in 0..a.len() {
            assert_abs_diff_eq!(
                a.annual_mean(row).unwrap(),
                b.annual_mean(row).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn blank_year_is_rejected() {
        let table = Table::from_rows(
            vec![text("year"), text("A"), text("MB")],
            vec![vec![CellValue::Empty, CellValue::Float(1.0), CellValue::Float(1.0)]],
            3,
        );
        let temps = vec!["A".to_string()];
        let err = ClimateDataset::from_table(
            &table,
            ColumnNames {
                year: "year",
                temperature: &temps,
                mass_balance: "MB",
            },
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidCell { row: 3, .. }));
    }

    #[test]
    fn header_only_table_is_empty() {
        let table = Table::from_rows(vec![text("year"), text("A"), text("MB")], vec![], 3);
        let temps = vec!["A".to_string()];
        let err = ClimateDataset::from_table(
            &table,
            ColumnNames {
                year: "year",
                temperature: &temps,
                mass_balance: "MB",
            },
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }
}
