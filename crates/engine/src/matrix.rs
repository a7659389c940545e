use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A single decoded spreadsheet cell.
///
/// Decoders keep values as close to the source as possible: numeric cells stay
/// numbers (including raw date serials), text stays text. The normalizers in
/// [`crate::normalize`] decide what a value means per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Coerce a raw text field (CSV import, row-object value) into a cell.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if let Ok(num) = trimmed.parse::<f64>() {
            return CellValue::Number(num);
        }

        CellValue::Text(trimmed.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text rendering of the cell, used for keyword scans and fallbacks.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Date(d) => d.format("%d/%m/%Y").to_string(),
        }
    }

}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Row-major grid of cells as decoded from one sheet.
///
/// Not rectangular: rows keep whatever width the source had. Reads outside a
/// row's width return `Empty`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMatrix {
    rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_is_blank(&self, row: usize) -> bool {
        self.row(row).iter().all(CellValue::is_empty)
    }

    /// Widest row width, used when a whole-row scan needs a column bound.
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tagged row input
// ---------------------------------------------------------------------------

/// Input shape for extractors that accept either a positional matrix or a
/// list of key/value row objects. The caller picks the variant once at the
/// boundary; extraction itself only ever sees a matrix.
#[derive(Debug, Clone)]
pub enum RowsInput {
    Matrix(RawMatrix),
    /// Unordered row objects: one `(column name, value)` list per row.
    Records(Vec<Vec<(String, CellValue)>>),
}

impl RowsInput {
    /// Lower to a matrix. Record keys become a synthesized header row in
    /// first-seen order; each record's values land under its own keys.
    pub fn into_matrix(self) -> RawMatrix {
        match self {
            RowsInput::Matrix(m) => m,
            RowsInput::Records(records) => {
                let mut columns: Vec<String> = Vec::new();
                for record in &records {
                    for (key, _) in record {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                }

                let mut matrix = RawMatrix::new();
                matrix.push_row(
                    columns
                        .iter()
                        .map(|c| CellValue::Text(c.clone()))
                        .collect(),
                );

                for record in records {
                    let mut row = vec![CellValue::Empty; columns.len()];
                    for (key, value) in record {
                        if let Some(idx) = columns.iter().position(|c| *c == key) {
                            row[idx] = value;
                        }
                    }
                    matrix.push_row(row);
                }

                matrix
            }
        }
    }
}
