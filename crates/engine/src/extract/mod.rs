//! Row extractors, one per dataset kind.
//!
//! All extractors share the same walk: infer the header, then fold the data
//! rows into keyed accumulators, skipping blanks and summary rows, filling
//! sparse cells down from the previous row where the dataset allows it. The
//! fold is sequential by construction — fill-down is order-dependent.

pub mod daily;
pub mod phone;
pub mod pricing;
pub mod self_report;
pub mod transit;

pub use daily::extract_daily;
pub use phone::extract_phone;
pub use pricing::extract_pricing;
pub use self_report::extract_self_report;
pub use transit::extract_transit;

use chrono::NaiveDate;

use crate::header::ColumnMap;
use crate::matrix::{CellValue, RawMatrix};
use crate::normalize::{date_from_cell, date_from_str, number_from_cell, DateParse};

/// Non-empty text of a mapped cell.
pub(crate) fn mapped_text(matrix: &RawMatrix, row: usize, col: Option<usize>) -> Option<String> {
    let text = matrix.cell(row, col?).as_text();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// True if the cell text marks a totals row rather than data.
pub(crate) fn is_summary(text: &str, markers: &[String]) -> bool {
    let lower = text.to_lowercase();
    markers.iter().any(|m| lower.contains(&m.to_lowercase()))
}

/// Resolve a row's date: mapped column first, then a lenient scan across the
/// row's text cells, then the fill-down value. The second component is true
/// when the date came out of this row (and should update fill-down).
pub(crate) fn resolve_date(
    matrix: &RawMatrix,
    row: usize,
    date_col: Option<usize>,
    fill: Option<NaiveDate>,
) -> (Option<NaiveDate>, bool) {
    if let Some(col) = date_col {
        if let Some(d) = date_from_cell(matrix.cell(row, col), DateParse::Lenient) {
            return (Some(d), true);
        }
    }

    // Whole-row scan is string-only: a stray amount must not read as a serial.
    for cell in matrix.row(row) {
        if let CellValue::Text(s) = cell {
            if let Some(d) = date_from_str(s, DateParse::Lenient) {
                return (Some(d), true);
            }
        }
    }

    (fill, false)
}

/// Numeric reading of a mapped cell, or `default` when the column is absent.
pub(crate) fn count_from(
    matrix: &RawMatrix,
    row: usize,
    col: Option<usize>,
    default: f64,
) -> f64 {
    match col {
        Some(c) => number_from_cell(matrix.cell(row, c)),
        None => default,
    }
}

/// True when any of the given mapped columns has content on this row — the
/// corroboration required before a fill-down identity is reused.
pub(crate) fn has_supporting_data(
    matrix: &RawMatrix,
    row: usize,
    columns: &ColumnMap,
    roles: &[&str],
) -> bool {
    roles
        .iter()
        .any(|role| mapped_text(matrix, row, columns.get(role)).is_some())
}

#[cfg(test)]
pub(crate) fn text_matrix(rows: &[&[&str]]) -> RawMatrix {
    RawMatrix::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|c| CellValue::from_input(c)).collect())
            .collect(),
    )
}
