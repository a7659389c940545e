//! Per-side extraction: one keyed pass over a ledger matrix.

use chuyenxe_engine::header::{infer_header, role};
use chuyenxe_engine::matrix::{CellValue, RawMatrix};
use chuyenxe_engine::normalize::{
    date_from_cell, format_date, number_from_cell, DateParse,
};

use crate::config::SideRules;
use crate::model::{SideEntry, SideMap};

/// Fold a ledger matrix into `normalized ticket code → entry`.
///
/// Header inference failure or an empty sheet yields an empty map — the join
/// then reports everything from the other side, which is the honest answer.
pub fn extract_side(matrix: &RawMatrix, rules: &SideRules) -> SideMap {
    let Some(header) = infer_header(matrix, &rules.header) else {
        return SideMap::new();
    };
    let cols = &header.columns;

    let mut entries = SideMap::new();

    for row in header.row + 1..matrix.row_count() {
        if matrix.row_is_blank(row) {
            continue;
        }

        let mapped = cols
            .get(role::TICKET_CODE)
            .map(|c| matrix.cell(row, c).as_text())
            .filter(|s| !s.is_empty());

        if let Some(ref text) = mapped {
            if is_summary(text, &rules.summary_markers) {
                continue;
            }
        }

        // Mapped column first, then scan the row for a code-shaped token.
        let display = match mapped.or_else(|| row_scan_code(matrix, row)) {
            Some(text) => text.trim().to_string(),
            None => continue,
        };

        let normalized = normalize_code(&display);
        if normalized.is_empty() {
            continue;
        }

        let amount = match cols.get(role::AMOUNT) {
            Some(c) => number_from_cell(matrix.cell(row, c)),
            None => 0.0,
        };

        let date = cols
            .get(role::DATE)
            .and_then(|c| date_from_cell(matrix.cell(row, c), DateParse::Strict))
            .map(format_date);

        let entry = entries.entry(normalized).or_insert_with(|| SideEntry {
            display_code: display,
            ..SideEntry::default()
        });
        entry.amount += amount;
        entry.count += 1;
        if entry.date.is_empty() {
            if let Some(d) = date {
                entry.date = d;
            }
        }
    }

    entries
}

/// Uppercase with every non-alphanumeric stripped: the join key. "AB-123"
/// and "ab 123" both become "AB123".
pub fn normalize_code(code: &str) -> String {
    code.to_uppercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn is_summary(text: &str, markers: &[String]) -> bool {
    let lower = text.to_lowercase();
    markers.iter().any(|m| lower.contains(&m.to_lowercase()))
}

/// Find a plausible ticket code anywhere in the row: a token of 3+ chars
/// containing both a letter and a digit.
fn row_scan_code(matrix: &RawMatrix, row: usize) -> Option<String> {
    for cell in matrix.row(row) {
        if let CellValue::Text(s) = cell {
            for token in s.split_whitespace() {
                let len = token.chars().count();
                if len >= 3
                    && len < 20
                    && token.chars().any(|c| c.is_ascii_alphabetic())
                    && token.chars().any(|c| c.is_ascii_digit())
                {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}
