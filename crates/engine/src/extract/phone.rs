//! Phone/loyalty extraction. Records are keyed by the canonical phone
//! number alone, whole-file scope — the same customer appears across many
//! dates and formatting variants.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::{push_unique, sort_phone};
use crate::header::{infer_header, role};
use crate::matrix::{CellValue, RawMatrix};
use crate::model::PhoneStat;
use crate::names::clean_name;
use crate::normalize::{
    date_sort_key, format_date, normalize_phone, richer_name, scan_phone,
};
use crate::profile::DatasetRules;

use super::{count_from, is_summary, mapped_text, resolve_date};

#[derive(Default)]
struct Acc {
    name: String,
    trips: f64,
    routes: Vec<String>,
    last_seen: String,
}

pub fn extract_phone(matrix: &RawMatrix, rules: &DatasetRules) -> Vec<PhoneStat> {
    let Some(header) = infer_header(matrix, &rules.header) else {
        return Vec::new();
    };
    let cols = &header.columns;

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    let mut last_date: Option<NaiveDate> = None;

    for row in header.row + 1..matrix.row_count() {
        if matrix.row_is_blank(row) {
            continue;
        }

        let raw_phone = mapped_text(matrix, row, cols.get(role::PHONE));
        if let Some(ref text) = raw_phone {
            if is_summary(text, &rules.summary_markers) {
                continue;
            }
        }

        // Mapped column first, then a digit-run scan across the row.
        let phone = raw_phone
            .as_deref()
            .and_then(normalize_phone)
            .or_else(|| row_scan_phone(matrix, row));
        let Some(phone) = phone else {
            continue;
        };

        let (date, own_date) = resolve_date(matrix, row, cols.get(role::DATE), last_date);
        if own_date {
            last_date = date;
        }

        let acc = groups.entry(phone).or_default();

        if let Some(name) = mapped_text(matrix, row, cols.get(role::DRIVER))
            .map(|text| clean_name(&text, &rules.names))
            .filter(|name| !name.is_empty())
        {
            acc.name = if acc.name.is_empty() {
                name
            } else {
                richer_name(&acc.name, &name).to_string()
            };
        }

        acc.trips += count_from(matrix, row, cols.get(role::QUANTITY), 1.0);

        if let Some(route) = mapped_text(matrix, row, cols.get(role::ROUTE)) {
            push_unique(&mut acc.routes, route.trim().to_string());
        }

        if let Some(d) = date {
            let date_str = format_date(d);
            if date_sort_key(&date_str) >= date_sort_key(&acc.last_seen) {
                acc.last_seen = date_str;
            }
        }
    }

    let mut stats: Vec<PhoneStat> = groups
        .into_iter()
        .map(|(phone, acc)| PhoneStat {
            phone,
            name: acc.name,
            trips: acc.trips,
            routes: acc.routes,
            last_seen: acc.last_seen,
        })
        .collect();

    sort_phone(&mut stats);
    stats
}

/// Scan every text cell of a row for a 9–11 digit run.
fn row_scan_phone(matrix: &RawMatrix, row: usize) -> Option<String> {
    for cell in matrix.row(row) {
        if let CellValue::Text(s) = cell {
            if let Some(phone) = scan_phone(s) {
                return Some(phone);
            }
        }
    }
    None
}
