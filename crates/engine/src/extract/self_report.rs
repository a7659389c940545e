//! Self-reported driver manifest extraction.
//!
//! The manifest arrives either as a positional matrix or as row objects
//! (unordered keys) depending on the upstream decoder; the caller tags the
//! shape once and everything below works on a matrix. Name cells are free
//! text blobs ("KH LXE e Hùng 0912..."), so the cleaning vocabulary is the
//! richest of the dataset kinds.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::{driver_day_key, join_notes, push_unique, sort_self};
use crate::header::{infer_header, role};
use crate::model::SelfStat;
use crate::names::clean_name;
use crate::normalize::{extract_plate, format_date, richer_name};
use crate::profile::DatasetRules;
use crate::matrix::RowsInput;

use super::{count_from, has_supporting_data, is_summary, mapped_text, resolve_date};

#[derive(Default)]
struct Acc {
    driver: String,
    date: String,
    customers: f64,
    trips: f64,
    plates: Vec<String>,
    notes: Vec<String>,
}

pub fn extract_self_report(input: RowsInput, rules: &DatasetRules) -> Vec<SelfStat> {
    let matrix = input.into_matrix();

    let Some(header) = infer_header(&matrix, &rules.header) else {
        return Vec::new();
    };
    let cols = &header.columns;

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    let mut last_date: Option<NaiveDate> = None;
    let mut last_driver: Option<String> = None;

    for row in header.row + 1..matrix.row_count() {
        if matrix.row_is_blank(row) {
            continue;
        }

        let raw_driver = mapped_text(&matrix, row, cols.get(role::DRIVER));
        if let Some(ref text) = raw_driver {
            if is_summary(text, &rules.summary_markers) {
                continue;
            }
        }

        let (date, own_date) = resolve_date(&matrix, row, cols.get(role::DATE), last_date);
        if own_date {
            last_date = date;
        }

        let cleaned = raw_driver
            .map(|text| clean_name(&text, &rules.names))
            .filter(|name| !name.is_empty());

        let driver = match cleaned {
            Some(name) => {
                last_driver = Some(name.clone());
                name
            }
            None => {
                let carries_data = own_date
                    || has_supporting_data(
                        &matrix,
                        row,
                        cols,
                        &[role::QUANTITY, role::TRIP, role::PLATE, role::NOTES],
                    );
                match (&last_driver, carries_data) {
                    (Some(name), true) => name.clone(),
                    _ => continue,
                }
            }
        };

        let date_str = date.map(format_date).unwrap_or_default();
        let acc = groups.entry(driver_day_key(&date_str, &driver)).or_default();

        acc.driver = if acc.driver.is_empty() {
            driver
        } else {
            richer_name(&acc.driver, &driver).to_string()
        };
        acc.date = date_str;
        acc.customers += count_from(&matrix, row, cols.get(role::QUANTITY), 1.0);
        acc.trips += 1.0;

        // Plates hide in the name blob as often as in their own column.
        if let Some(text) = mapped_text(&matrix, row, cols.get(role::PLATE)) {
            if let Some(plate) = extract_plate(&text) {
                push_unique(&mut acc.plates, plate);
            }
        }
        if let Some(note) = mapped_text(&matrix, row, cols.get(role::NOTES)) {
            push_unique(&mut acc.notes, note);
        }
    }

    let mut stats: Vec<SelfStat> = groups
        .into_values()
        .map(|acc| SelfStat {
            driver: acc.driver,
            date: acc.date,
            customers: acc.customers,
            trips: acc.trips,
            plates: acc.plates,
            notes: join_notes(&acc.notes),
        })
        .collect();

    sort_self(&mut stats);
    stats
}
