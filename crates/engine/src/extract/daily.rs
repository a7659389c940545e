//! Daily trip-log extraction. Each data row is one trip; rows for the same
//! driver and day fold into one record.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::{
    driver_day_key, join_notes, push_unique, sort_daily, workday_units,
};
use crate::header::{infer_header, role};
use crate::matrix::RawMatrix;
use crate::model::DailyStat;
use crate::names::clean_name;
use crate::normalize::{extract_plate, format_date, richer_name};
use crate::profile::DatasetRules;

use super::{count_from, is_summary, mapped_text, resolve_date};

#[derive(Default)]
struct Acc {
    driver: String,
    date: String,
    customers: f64,
    tickets: f64,
    trips: f64,
    plates: Vec<String>,
    notes: Vec<String>,
}

pub fn extract_daily(matrix: &RawMatrix, rules: &DatasetRules) -> Vec<DailyStat> {
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

        let raw_driver = mapped_text(matrix, row, cols.get(role::DRIVER));
        if let Some(ref text) = raw_driver {
            if is_summary(text, &rules.summary_markers) {
                continue;
            }
        }

        let (date, own_date) = resolve_date(matrix, row, cols.get(role::DATE), last_date);
        if own_date {
            last_date = date;
        }

        // The daily log states the driver on every real trip row; no
        // fill-down here.
        let Some(driver) = raw_driver
            .map(|text| clean_name(&text, &rules.names))
            .filter(|name| !name.is_empty())
        else {
            continue;
        };

        let date_str = date.map(format_date).unwrap_or_default();
        let acc = groups.entry(driver_day_key(&date_str, &driver)).or_default();

        acc.driver = if acc.driver.is_empty() {
            driver
        } else {
            richer_name(&acc.driver, &driver).to_string()
        };
        acc.date = date_str;
        acc.customers += count_from(matrix, row, cols.get(role::QUANTITY), 1.0);
        acc.tickets += count_from(matrix, row, cols.get(role::TICKET_COUNT), 0.0);
        acc.trips += 1.0;

        if let Some(text) = mapped_text(matrix, row, cols.get(role::PLATE)) {
            if let Some(plate) = extract_plate(&text) {
                push_unique(&mut acc.plates, plate);
            }
        }
        if let Some(note) = mapped_text(matrix, row, cols.get(role::NOTES)) {
            push_unique(&mut acc.notes, note);
        }
    }

    let mut stats: Vec<DailyStat> = groups
        .into_values()
        .map(|acc| {
            let (workdays, extra_trips) = workday_units(acc.trips);
            DailyStat {
                driver: acc.driver,
                date: acc.date,
                customers: acc.customers,
                tickets: acc.tickets,
                trips: acc.trips,
                workdays,
                extra_trips,
                plates: acc.plates,
                notes: join_notes(&acc.notes),
            }
        })
        .collect();

    sort_daily(&mut stats);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::text_matrix;
    use crate::profile::Profile;

    fn rules() -> DatasetRules {
        Profile::default().daily
    }

    #[test]
    fn header_scenario_single_record() {
        let matrix = text_matrix(&[
            &["STT", "Ngày", "Tên lái xe", "Số khách"],
            &["1", "01/06/2024", "Nguyễn Văn A", "12"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].driver, "Nguyễn Văn A");
        assert_eq!(stats[0].date, "01/06/2024");
        assert_eq!(stats[0].customers, 12.0);
        assert_eq!(stats[0].trips, 1.0);
    }

    #[test]
    fn diacritic_spellings_merge_and_sum() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe", "Số khách"],
            &["01/06/2024", "Nguyễn Văn A", "3"],
            &["01/06/2024", "nguyen van a", "4"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].customers, 7.0);
        assert_eq!(stats[0].trips, 2.0);
        // the accented spelling wins the display form
        assert_eq!(stats[0].driver, "Nguyễn Văn A");
    }

    #[test]
    fn date_fills_down_across_merged_block() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe", "Số khách"],
            &["01/06/2024", "Trần B", "2"],
            &["", "Trần B", "5"],
            &["02/06/2024", "Trần B", "1"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats.len(), 2);
        // date desc: 02/06 first
        assert_eq!(stats[0].date, "02/06/2024");
        assert_eq!(stats[1].date, "01/06/2024");
        assert_eq!(stats[1].customers, 7.0);
        assert_eq!(stats[1].trips, 2.0);
    }

    #[test]
    fn summary_rows_and_blanks_skipped() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe", "Số khách"],
            &["01/06/2024", "Trần B", "2"],
            &["", "", ""],
            &["", "Tổng cộng", "2"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].customers, 2.0);
    }

    #[test]
    fn workday_units_derived_from_trips() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe", "Số khách"],
            &["01/06/2024", "Trần B", "1"],
            &["01/06/2024", "Trần B", "1"],
            &["01/06/2024", "Trần B", "1"],
            &["01/06/2024", "Trần B", "1"],
            &["01/06/2024", "Trần B", "1"],
            &["01/06/2024", "Trần B", "1"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats[0].trips, 6.0);
        assert_eq!(stats[0].workdays, 1.0);
        assert_eq!(stats[0].extra_trips, 2.0);
    }

    #[test]
    fn no_header_yields_empty() {
        let matrix = text_matrix(&[&["a", "b"], &["c", "d"]]);
        assert!(extract_daily(&matrix, &rules()).is_empty());
    }

    #[test]
    fn quantity_defaults_to_one_without_column() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe"],
            &["01/06/2024", "Trần B"],
            &["01/06/2024", "Trần B"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].customers, 2.0);
    }

    #[test]
    fn plates_and_notes_union() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe", "Số khách", "BKS", "Ghi chú"],
            &["01/06/2024", "Trần B", "2", "20B-123.45", "đổi xe"],
            &["01/06/2024", "Trần B", "3", "20B 12345", "đổi xe"],
        ]);
        let stats = extract_daily(&matrix, &rules());
        assert_eq!(stats[0].plates, vec!["20B-12345".to_string()]);
        assert_eq!(stats[0].notes, "đổi xe");
    }
}
