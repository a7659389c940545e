//! Transit-shuttle log extraction. Shuttle sheets often state the driver
//! once per visually merged block, so the driver fills down while the block
//! keeps carrying data.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::{driver_day_key, join_notes, push_unique, sort_transit};
use crate::header::{infer_header, role};
use crate::matrix::RawMatrix;
use crate::model::TransitStat;
use crate::names::clean_name;
use crate::normalize::{extract_plate, format_date, richer_name};
use crate::profile::DatasetRules;

use super::{count_from, has_supporting_data, is_summary, mapped_text, resolve_date};

#[derive(Default)]
struct Acc {
    driver: String,
    date: String,
    passengers: f64,
    trips: f64,
    plates: Vec<String>,
    notes: Vec<String>,
}

pub fn extract_transit(matrix: &RawMatrix, rules: &DatasetRules) -> Vec<TransitStat> {
    let Some(header) = infer_header(matrix, &rules.header) else {
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

        let cleaned = raw_driver
            .map(|text| clean_name(&text, &rules.names))
            .filter(|name| !name.is_empty());

        let driver = match cleaned {
            Some(name) => {
                last_driver = Some(name.clone());
                name
            }
            None => {
                // Reuse the block's driver only when the row actually
                // carries data of its own.
                let carries_data = own_date
                    || has_supporting_data(
                        matrix,
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
        acc.passengers += count_from(matrix, row, cols.get(role::QUANTITY), 1.0);
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

    let mut stats: Vec<TransitStat> = groups
        .into_values()
        .map(|acc| TransitStat {
            driver: acc.driver,
            date: acc.date,
            passengers: acc.passengers,
            trips: acc.trips,
            plates: acc.plates,
            notes: join_notes(&acc.notes),
        })
        .collect();

    sort_transit(&mut stats);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::text_matrix;
    use crate::profile::Profile;

    fn rules() -> DatasetRules {
        Profile::default().transit
    }

    #[test]
    fn driver_fills_down_through_merged_block() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe trung chuyển", "Số khách"],
            &["01/06/2024", "Phạm C", "3"],
            &["", "", "4"],
            &["", "", "2"],
        ]);
        let stats = extract_transit(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].driver, "Phạm C");
        assert_eq!(stats[0].passengers, 9.0);
        assert_eq!(stats[0].trips, 3.0);
    }

    #[test]
    fn fill_down_needs_supporting_data() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe trung chuyển", "Số khách"],
            &["01/06/2024", "Phạm C", "3"],
            &["ghi chú lề", "", ""],
        ]);
        let stats = extract_transit(&matrix, &rules());
        // the stray text row has no mapped data and must not become a trip
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].trips, 1.0);
    }

    #[test]
    fn sorted_date_desc_then_driver() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe trung chuyển", "Số khách"],
            &["01/06/2024", "Bình", "3"],
            &["02/06/2024", "An", "1"],
            &["01/06/2024", "An", "2"],
        ]);
        let stats = extract_transit(&matrix, &rules());
        let order: Vec<(&str, &str)> = stats
            .iter()
            .map(|s| (s.date.as_str(), s.driver.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("02/06/2024", "An"),
                ("01/06/2024", "An"),
                ("01/06/2024", "Bình"),
            ]
        );
    }

    #[test]
    fn role_prefix_stripped_from_driver_cell() {
        let matrix = text_matrix(&[
            &["Ngày", "Lái xe trung chuyển", "Số khách"],
            &["01/06/2024", "Lái xe: Đỗ Văn D", "5"],
        ]);
        let stats = extract_transit(&matrix, &rules());
        assert_eq!(stats[0].driver, "Đỗ Văn D");
    }
}
