//! Composite keys, merge semantics, sort orders, and history re-merge.
//!
//! Merging is strictly additive for counts and union-based for sets; the
//! display name converges to the richest spelling seen. Output order is
//! significant and reproduced exactly per dataset.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{DailyStat, PhoneStat, PriceStat, SelfStat, TransitStat};
use crate::normalize::{date_sort_key, identity_key};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Composite key for driver-day records: the display date plus the
/// diacritic-insensitive driver id. Two spellings of one driver on one day
/// merge into one record.
pub fn driver_day_key(date: &str, driver: &str) -> String {
    format!("{date}|{}", identity_key(driver))
}

/// Records that can be re-keyed for caller-side history merging.
pub trait Keyed {
    fn merge_key(&self) -> String;
}

impl Keyed for DailyStat {
    fn merge_key(&self) -> String {
        driver_day_key(&self.date, &self.driver)
    }
}

impl Keyed for SelfStat {
    fn merge_key(&self) -> String {
        driver_day_key(&self.date, &self.driver)
    }
}

impl Keyed for TransitStat {
    fn merge_key(&self) -> String {
        driver_day_key(&self.date, &self.driver)
    }
}

impl Keyed for PhoneStat {
    fn merge_key(&self) -> String {
        self.phone.clone()
    }
}

impl Keyed for PriceStat {
    fn merge_key(&self) -> String {
        format!("{}|{}|{}", self.route_group, self.price, self.ticket_type)
    }
}

/// Re-merge previously saved records with a fresh extraction. Fresh entries
/// overwrite saved ones for the same key; key derivation is identical to the
/// extraction pass so history never fragments. Callers re-sort afterwards.
pub fn merge_history<T: Keyed>(saved: Vec<T>, fresh: Vec<T>) -> Vec<T> {
    let mut merged: BTreeMap<String, T> = BTreeMap::new();
    for record in saved.into_iter().chain(fresh) {
        merged.insert(record.merge_key(), record);
    }
    merged.into_values().collect()
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Trips per payroll workday unit. A hard business constant.
const TRIPS_PER_WORKDAY: f64 = 4.0;

/// Workday units and overflow trips for a day's trip count:
/// `min(trips/4, 1)` units, `max(trips-4, 0)` extra.
pub fn workday_units(trips: f64) -> (f64, f64) {
    let units = (trips / TRIPS_PER_WORKDAY).min(1.0);
    let extra = (trips - TRIPS_PER_WORKDAY).max(0.0);
    (units, extra)
}

// ---------------------------------------------------------------------------
// Set helpers used by the extractors
// ---------------------------------------------------------------------------

pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

pub(crate) fn join_notes(notes: &[String]) -> String {
    notes.join("; ")
}

// ---------------------------------------------------------------------------
// Sort orders
// ---------------------------------------------------------------------------

fn desc_f64(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Daily/self records: most recent date first, then biggest count, then
/// driver name.
pub fn sort_daily(stats: &mut [DailyStat]) {
    stats.sort_by(|a, b| {
        date_sort_key(&b.date)
            .cmp(&date_sort_key(&a.date))
            .then_with(|| desc_f64(a.customers, b.customers))
            .then_with(|| a.driver.cmp(&b.driver))
    });
}

pub fn sort_self(stats: &mut [SelfStat]) {
    stats.sort_by(|a, b| {
        date_sort_key(&b.date)
            .cmp(&date_sort_key(&a.date))
            .then_with(|| desc_f64(a.customers, b.customers))
            .then_with(|| a.driver.cmp(&b.driver))
    });
}

/// Transit records: most recent date first, then driver name.
pub fn sort_transit(stats: &mut [TransitStat]) {
    stats.sort_by(|a, b| {
        date_sort_key(&b.date)
            .cmp(&date_sort_key(&a.date))
            .then_with(|| a.driver.cmp(&b.driver))
    });
}

/// Phone records: most trips first.
pub fn sort_phone(stats: &mut [PhoneStat]) {
    stats.sort_by(|a, b| desc_f64(a.trips, b.trips).then_with(|| a.phone.cmp(&b.phone)));
}

/// Pricing records: highest revenue first.
pub fn sort_pricing(stats: &mut [PriceStat]) {
    stats.sort_by(|a, b| {
        desc_f64(a.revenue, b.revenue).then_with(|| a.route_group.cmp(&b.route_group))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(driver: &str, date: &str, customers: f64) -> DailyStat {
        DailyStat {
            driver: driver.into(),
            date: date.into(),
            customers,
            tickets: 0.0,
            trips: 0.0,
            workdays: 0.0,
            extra_trips: 0.0,
            plates: vec![],
            notes: String::new(),
        }
    }

    #[test]
    fn workday_rule() {
        assert_eq!(workday_units(4.0), (1.0, 0.0));
        assert_eq!(workday_units(10.0), (1.0, 6.0));
        assert_eq!(workday_units(2.0), (0.5, 0.0));
        assert_eq!(workday_units(0.0), (0.0, 0.0));
    }

    #[test]
    fn driver_day_key_folds_spellings() {
        assert_eq!(
            driver_day_key("01/06/2024", "Nguyễn Văn A"),
            driver_day_key("01/06/2024", "nguyen van a"),
        );
        assert_ne!(
            driver_day_key("01/06/2024", "Nguyễn Văn A"),
            driver_day_key("02/06/2024", "Nguyễn Văn A"),
        );
    }

    #[test]
    fn sort_daily_date_desc_then_count() {
        let mut stats = vec![
            daily("B", "01/06/2024", 3.0),
            daily("A", "02/06/2024", 1.0),
            daily("C", "01/06/2024", 9.0),
            daily("D", "", 5.0),
        ];
        sort_daily(&mut stats);
        let order: Vec<&str> = stats.iter().map(|s| s.driver.as_str()).collect();
        // undated records key as 0 and sort last
        assert_eq!(order, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn history_merge_overwrites_same_key() {
        let saved = vec![daily("Nguyễn Văn A", "01/06/2024", 3.0)];
        let fresh = vec![
            daily("Nguyen Van A", "01/06/2024", 7.0),
            daily("Trần B", "02/06/2024", 2.0),
        ];
        let merged = merge_history(saved, fresh);
        assert_eq!(merged.len(), 2);
        let a = merged
            .iter()
            .find(|s| identity_key(&s.driver) == "nguyenvana")
            .unwrap();
        // the fresh extraction wins for that key
        assert_eq!(a.customers, 7.0);
    }

    #[test]
    fn push_unique_skips_duplicates_and_empties() {
        let mut list = vec!["20B-12345".to_string()];
        push_unique(&mut list, "20B-12345".into());
        push_unique(&mut list, "".into());
        push_unique(&mut list, "97H-01234".into());
        assert_eq!(list.len(), 2);
    }
}
