//! Output record shapes.
//!
//! Plain serializable values: extraction builds them fresh per call, the
//! caller owns anything longer-lived (JSON persistence, re-merging with
//! prior months). Dates are canonical `DD/MM/YYYY` strings, empty when
//! unknown — never fabricated.

use serde::{Deserialize, Serialize};

/// One driver-day from the daily trip log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Display name: title-cased, diacritics preserved.
    pub driver: String,
    /// `DD/MM/YYYY` or empty when unknown.
    pub date: String,
    pub customers: f64,
    pub tickets: f64,
    pub trips: f64,
    /// Payroll units: 4 trips = 1 unit, capped at 1 per day.
    pub workdays: f64,
    /// Trips beyond the 4-per-unit divisor.
    pub extra_trips: f64,
    pub plates: Vec<String>,
    pub notes: String,
}

/// One driver-day from a self-reported manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfStat {
    pub driver: String,
    pub date: String,
    pub customers: f64,
    pub trips: f64,
    pub plates: Vec<String>,
    pub notes: String,
}

/// One driver-day from the transit-shuttle log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitStat {
    pub driver: String,
    pub date: String,
    pub passengers: f64,
    pub trips: f64,
    pub plates: Vec<String>,
    pub notes: String,
}

/// One loyalty customer keyed by canonical phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneStat {
    /// Canonical `0xxxxxxxxx` form.
    pub phone: String,
    /// Best-known display name (richest spelling seen).
    pub name: String,
    pub trips: f64,
    /// Distinct routes, in first-seen order.
    pub routes: Vec<String>,
    /// Most recent date seen for this phone, `DD/MM/YYYY` or empty.
    pub last_seen: String,
}

/// One pricing line: route group × unit price × ticket type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStat {
    pub route_group: String,
    pub price: f64,
    pub ticket_type: String,
    pub quantity: f64,
    /// `price × quantity`, summed across merged rows.
    pub revenue: f64,
}
