//! Extraction profiles: the keyword dictionaries, weights, vocabularies and
//! business constants that drive header inference and row extraction.
//!
//! Everything here is data. The built-in defaults encode the bus line's
//! current spreadsheet vocabulary; a TOML file can override any dataset
//! section without touching the scoring or extraction algorithms.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::classify::RoutePair;
use crate::error::EngineError;
use crate::header::{role, HeaderRules, RoleKeywords};
use crate::names::NameVocab;

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default = "default_daily")]
    pub daily: DatasetRules,
    #[serde(default = "default_self_report")]
    pub self_report: DatasetRules,
    #[serde(default = "default_transit")]
    pub transit: DatasetRules,
    #[serde(default = "default_phone")]
    pub phone: DatasetRules,
    #[serde(default = "default_pricing")]
    pub pricing: PricingRules,
}

/// Rules for one driver/phone dataset kind.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatasetRules {
    pub header: HeaderRules,
    #[serde(default)]
    pub names: NameVocab,
    /// Rows whose primary cell contains one of these are totals, not data.
    #[serde(default = "default_summary_markers")]
    pub summary_markers: Vec<String>,
}

/// Rules for the ticket-pricing dataset.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PricingRules {
    pub header: HeaderRules,
    #[serde(default = "default_summary_markers")]
    pub summary_markers: Vec<String>,
    #[serde(default = "default_route_pairs")]
    pub route_pairs: Vec<RoutePair>,
    /// Prices above this are header/footer bleed-through or corrupted cells.
    #[serde(default = "default_max_price")]
    pub max_price: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            daily: default_daily(),
            self_report: default_self_report(),
            transit: default_transit(),
            phone: default_phone(),
            pricing: default_pricing(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + validate
// ---------------------------------------------------------------------------

impl Profile {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let profile: Profile =
            toml::from_str(input).map_err(|e| EngineError::ProfileParse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, header) in [
            ("daily", &self.daily.header),
            ("self_report", &self.self_report.header),
            ("transit", &self.transit.header),
            ("phone", &self.phone.header),
            ("pricing", &self.pricing.header),
        ] {
            validate_header(name, header)?;
        }

        if self.pricing.max_price <= 0.0 {
            return Err(EngineError::ProfileValidation(format!(
                "pricing.max_price must be positive, got {}",
                self.pricing.max_price
            )));
        }

        Ok(())
    }
}

fn validate_header(dataset: &str, header: &HeaderRules) -> Result<(), EngineError> {
    if header.scan_rows == 0 || header.scan_rows > 30 {
        return Err(EngineError::ProfileValidation(format!(
            "{dataset}: scan_rows must be 1..=30, got {}",
            header.scan_rows
        )));
    }

    let anchor = header.roles.get(&header.anchor).ok_or_else(|| {
        EngineError::ProfileValidation(format!(
            "{dataset}: anchor role '{}' has no keyword entry",
            header.anchor
        ))
    })?;
    if anchor.high.is_empty() && anchor.low.is_empty() {
        return Err(EngineError::ProfileValidation(format!(
            "{dataset}: anchor role '{}' has no keywords",
            header.anchor
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in dictionaries
// ---------------------------------------------------------------------------

fn kw(high: &[&str], low: &[&str], weight: u32) -> RoleKeywords {
    RoleKeywords {
        high: high.iter().map(|s| s.to_string()).collect(),
        low: low.iter().map(|s| s.to_string()).collect(),
        weight,
    }
}

fn header_rules(anchor: &str, entries: &[(&str, RoleKeywords)]) -> HeaderRules {
    let mut roles = BTreeMap::new();
    for (name, keywords) in entries {
        roles.insert(name.to_string(), keywords.clone());
    }
    HeaderRules {
        scan_rows: 25,
        anchor: anchor.to_string(),
        roles,
    }
}

fn default_summary_markers() -> Vec<String> {
    vec!["tổng".into(), "cộng".into(), "total".into()]
}

fn default_max_price() -> f64 {
    150_000.0
}

fn default_route_pairs() -> Vec<RoutePair> {
    vec![
        RoutePair {
            a: "thái nguyên".into(),
            b: "mỹ đình".into(),
            label: "Thái Nguyên - Mỹ Đình".into(),
        },
        RoutePair {
            a: "thái nguyên".into(),
            b: "bắc kạn".into(),
            label: "Thái Nguyên - Bắc Kạn".into(),
        },
    ]
}

fn default_daily() -> DatasetRules {
    DatasetRules {
        header: header_rules(
            role::DRIVER,
            &[
                (
                    role::DRIVER,
                    kw(&["tên lái xe", "lái xe", "tài xế"], &["họ tên", "tên"], 10),
                ),
                (role::DATE, kw(&["ngày"], &["thời gian"], 5)),
                (
                    role::QUANTITY,
                    kw(&["số khách", "sl khách", "lượng khách"], &["khách"], 4),
                ),
                (role::TICKET_COUNT, kw(&["số vé", "sl vé"], &["vé"], 2)),
                (role::TRIP, kw(&["số chuyến", "chuyến"], &["lượt"], 2)),
                (role::TIME, kw(&["giờ"], &["giờ đi"], 1)),
                (role::PLATE, kw(&["biển số", "bks"], &["biển"], 1)),
                (role::NOTES, kw(&["ghi chú"], &["chú thích"], 1)),
            ],
        ),
        names: NameVocab {
            prefixes: vec!["lái xe".into(), "tài xế".into(), "lxe".into()],
            stops: vec!["bus".into(), "bks".into(), "xe".into()],
        },
        summary_markers: default_summary_markers(),
    }
}

fn default_self_report() -> DatasetRules {
    DatasetRules {
        header: header_rules(
            role::DRIVER,
            &[
                (
                    role::DRIVER,
                    kw(
                        &["lái xe tự khai", "tên lái xe", "lái xe", "tài xế"],
                        &["họ tên", "tên"],
                        10,
                    ),
                ),
                (role::DATE, kw(&["ngày"], &["thời gian"], 5)),
                (
                    role::QUANTITY,
                    kw(&["số khách", "sl khách", "khách tự khai"], &["khách"], 4),
                ),
                (role::TRIP, kw(&["số chuyến", "chuyến"], &["lượt"], 2)),
                (role::PLATE, kw(&["biển số", "bks"], &["biển"], 1)),
                (role::NOTES, kw(&["ghi chú"], &["nội dung"], 1)),
            ],
        ),
        names: NameVocab {
            prefixes: vec![
                "kh lxe".into(),
                "lái xe".into(),
                "tài xế".into(),
                "lxe".into(),
                "kh".into(),
                "e".into(),
                "a".into(),
                "c".into(),
            ],
            stops: vec![
                "bus".into(),
                "bks".into(),
                "xe".into(),
                "sđt".into(),
                "tel".into(),
            ],
        },
        summary_markers: default_summary_markers(),
    }
}

fn default_transit() -> DatasetRules {
    DatasetRules {
        header: header_rules(
            role::DRIVER,
            &[
                (
                    role::DRIVER,
                    kw(
                        &["lái xe trung chuyển", "lái xe tc", "lái xe"],
                        &["tài xế", "tên"],
                        10,
                    ),
                ),
                (role::DATE, kw(&["ngày"], &["thời gian"], 5)),
                (
                    role::QUANTITY,
                    kw(&["số khách", "sl khách"], &["khách"], 4),
                ),
                (role::TRIP, kw(&["số chuyến", "chuyến"], &["lượt"], 2)),
                (role::ROUTE, kw(&["tuyến"], &["lộ trình"], 1)),
                (role::PLATE, kw(&["biển số", "bks"], &["biển"], 1)),
                (role::NOTES, kw(&["ghi chú"], &[], 1)),
            ],
        ),
        names: NameVocab {
            prefixes: vec![
                "lái xe trung chuyển".into(),
                "lái xe".into(),
                "tài xế".into(),
                "e".into(),
                "a".into(),
                "c".into(),
            ],
            stops: vec!["bus".into(), "bks".into(), "xe".into()],
        },
        summary_markers: default_summary_markers(),
    }
}

fn default_phone() -> DatasetRules {
    DatasetRules {
        header: header_rules(
            role::PHONE,
            &[
                (
                    role::PHONE,
                    kw(
                        &["số điện thoại", "sđt", "sdt", "điện thoại"],
                        &["phone", "liên hệ"],
                        10,
                    ),
                ),
                (
                    role::DRIVER,
                    kw(&["tên khách", "khách hàng"], &["tên"], 4),
                ),
                (role::DATE, kw(&["ngày"], &["thời gian"], 3)),
                (role::ROUTE, kw(&["tuyến"], &["lộ trình"], 2)),
                (role::QUANTITY, kw(&["số chuyến", "lượt đi"], &["lượt"], 2)),
            ],
        ),
        names: NameVocab {
            prefixes: vec![
                "anh".into(),
                "chị".into(),
                "em".into(),
                "cô".into(),
                "chú".into(),
                "bác".into(),
                "a".into(),
                "c".into(),
                "e".into(),
            ],
            stops: vec!["bus".into(), "bks".into(), "xe".into(), "sđt".into()],
        },
        summary_markers: default_summary_markers(),
    }
}

fn default_pricing() -> PricingRules {
    PricingRules {
        header: header_rules(
            role::ROUTE,
            &[
                (
                    role::ROUTE,
                    kw(&["tuyến đường", "tuyến", "lộ trình"], &["chặng"], 8),
                ),
                (role::PRICE, kw(&["đơn giá", "giá vé", "giá"], &["tiền"], 6)),
                (
                    role::QUANTITY,
                    kw(&["số lượng", "sl"], &["số vé"], 3),
                ),
                (role::DATE, kw(&["ngày"], &[], 1)),
                (role::NOTES, kw(&["ghi chú"], &[], 1)),
            ],
        ),
        summary_markers: default_summary_markers(),
        route_pairs: default_route_pairs(),
        max_price: default_max_price(),
    }
}
