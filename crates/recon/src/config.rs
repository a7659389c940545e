//! Reconciliation config: amount tolerance plus per-side header rules.
//!
//! The two ledgers are produced by different people, so each side gets its
//! own keyword dictionaries; the defaults cover both vocabularies seen in
//! practice. The tolerance default of 100 currency units is a legacy
//! business constant, preserved as-is.

use std::collections::BTreeMap;

use serde::Deserialize;

use chuyenxe_engine::header::{role, HeaderRules, RoleKeywords};

use crate::error::VatError;

#[derive(Debug, Clone, Deserialize)]
pub struct VatConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// |real − invoice| at or under this still counts as a MATCH.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_side")]
    pub real: SideRules,
    #[serde(default = "default_side")]
    pub invoice: SideRules,
}

/// Extraction rules for one ledger side.
#[derive(Debug, Clone, Deserialize)]
pub struct SideRules {
    pub header: HeaderRules,
    #[serde(default = "default_summary_markers")]
    pub summary_markers: Vec<String>,
}

impl Default for VatConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            tolerance: default_tolerance(),
            real: default_side(),
            invoice: default_side(),
        }
    }
}

fn default_name() -> String {
    "VAT reconciliation".into()
}

fn default_tolerance() -> f64 {
    100.0
}

fn default_summary_markers() -> Vec<String> {
    vec!["tổng".into(), "cộng".into(), "total".into()]
}

fn default_side() -> SideRules {
    let mut roles = BTreeMap::new();
    roles.insert(
        role::TICKET_CODE.to_string(),
        RoleKeywords {
            high: vec![
                "mã vé".into(),
                "số vé".into(),
                "seri".into(),
                "ký hiệu vé".into(),
            ],
            low: vec!["vé".into(), "mã".into()],
            weight: 10,
        },
    );
    roles.insert(
        role::AMOUNT.to_string(),
        RoleKeywords {
            high: vec![
                "thành tiền".into(),
                "số tiền".into(),
                "doanh thu".into(),
            ],
            low: vec!["tiền".into(), "giá".into()],
            weight: 6,
        },
    );
    roles.insert(
        role::DATE.to_string(),
        RoleKeywords {
            high: vec!["ngày".into()],
            low: vec!["thời gian".into()],
            weight: 3,
        },
    );

    SideRules {
        header: HeaderRules {
            scan_rows: 25,
            anchor: role::TICKET_CODE.to_string(),
            roles,
        },
        summary_markers: default_summary_markers(),
    }
}

// ---------------------------------------------------------------------------
// Parse + validate
// ---------------------------------------------------------------------------

impl VatConfig {
    pub fn from_toml(input: &str) -> Result<Self, VatError> {
        let config: VatConfig =
            toml::from_str(input).map_err(|e| VatError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VatError> {
        if self.tolerance < 0.0 {
            return Err(VatError::ConfigValidation(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }

        for (side, rules) in [("real", &self.real), ("invoice", &self.invoice)] {
            let anchor = rules.header.roles.get(&rules.header.anchor).ok_or_else(|| {
                VatError::ConfigValidation(format!(
                    "{side}: anchor role '{}' has no keyword entry",
                    rules.header.anchor
                ))
            })?;
            if anchor.high.is_empty() && anchor.low.is_empty() {
                return Err(VatError::ConfigValidation(format!(
                    "{side}: anchor role '{}' has no keywords",
                    rules.header.anchor
                )));
            }
        }

        Ok(())
    }
}
