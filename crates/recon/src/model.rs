use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Side extraction
// ---------------------------------------------------------------------------

/// One ticket code's accumulated entry on one side of the reconciliation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SideEntry {
    /// Raw spelling as first seen in the file.
    pub display_code: String,
    /// Amount, summed when the code repeats.
    pub amount: f64,
    /// Best-available trip date, `DD/MM/YYYY` or empty.
    pub date: String,
    /// How many rows carried this code.
    pub count: usize,
}

/// Normalized ticket code → entry, for one side.
pub type SideMap = BTreeMap<String, SideEntry>;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VatStatus {
    Match,
    PriceMismatch,
    MissingInvoice,
    ExtraInvoice,
}

impl VatStatus {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl std::fmt::Display for VatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "MATCH"),
            Self::PriceMismatch => write!(f, "PRICE MISMATCH"),
            Self::MissingInvoice => write!(f, "MISSING INVOICE"),
            Self::ExtraInvoice => write!(f, "EXTRA INVOICE"),
        }
    }
}

/// One joined ticket code across both sides.
#[derive(Debug, Clone, Serialize)]
pub struct VatRecord {
    /// Display code, preferring the real-revenue side's spelling.
    pub code: String,
    pub date: String,
    pub real_amount: f64,
    pub invoice_amount: f64,
    /// True whenever an invoice-side entry exists.
    pub invoiced: bool,
    pub status: VatStatus,
}

// ---------------------------------------------------------------------------
// Summary + output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct VatSummary {
    pub total: usize,
    pub matched: usize,
    pub price_mismatches: usize,
    pub missing_invoices: usize,
    pub extra_invoices: usize,
}

impl VatSummary {
    pub fn discrepancies(&self) -> usize {
        self.price_mismatches + self.missing_invoices + self.extra_invoices
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VatMeta {
    pub config_name: String,
    pub tolerance: f64,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VatReport {
    pub meta: VatMeta,
    pub summary: VatSummary,
    pub records: Vec<VatRecord>,
}
