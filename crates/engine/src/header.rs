//! Header row detection and role→column mapping.
//!
//! Source files come from different people and templates, so column order is
//! never assumed. A scan window of leading rows is scored against per-role
//! keyword lists; the best-scoring row becomes the header and extraction
//! starts below it. Roles are plain strings so new dataset kinds are pure
//! configuration — the scoring algorithm never changes.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::matrix::RawMatrix;

/// Role names shared by the built-in dataset profiles.
pub mod role {
    pub const DRIVER: &str = "driver";
    pub const DATE: &str = "date";
    pub const QUANTITY: &str = "quantity";
    pub const TICKET_COUNT: &str = "ticket_count";
    pub const TRIP: &str = "trip";
    pub const TIME: &str = "time";
    pub const PRICE: &str = "price";
    pub const PHONE: &str = "phone";
    pub const ROUTE: &str = "route";
    pub const PLATE: &str = "plate";
    pub const NOTES: &str = "notes";
    pub const TICKET_CODE: &str = "ticket_code";
    pub const AMOUNT: &str = "amount";
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Keyword tiers and weight for one semantic role.
///
/// `high` keywords are strong, unambiguous header phrases; `low` keywords
/// are weaker fallbacks. `weight` feeds the row score — the primary role's
/// weight must dominate so data rows containing keyword-like text don't win.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RoleKeywords {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Header detection rules for one dataset kind.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HeaderRules {
    /// How many leading rows to consider as header candidates.
    #[serde(default = "default_scan_rows")]
    pub scan_rows: usize,
    /// The role whose presence is mandatory for a row to be a header at all.
    pub anchor: String,
    /// Role name → keyword tiers.
    pub roles: BTreeMap<String, RoleKeywords>,
}

fn default_scan_rows() -> usize {
    25
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Role name → zero-based column index for one matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    columns: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn get(&self, role: &str) -> Option<usize> {
        self.columns.get(role).copied()
    }

    fn set(&mut self, role: &str, col: usize) {
        self.columns.insert(role.to_string(), col);
    }
}

/// A detected header: its row index and the column mapping it yields.
/// Extraction resumes at `row + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub row: usize,
    pub columns: ColumnMap,
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Find the best header row in the scan window.
///
/// Returns `None` when no scanned row maps the anchor role — callers must
/// then produce an empty result set rather than guessing a layout.
pub fn infer_header(matrix: &RawMatrix, rules: &HeaderRules) -> Option<Header> {
    let scan = rules.scan_rows.min(matrix.row_count());
    let mut best: Option<(u32, Header)> = None;

    for row in 0..scan {
        let cells: Vec<String> = matrix
            .row(row)
            .iter()
            .map(|c| c.as_text().to_lowercase())
            .collect();
        if cells.is_empty() {
            continue;
        }

        let mut columns = ColumnMap::default();
        let mut score = 0u32;
        for (role, keywords) in &rules.roles {
            if let Some(col) = find_column(&cells, keywords) {
                columns.set(role, col);
                score += keywords.weight;
            }
        }

        if columns.get(&rules.anchor).is_none() {
            continue;
        }

        // Strictly-greater keeps the earliest row on ties.
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            best = Some((score, Header { row, columns }));
        }
    }

    best.map(|(_, header)| header)
}

/// First column whose lowercased text contains any high keyword, falling
/// back to the low tier.
fn find_column(cells: &[String], keywords: &RoleKeywords) -> Option<usize> {
    let hit = |tier: &[String]| {
        cells
            .iter()
            .position(|cell| !cell.is_empty() && tier.iter().any(|k| cell.contains(k.as_str())))
    };
    hit(&keywords.high).or_else(|| hit(&keywords.low))
}
