//! `chuyenxe-engine` — normalization and aggregation engine for bus-line
//! spreadsheet exports.
//!
//! Pure engine crate: receives pre-decoded cell matrices, returns aggregated
//! records. No file IO, no persistence, no state between calls.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod extract;
pub mod header;
pub mod matrix;
pub mod model;
pub mod names;
pub mod normalize;
pub mod profile;

pub use error::EngineError;
pub use matrix::{CellValue, RawMatrix, RowsInput};
pub use model::{DailyStat, PhoneStat, PriceStat, SelfStat, TransitStat};
pub use profile::Profile;
