//! `chuyenxe-recon` — VAT reconciliation engine.
//!
//! Pure engine crate: receives two pre-decoded matrices (actual revenue,
//! issued invoices), runs an extraction pass per side, and joins them on the
//! normalized ticket code. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod model;

pub use config::VatConfig;
pub use engine::run;
pub use error::VatError;
pub use model::{VatRecord, VatReport, VatStatus};
