use chuyenxe_engine::matrix::RawMatrix;

use crate::config::VatConfig;
use crate::extract::extract_side;
use crate::matcher::{compute_summary, reconcile};
use crate::model::{VatMeta, VatReport};

/// Run the reconciliation: one extraction pass per side, then the join.
///
/// The two passes read disjoint inputs and share nothing; a caller may run
/// them concurrently without changing the result.
pub fn run(real: &RawMatrix, invoice: &RawMatrix, config: &VatConfig) -> VatReport {
    let real_side = extract_side(real, &config.real);
    let invoice_side = extract_side(invoice, &config.invoice);

    let records = reconcile(&real_side, &invoice_side, config.tolerance);
    let summary = compute_summary(&records);

    VatReport {
        meta: VatMeta {
            config_name: config.name.clone(),
            tolerance: config.tolerance,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        summary,
        records,
    }
}
