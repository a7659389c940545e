//! Full outer join of the two sides plus classification.

use std::collections::BTreeSet;

use crate::model::{SideMap, VatRecord, VatStatus, VatSummary};

/// Join both sides on the normalized ticket code and classify every key.
///
/// Every code present on either side appears exactly once in the output.
/// Non-MATCH records sort first (ascending by code) so exceptions lead the
/// report; MATCH records follow.
pub fn reconcile(real: &SideMap, invoice: &SideMap, tolerance: f64) -> Vec<VatRecord> {
    let keys: BTreeSet<&String> = real.keys().chain(invoice.keys()).collect();

    let mut records: Vec<VatRecord> = keys
        .into_iter()
        .map(|key| match (real.get(key), invoice.get(key)) {
            (Some(r), Some(i)) => {
                let status = if (r.amount - i.amount).abs() <= tolerance {
                    VatStatus::Match
                } else {
                    VatStatus::PriceMismatch
                };
                VatRecord {
                    code: r.display_code.clone(),
                    date: best_date(&r.date, &i.date),
                    real_amount: r.amount,
                    invoice_amount: i.amount,
                    invoiced: true,
                    status,
                }
            }
            (Some(r), None) => VatRecord {
                code: r.display_code.clone(),
                date: r.date.clone(),
                real_amount: r.amount,
                invoice_amount: 0.0,
                invoiced: false,
                status: VatStatus::MissingInvoice,
            },
            (None, Some(i)) => VatRecord {
                code: i.display_code.clone(),
                date: i.date.clone(),
                real_amount: 0.0,
                invoice_amount: i.amount,
                invoiced: true,
                status: VatStatus::ExtraInvoice,
            },
            // keys come from the two maps, one side always exists
            (None, None) => unreachable!("key from neither side"),
        })
        .collect();

    records.sort_by(|a, b| {
        a.status
            .is_match()
            .cmp(&b.status.is_match())
            .then_with(|| a.code.cmp(&b.code))
    });

    records
}

fn best_date(real: &str, invoice: &str) -> String {
    if real.is_empty() { invoice } else { real }.to_string()
}

/// Count records per status.
pub fn compute_summary(records: &[VatRecord]) -> VatSummary {
    let mut summary = VatSummary {
        total: records.len(),
        ..VatSummary::default()
    };

    for record in records {
        match record.status {
            VatStatus::Match => summary.matched += 1,
            VatStatus::PriceMismatch => summary.price_mismatches += 1,
            VatStatus::MissingInvoice => summary.missing_invoices += 1,
            VatStatus::ExtraInvoice => summary.extra_invoices += 1,
        }
    }

    summary
}
