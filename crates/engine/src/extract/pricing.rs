//! Ticket-pricing extraction: route group × unit price × ticket type, with
//! revenue accumulated across merged rows.

use std::collections::BTreeMap;

use crate::aggregate::sort_pricing;
use crate::classify::{route_group, ticket_type};
use crate::header::{infer_header, role};
use crate::matrix::RawMatrix;
use crate::model::PriceStat;
use crate::profile::PricingRules;

use super::{count_from, is_summary, mapped_text};

#[derive(Default)]
struct Acc {
    quantity: f64,
    revenue: f64,
}

pub fn extract_pricing(matrix: &RawMatrix, rules: &PricingRules) -> Vec<PriceStat> {
    let Some(header) = infer_header(matrix, &rules.header) else {
        return Vec::new();
    };
    let cols = &header.columns;

    let mut groups: BTreeMap<(String, i64, &'static str), Acc> = BTreeMap::new();

    for row in header.row + 1..matrix.row_count() {
        if matrix.row_is_blank(row) {
            continue;
        }

        let Some(route) = mapped_text(matrix, row, cols.get(role::ROUTE)) else {
            continue;
        };
        if is_summary(&route, &rules.summary_markers) {
            continue;
        }

        let price = count_from(matrix, row, cols.get(role::PRICE), 0.0);
        // Zero prices and prices above the ceiling are header/footer
        // bleed-through or corrupted cells.
        if price <= 0.0 || price > rules.max_price {
            continue;
        }

        let quantity = count_from(matrix, row, cols.get(role::QUANTITY), 1.0);

        let (group, known) = route_group(&route, &rules.route_pairs);
        let kind = ticket_type(known, price);

        let acc = groups
            .entry((group, price.round() as i64, kind.label()))
            .or_default();
        acc.quantity += quantity;
        acc.revenue += price * quantity;
    }

    let mut stats: Vec<PriceStat> = groups
        .into_iter()
        .map(|((group, price, kind), acc)| PriceStat {
            route_group: group,
            price: price as f64,
            ticket_type: kind.to_string(),
            quantity: acc.quantity,
            revenue: acc.revenue,
        })
        .collect();

    sort_pricing(&mut stats);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::text_matrix;
    use crate::profile::Profile;

    fn rules() -> PricingRules {
        Profile::default().pricing
    }

    #[test]
    fn classifies_known_group_fares() {
        let matrix = text_matrix(&[
            &["Tuyến", "Đơn giá", "Số lượng"],
            &["Thái Nguyên - Mỹ Đình", "90000", "2"],
        ]);
        let stats = extract_pricing(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].route_group, "Thái Nguyên - Mỹ Đình");
        assert_eq!(stats[0].ticket_type, "student_transit");
        assert_eq!(stats[0].quantity, 2.0);
        assert_eq!(stats[0].revenue, 180_000.0);
    }

    #[test]
    fn price_filter_scenarios() {
        let matrix = text_matrix(&[
            &["Tuyến", "Đơn giá"],
            &["Thái Nguyên - Mỹ Đình", "200000"],
            &["Thái Nguyên - Mỹ Đình", "0"],
            &["Thái Nguyên - Mỹ Đình", "90000"],
        ]);
        let stats = extract_pricing(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].price, 90_000.0);
        assert_eq!(stats[0].ticket_type, "student_transit");
    }

    #[test]
    fn both_route_directions_merge() {
        let matrix = text_matrix(&[
            &["Tuyến", "Đơn giá", "Số lượng"],
            &["Thái Nguyên - Mỹ Đình", "100000", "1"],
            &["Mỹ Đình - Thái Nguyên", "100000", "3"],
        ]);
        let stats = extract_pricing(&matrix, &rules());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].quantity, 4.0);
        assert_eq!(stats[0].revenue, 400_000.0);
    }

    #[test]
    fn unknown_route_keeps_own_group_and_loose_rule() {
        let matrix = text_matrix(&[
            &["Tuyến", "Đơn giá"],
            &["Hà Nội - Hải Phòng", "100000"],
            &["Hà Nội - Hải Phòng", "90000"],
        ]);
        let stats = extract_pricing(&matrix, &rules());
        assert_eq!(stats.len(), 2);
        assert!(stats
            .iter()
            .any(|s| s.price == 100_000.0 && s.ticket_type == "regular"));
        assert!(stats
            .iter()
            .any(|s| s.price == 90_000.0 && s.ticket_type == "student"));
    }

    #[test]
    fn revenue_sorts_descending() {
        let matrix = text_matrix(&[
            &["Tuyến", "Đơn giá", "Số lượng"],
            &["Thái Nguyên - Bắc Kạn", "70000", "1"],
            &["Thái Nguyên - Mỹ Đình", "100000", "5"],
        ]);
        let stats = extract_pricing(&matrix, &rules());
        assert_eq!(stats[0].route_group, "Thái Nguyên - Mỹ Đình");
    }
}
