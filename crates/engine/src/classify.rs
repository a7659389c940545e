//! Route grouping and ticket-type classification for pricing rows.

use serde::Deserialize;

use crate::normalize::identity_key;

/// A bidirectional route-name pair. A route string mentioning both endpoints
/// — in either direction, any spelling of the diacritics — collapses to
/// `label`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoutePair {
    pub a: String,
    pub b: String,
    pub label: String,
}

/// Canonical route group for a raw route string. Unmatched routes keep their
/// trimmed raw name as their own group.
pub fn route_group(route: &str, pairs: &[RoutePair]) -> (String, bool) {
    let key = identity_key(route);
    for pair in pairs {
        if key.contains(&identity_key(&pair.a)) && key.contains(&identity_key(&pair.b)) {
            return (pair.label.clone(), true);
        }
    }
    (route.trim().to_string(), false)
}

// ---------------------------------------------------------------------------
// Ticket types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketType {
    /// Through-ticket rider using the transit shuttle/taxi leg.
    TransitRider,
    /// Student fare including the transit leg.
    StudentTransit,
    /// Student fare without transit.
    Student,
    Regular,
}

impl TicketType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TransitRider => "transit_rider",
            Self::StudentTransit => "student_transit",
            Self::Student => "student",
            Self::Regular => "regular",
        }
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed price→type table. Inside a known route group the full fare ladder
/// applies; outside it only the student prices are recognizable.
pub fn ticket_type(in_known_group: bool, price: f64) -> TicketType {
    let price = price.round() as i64;
    if in_known_group {
        match price {
            100_000 => TicketType::TransitRider,
            90_000 => TicketType::StudentTransit,
            70_000 => TicketType::Student,
            _ => TicketType::Regular,
        }
    } else {
        match price {
            90_000 | 70_000 => TicketType::Student,
            _ => TicketType::Regular,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<RoutePair> {
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

    #[test]
    fn both_directions_collapse() {
        let (g1, known1) = route_group("Thái Nguyên - Mỹ Đình", &pairs());
        let (g2, known2) = route_group("My Dinh -> Thai Nguyen", &pairs());
        assert_eq!(g1, "Thái Nguyên - Mỹ Đình");
        assert_eq!(g1, g2);
        assert!(known1 && known2);
    }

    #[test]
    fn unknown_route_keeps_raw_name() {
        let (group, known) = route_group("  Hà Nội - Hải Phòng ", &pairs());
        assert_eq!(group, "Hà Nội - Hải Phòng");
        assert!(!known);
    }

    #[test]
    fn fare_ladder_in_group() {
        assert_eq!(ticket_type(true, 100_000.0), TicketType::TransitRider);
        assert_eq!(ticket_type(true, 90_000.0), TicketType::StudentTransit);
        assert_eq!(ticket_type(true, 70_000.0), TicketType::Student);
        assert_eq!(ticket_type(true, 80_000.0), TicketType::Regular);
    }

    #[test]
    fn loose_rule_outside_group() {
        assert_eq!(ticket_type(false, 90_000.0), TicketType::Student);
        assert_eq!(ticket_type(false, 70_000.0), TicketType::Student);
        assert_eq!(ticket_type(false, 100_000.0), TicketType::Regular);
    }
}
