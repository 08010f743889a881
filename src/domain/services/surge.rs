//! # Surge Evaluation
//!
//! Resolves which surge zone, if any, applies to an order's drop point at a
//! given instant. When several live zones contain the point, the one with
//! the highest computed fee wins; a malformed stored zone is skipped with a
//! warning rather than failing the whole order.

use crate::domain::entities::surge_area::SurgeArea;
use crate::domain::services::geo_matcher::GeoMatcher;
use crate::domain::value_objects::{GeoPoint, Money, Timestamp, ZoneId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The surge outcome for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeCharge {
    /// Fee added to the order.
    pub fee: Money,
    /// Zone that produced the fee.
    pub zone_id: ZoneId,
    /// Human-readable zone name, surfaced in the price breakdown.
    pub zone_name: String,
}

/// Stateless surge resolution over a set of configured areas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurgeEvaluator;

impl SurgeEvaluator {
    /// Evaluates surge for a drop point.
    ///
    /// Considers only areas live at `now` whose geometry contains
    /// `drop_point`, and returns the highest fee among them; ties go to the
    /// earliest-listed area. Returns `None` when no zone matches or every
    /// matching zone yields a zero fee computation error.
    #[must_use]
    pub fn evaluate(
        areas: &[SurgeArea],
        drop_point: GeoPoint,
        cart_total: Money,
        now: Timestamp,
    ) -> Option<SurgeCharge> {
        let mut best: Option<SurgeCharge> = None;
        for area in areas {
            if !area.is_live_at(now) {
                continue;
            }
            let contains = match GeoMatcher::point_in_zone(drop_point, area.geometry()) {
                Ok(contains) => contains,
                Err(err) => {
                    warn!(zone = %area.id(), error = %err, "skipping surge zone with bad geometry");
                    continue;
                }
            };
            if !contains {
                continue;
            }
            let fee = match area.fee_for(cart_total) {
                Ok(fee) => fee,
                Err(err) => {
                    warn!(zone = %area.id(), error = %err, "skipping surge zone, fee computation failed");
                    continue;
                }
            };
            let beats_current = match &best {
                Some(current) => fee > current.fee,
                None => true,
            };
            if beats_current {
                best = Some(SurgeCharge {
                    fee,
                    zone_id: area.id().clone(),
                    zone_name: area.name().to_string(),
                });
            }
        }
        best
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::surge_area::{SurgeKind, ZoneGeometry};
    use rust_decimal::Decimal;

    fn live_window() -> (Timestamp, Timestamp) {
        (
            Timestamp::from_secs(1000).unwrap(),
            Timestamp::from_secs(2000).unwrap(),
        )
    }

    fn now() -> Timestamp {
        Timestamp::from_secs(1500).unwrap()
    }

    fn point() -> GeoPoint {
        GeoPoint::new(77.6, 12.97).unwrap()
    }

    fn covering_circle(id: &str, name: &str, fixed_fee: i64) -> SurgeArea {
        let (starts, ends) = live_window();
        SurgeArea::new(
            ZoneId::new(id),
            name,
            ZoneGeometry::Circle {
                center: point(),
                radius_meters: 1000.0,
            },
            SurgeKind::Fixed,
            Decimal::new(fixed_fee, 0),
            starts,
            ends,
        )
        .unwrap()
    }

    #[test]
    fn no_zones_means_no_surge() {
        assert!(SurgeEvaluator::evaluate(&[], point(), Money::from_major(500), now()).is_none());
    }

    #[test]
    fn zone_outside_window_is_ignored() {
        let area = covering_circle("zone-1", "stadium", 30);
        let late = Timestamp::from_secs(3000).unwrap();
        assert!(SurgeEvaluator::evaluate(&[area], point(), Money::from_major(500), late).is_none());
    }

    #[test]
    fn zone_not_containing_point_is_ignored() {
        let area = covering_circle("zone-1", "stadium", 30);
        let elsewhere = GeoPoint::new(70.0, 20.0).unwrap();
        assert!(
            SurgeEvaluator::evaluate(&[area], elsewhere, Money::from_major(500), now()).is_none()
        );
    }

    #[test]
    fn highest_fee_wins_among_matches() {
        let low = covering_circle("zone-1", "low", 20);
        let high = covering_circle("zone-2", "high", 50);
        let charge =
            SurgeEvaluator::evaluate(&[low, high], point(), Money::from_major(500), now()).unwrap();
        assert_eq!(charge.fee, Money::from_major(50));
        assert_eq!(charge.zone_id.as_str(), "zone-2");
        assert_eq!(charge.zone_name, "high");
    }

    #[test]
    fn tie_goes_to_first_listed() {
        let first = covering_circle("zone-1", "first", 30);
        let second = covering_circle("zone-2", "second", 30);
        let charge =
            SurgeEvaluator::evaluate(&[first, second], point(), Money::from_major(500), now())
                .unwrap();
        assert_eq!(charge.zone_id.as_str(), "zone-1");
    }

    #[test]
    fn percentage_zone_can_beat_fixed_zone() {
        let (starts, ends) = live_window();
        let pct = SurgeArea::new(
            ZoneId::new("zone-pct"),
            "pct",
            ZoneGeometry::Circle {
                center: point(),
                radius_meters: 1000.0,
            },
            SurgeKind::Percentage,
            Decimal::new(10, 0),
            starts,
            ends,
        )
        .unwrap();
        let fixed = covering_circle("zone-fixed", "fixed", 30);
        // 10% of 500 = 50 > 30.
        let charge =
            SurgeEvaluator::evaluate(&[fixed, pct], point(), Money::from_major(500), now()).unwrap();
        assert_eq!(charge.fee, Money::from_major(50));
        assert_eq!(charge.zone_id.as_str(), "zone-pct");
    }

    #[test]
    fn malformed_zone_is_skipped_not_fatal() {
        let (starts, ends) = live_window();
        let broken = SurgeArea::new(
            ZoneId::new("zone-broken"),
            "broken",
            ZoneGeometry::Polygon {
                ring: vec![point(), point()],
            },
            SurgeKind::Fixed,
            Decimal::new(100, 0),
            starts,
            ends,
        )
        .unwrap();
        let good = covering_circle("zone-good", "good", 25);
        let charge =
            SurgeEvaluator::evaluate(&[broken, good], point(), Money::from_major(500), now())
                .unwrap();
        assert_eq!(charge.zone_id.as_str(), "zone-good");
    }
}
