//! # Surge Area Entity
//!
//! A geofenced zone carrying a time-bounded surge charge. The surge
//! evaluator tests the drop point against each live area's geometry and
//! takes the highest resulting fee.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{GeoPoint, Money, Timestamp, ZoneId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The shape of a surge zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneGeometry {
    /// A closed polygon ring. The last vertex must repeat the first and the
    /// ring needs at least four vertices; validation happens at point-in-zone
    /// time so that a malformed stored zone surfaces as an error, not a
    /// silent miss.
    Polygon {
        /// Ring vertices, first == last when well formed.
        ring: Vec<GeoPoint>,
    },
    /// A circle around a center point.
    Circle {
        /// Circle center.
        center: GeoPoint,
        /// Radius in meters; must be positive.
        radius_meters: f64,
    },
}

/// How the surge amount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeKind {
    /// A fixed fee added to the order.
    Fixed,
    /// A percentage of the cart total.
    Percentage,
}

/// A surge pricing zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeArea {
    id: ZoneId,
    name: String,
    geometry: ZoneGeometry,
    kind: SurgeKind,
    /// Fixed amount, or percentage points for [`SurgeKind::Percentage`].
    value: Decimal,
    starts_at: Timestamp,
    ends_at: Timestamp,
    active: bool,
}

impl SurgeArea {
    /// Creates a surge area with a validated time window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if `starts_at` is not before
    /// `ends_at`, and `DomainError::InvalidAmount` for a negative value.
    pub fn new(
        id: ZoneId,
        name: impl Into<String>,
        geometry: ZoneGeometry,
        kind: SurgeKind,
        value: Decimal,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> DomainResult<Self> {
        if !starts_at.is_before(&ends_at) {
            return Err(DomainError::InvalidTimeWindow(format!(
                "surge window starts at {starts_at}, ends at {ends_at}"
            )));
        }
        if value.is_sign_negative() {
            return Err(DomainError::invalid_amount("surge value must not be negative"));
        }
        Ok(Self {
            id,
            name: name.into(),
            geometry,
            kind,
            value,
            starts_at,
            ends_at,
            active: true,
        })
    }

    /// Sets the activity flag; inactive areas never match.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns the zone id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the zone geometry.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &ZoneGeometry {
        &self.geometry
    }

    /// Returns the surge kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SurgeKind {
        self.kind
    }

    /// Returns true if the area is active and its window covers `at`. The
    /// start is inclusive, the end exclusive.
    #[must_use]
    pub fn is_live_at(&self, at: Timestamp) -> bool {
        self.active && !at.is_before(&self.starts_at) && at.is_before(&self.ends_at)
    }

    /// Computes the fee this area adds for a cart of `cart_total`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn fee_for(&self, cart_total: Money) -> DomainResult<Money> {
        match self.kind {
            SurgeKind::Fixed => Ok(Money::new(self.value)),
            SurgeKind::Percentage => cart_total.percentage_of(self.value),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn window() -> (Timestamp, Timestamp) {
        (
            Timestamp::from_secs(1000).unwrap(),
            Timestamp::from_secs(2000).unwrap(),
        )
    }

    fn circle_area(kind: SurgeKind, value: Decimal) -> SurgeArea {
        let (starts, ends) = window();
        SurgeArea::new(
            ZoneId::new("zone-1"),
            "stadium",
            ZoneGeometry::Circle {
                center: GeoPoint::new(77.6, 12.97).unwrap(),
                radius_meters: 800.0,
            },
            kind,
            value,
            starts,
            ends,
        )
        .unwrap()
    }

    #[test]
    fn window_must_be_ordered() {
        let (starts, ends) = window();
        let result = SurgeArea::new(
            ZoneId::new("zone-1"),
            "bad",
            ZoneGeometry::Circle {
                center: GeoPoint::new(0.0, 0.0).unwrap(),
                radius_meters: 100.0,
            },
            SurgeKind::Fixed,
            Decimal::new(30, 0),
            ends,
            starts,
        );
        assert!(matches!(result, Err(DomainError::InvalidTimeWindow(_))));
    }

    #[test]
    fn negative_value_rejected() {
        let (starts, ends) = window();
        let result = SurgeArea::new(
            ZoneId::new("zone-1"),
            "bad",
            ZoneGeometry::Circle {
                center: GeoPoint::new(0.0, 0.0).unwrap(),
                radius_meters: 100.0,
            },
            SurgeKind::Fixed,
            Decimal::new(-1, 0),
            starts,
            ends,
        );
        assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
    }

    #[test]
    fn inactive_area_is_never_live() {
        let mut area = circle_area(SurgeKind::Fixed, Decimal::new(30, 0));
        area.set_active(false);
        assert!(!area.is_live_at(Timestamp::from_secs(1500).unwrap()));
    }

    #[test]
    fn liveness_is_start_inclusive_end_exclusive() {
        let area = circle_area(SurgeKind::Fixed, Decimal::new(30, 0));
        assert!(area.is_live_at(Timestamp::from_secs(1000).unwrap()));
        assert!(area.is_live_at(Timestamp::from_secs(1999).unwrap()));
        assert!(!area.is_live_at(Timestamp::from_secs(2000).unwrap()));
        assert!(!area.is_live_at(Timestamp::from_secs(999).unwrap()));
    }

    #[test]
    fn fixed_fee_ignores_cart() {
        let area = circle_area(SurgeKind::Fixed, Decimal::new(30, 0));
        assert_eq!(area.fee_for(Money::from_major(1)).unwrap(), Money::from_major(30));
        assert_eq!(
            area.fee_for(Money::from_major(10_000)).unwrap(),
            Money::from_major(30)
        );
    }

    #[test]
    fn percentage_fee_scales_with_cart() {
        let area = circle_area(SurgeKind::Percentage, Decimal::new(10, 0));
        assert_eq!(
            area.fee_for(Money::from_major(460)).unwrap(),
            Money::from_major(46)
        );
    }
}
