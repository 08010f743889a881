//! # Geospatial Matching
//!
//! Pure geometry used by surge evaluation and agent allocation: great-circle
//! distance, point-in-polygon containment, and radius-bounded nearest-first
//! candidate ordering.
//!
//! # Examples
//!
//! ```
//! use order_dispatch::domain::services::geo_matcher::GeoMatcher;
//! use order_dispatch::domain::value_objects::GeoPoint;
//!
//! let a = GeoPoint::new(77.5946, 12.9716).unwrap();
//! let b = GeoPoint::new(77.6413, 12.9784).unwrap();
//! let d = GeoMatcher::distance_meters(a, b);
//! assert!((4000.0..7000.0).contains(&d));
//! ```

use crate::domain::entities::surge_area::ZoneGeometry;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::GeoPoint;

/// Mean Earth radius in meters, per the haversine convention.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Stateless geospatial operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoMatcher;

impl GeoMatcher {
    /// Great-circle distance between two points in meters (haversine).
    #[must_use]
    pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
        let lat_a = a.lat().to_radians();
        let lat_b = b.lat().to_radians();
        let d_lat = (b.lat() - a.lat()).to_radians();
        let d_lon = (b.lon() - a.lon()).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
    }

    /// Tests whether `point` lies inside the closed polygon `ring` by ray
    /// casting. Points exactly on an edge may land on either side.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGeometry` if the ring has fewer than four
    /// vertices or its last vertex does not repeat the first.
    pub fn point_in_polygon(point: GeoPoint, ring: &[GeoPoint]) -> DomainResult<bool> {
        if ring.len() < 4 {
            return Err(DomainError::invalid_geometry(format!(
                "polygon ring has {} vertices, need at least 4",
                ring.len()
            )));
        }
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        if first != last {
            return Err(DomainError::invalid_geometry(
                "polygon ring is not closed (last vertex must repeat the first)",
            ));
        }

        let (px, py) = (point.lon(), point.lat());
        let mut inside = false;
        // Walk edges of the closed ring; the duplicated closing vertex means
        // windows of two cover every edge exactly once.
        for edge in ring.windows(2) {
            let (x1, y1) = (edge[0].lon(), edge[0].lat());
            let (x2, y2) = (edge[1].lon(), edge[1].lat());
            let crosses = (y1 > py) != (y2 > py);
            if crosses {
                let x_at_py = (x2 - x1) * (py - y1) / (y2 - y1) + x1;
                if px < x_at_py {
                    inside = !inside;
                }
            }
        }
        Ok(inside)
    }

    /// Tests whether `point` lies inside a zone geometry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGeometry` for a malformed polygon ring or
    /// a non-positive circle radius.
    pub fn point_in_zone(point: GeoPoint, geometry: &ZoneGeometry) -> DomainResult<bool> {
        match geometry {
            ZoneGeometry::Polygon { ring } => Self::point_in_polygon(point, ring),
            ZoneGeometry::Circle {
                center,
                radius_meters,
            } => {
                if !radius_meters.is_finite() || *radius_meters <= 0.0 {
                    return Err(DomainError::invalid_geometry(format!(
                        "circle radius must be positive, got {radius_meters}"
                    )));
                }
                Ok(Self::distance_meters(point, *center) <= *radius_meters)
            }
        }
    }

    /// Filters `candidates` to those within `radius_meters` of `origin` and
    /// returns them ordered nearest first, keeping at most `limit`.
    ///
    /// The sort is stable, so candidates at equal distance keep their input
    /// order.
    #[must_use]
    pub fn nearest_within_radius<'a, T>(
        origin: GeoPoint,
        candidates: &'a [T],
        position_of: impl Fn(&T) -> GeoPoint,
        radius_meters: f64,
        limit: usize,
    ) -> Vec<(&'a T, f64)> {
        let mut matched: Vec<(&T, f64)> = candidates
            .iter()
            .map(|c| (c, Self::distance_meters(origin, position_of(c))))
            .filter(|(_, d)| *d <= radius_meters)
            .collect();
        matched.sort_by(|a, b| a.1.total_cmp(&b.1));
        matched.truncate(limit);
        matched
    }
}
