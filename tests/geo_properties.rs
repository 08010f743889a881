//! Property tests for the geometry primitives.

#![allow(clippy::unwrap_used)]

use order_dispatch::domain::entities::surge_area::ZoneGeometry;
use order_dispatch::domain::services::GeoMatcher;
use order_dispatch::domain::value_objects::GeoPoint;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = (f64, f64)> {
    // Stay away from the poles and the antimeridian, where haversine
    // distances are legitimate but polygon math over lon/lat is not.
    (-170.0f64..170.0, -80.0f64..80.0)
}

proptest! {
    #[test]
    fn distance_is_symmetric_and_non_negative(a in coord(), b in coord()) {
        let pa = GeoPoint::new(a.0, a.1).unwrap();
        let pb = GeoPoint::new(b.0, b.1).unwrap();
        let ab = GeoMatcher::distance_meters(pa, pb);
        let ba = GeoMatcher::distance_meters(pb, pa);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero(a in coord()) {
        let p = GeoPoint::new(a.0, a.1).unwrap();
        prop_assert_eq!(GeoMatcher::distance_meters(p, p), 0.0);
    }

    #[test]
    fn circle_membership_agrees_with_distance(
        center in coord(),
        point in coord(),
        radius in 1.0f64..2_000_000.0,
    ) {
        let c = GeoPoint::new(center.0, center.1).unwrap();
        let p = GeoPoint::new(point.0, point.1).unwrap();
        let geometry = ZoneGeometry::Circle { center: c, radius_meters: radius };
        let inside = GeoMatcher::point_in_zone(p, &geometry).unwrap();
        prop_assert_eq!(inside, GeoMatcher::distance_meters(p, c) <= radius);
    }

    #[test]
    fn nearest_results_are_sorted_and_within_radius(
        origin in coord(),
        points in prop::collection::vec(coord(), 0..20),
        radius in 1_000.0f64..500_000.0,
        limit in 0usize..10,
    ) {
        let origin = GeoPoint::new(origin.0, origin.1).unwrap();
        let candidates: Vec<GeoPoint> = points
            .into_iter()
            .map(|(lon, lat)| GeoPoint::new(lon, lat).unwrap())
            .collect();
        let result =
            GeoMatcher::nearest_within_radius(origin, &candidates, |p| *p, radius, limit);
        prop_assert!(result.len() <= limit);
        for window in result.windows(2) {
            prop_assert!(window[0].1 <= window[1].1);
        }
        for (_, d) in &result {
            prop_assert!(*d <= radius);
        }
    }

    #[test]
    fn square_around_point_contains_it(center in coord()) {
        let (lon, lat) = center;
        let ring = vec![
            GeoPoint::new(lon - 0.5, lat - 0.5).unwrap(),
            GeoPoint::new(lon + 0.5, lat - 0.5).unwrap(),
            GeoPoint::new(lon + 0.5, lat + 0.5).unwrap(),
            GeoPoint::new(lon - 0.5, lat + 0.5).unwrap(),
            GeoPoint::new(lon - 0.5, lat - 0.5).unwrap(),
        ];
        let p = GeoPoint::new(lon, lat).unwrap();
        prop_assert!(GeoMatcher::point_in_polygon(p, &ring).unwrap());
    }
}
