//! # Geographic Point
//!
//! Validated `[lon, lat]` coordinate pair.
//!
//! All geometry in the crate (agent positions, restaurant locations, surge
//! zone rings) is expressed as [`GeoPoint`] values; construction rejects
//! out-of-range coordinates so downstream geometry code never revalidates.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate pair, longitude first.
///
/// # Invariants
///
/// - `lon` in `[-180, 180]`
/// - `lat` in `[-90, 90]`
/// - both finite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees.
    lon: f64,
    /// Latitude in degrees.
    lat: f64,
}

impl GeoPoint {
    /// Creates a point with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either component is
    /// non-finite or out of range.
    pub fn new(lon: f64, lat: f64) -> DomainResult<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(DomainError::invalid_coordinates(
                "coordinates must be finite",
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::invalid_coordinates(format!(
                "longitude {lon} out of range [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid_coordinates(format!(
                "latitude {lat} out of range [-90, 90]"
            )));
        }
        Ok(Self { lon, lat })
    }

    /// Returns the longitude in degrees.
    #[inline]
    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Returns the latitude in degrees.
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}
