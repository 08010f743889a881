//! # Restaurant Entity
//!
//! Pickup-side participant: location for distance math, opening hours, and
//! the activity flags that gate allocation.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{GeoPoint, RestaurantId, Timestamp, ZoneId};
use serde::{Deserialize, Serialize};

/// A daily opening window in minutes-of-day, `open..close` exclusive of the
/// closing minute. Overnight windows (close < open) wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningWindow {
    /// Opening minute, 0..=1439.
    open: u32,
    /// Closing minute, 0..=1439.
    close: u32,
}

impl OpeningWindow {
    /// Creates a window from opening and closing minutes of the day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if either bound exceeds 1439
    /// or the window is empty.
    pub fn new(open: u32, close: u32) -> DomainResult<Self> {
        if open > 1439 || close > 1439 {
            return Err(DomainError::InvalidTimeWindow(format!(
                "minutes must be 0..=1439, got {open}..{close}"
            )));
        }
        if open == close {
            return Err(DomainError::InvalidTimeWindow(
                "opening window must not be empty".to_string(),
            ));
        }
        Ok(Self { open, close })
    }

    /// Returns true if `minute` falls inside the window.
    #[must_use]
    pub fn contains(&self, minute: u32) -> bool {
        if self.open < self.close {
            (self.open..self.close).contains(&minute)
        } else {
            // Overnight: e.g. 22:00..02:00.
            minute >= self.open || minute < self.close
        }
    }
}

/// A restaurant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    id: RestaurantId,
    name: String,
    location: GeoPoint,
    /// Daily windows; empty means always open.
    opening_windows: Vec<OpeningWindow>,
    /// Zones this restaurant delivers to; empty means unrestricted.
    service_areas: Vec<ZoneId>,
    /// Manually toggled by the merchant or operations.
    active: bool,
    /// When true, opening windows are enforced automatically.
    auto_on_off: bool,
}

impl Restaurant {
    /// Creates a restaurant.
    #[must_use]
    pub fn new(
        id: RestaurantId,
        name: impl Into<String>,
        location: GeoPoint,
        opening_windows: Vec<OpeningWindow>,
        service_areas: Vec<ZoneId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            opening_windows,
            service_areas,
            active: true,
            auto_on_off: true,
        }
    }

    /// Returns the restaurant id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RestaurantId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pickup location.
    #[inline]
    #[must_use]
    pub fn location(&self) -> GeoPoint {
        self.location
    }

    /// Returns the serviced zones; empty means unrestricted.
    #[inline]
    #[must_use]
    pub fn service_areas(&self) -> &[ZoneId] {
        &self.service_areas
    }

    /// Returns the manual activity flag.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the manual activity flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Sets whether opening windows are enforced automatically.
    pub fn set_auto_on_off(&mut self, auto: bool) {
        self.auto_on_off = auto;
    }

    /// Returns true if the restaurant can receive orders at `at`.
    ///
    /// The manual flag always applies. Opening windows only apply when
    /// `auto_on_off` is set; with no windows configured the restaurant is
    /// treated as always open.
    #[must_use]
    pub fn is_open_at(&self, at: Timestamp) -> bool {
        if !self.active {
            return false;
        }
        if !self.auto_on_off || self.opening_windows.is_empty() {
            return true;
        }
        let minute = at.minute_of_day();
        self.opening_windows.iter().any(|w| w.contains(minute))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at_minute(minute: u32) -> Timestamp {
        Timestamp::from_secs(i64::from(minute) * 60).unwrap()
    }

    fn restaurant(windows: Vec<OpeningWindow>) -> Restaurant {
        Restaurant::new(
            RestaurantId::new("rest-1"),
            "Udupi Grand",
            GeoPoint::new(77.6, 12.97).unwrap(),
            windows,
            vec![],
        )
    }

    mod windows {
        use super::*;

        #[test]
        fn daytime_window() {
            let w = OpeningWindow::new(9 * 60, 22 * 60).unwrap();
            assert!(w.contains(12 * 60));
            assert!(!w.contains(8 * 60));
            assert!(!w.contains(22 * 60));
        }

        #[test]
        fn overnight_window_wraps() {
            let w = OpeningWindow::new(22 * 60, 2 * 60).unwrap();
            assert!(w.contains(23 * 60));
            assert!(w.contains(60));
            assert!(!w.contains(12 * 60));
        }

        #[test]
        fn invalid_bounds_rejected() {
            assert!(OpeningWindow::new(1500, 100).is_err());
            assert!(OpeningWindow::new(600, 600).is_err());
        }
    }

    mod gating {
        use super::*;

        #[test]
        fn inactive_restaurant_is_closed() {
            let mut r = restaurant(vec![]);
            r.set_active(false);
            assert!(!r.is_open_at(at_minute(720)));
        }

        #[test]
        fn no_windows_means_always_open() {
            let r = restaurant(vec![]);
            assert!(r.is_open_at(at_minute(180)));
        }

        #[test]
        fn windows_enforced_when_auto() {
            let r = restaurant(vec![OpeningWindow::new(9 * 60, 22 * 60).unwrap()]);
            assert!(r.is_open_at(at_minute(12 * 60)));
            assert!(!r.is_open_at(at_minute(3 * 60)));
        }

        #[test]
        fn windows_ignored_when_auto_disabled() {
            let mut r = restaurant(vec![OpeningWindow::new(9 * 60, 22 * 60).unwrap()]);
            r.set_auto_on_off(false);
            assert!(r.is_open_at(at_minute(3 * 60)));
        }
    }
}
