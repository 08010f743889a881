//! # Allocation Settings
//!
//! Operator-editable configuration that selects the allocation method and
//! tunes each strategy. Loadable from a file plus `ORDER_DISPATCH__`
//! environment overrides, or constructed directly in tests.
//!
//! # Examples
//!
//! ```
//! use order_dispatch::application::settings::AllocationSettings;
//!
//! let settings = AllocationSettings::default();
//! assert!(settings.auto_allocation_enabled);
//! assert!(settings.validate().is_ok());
//! ```

use crate::domain::value_objects::AllocationMethod;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for settings loading and validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A value failed a sanity check.
    #[error("invalid settings: {0}")]
    Invalid(String),

    /// Reading or deserializing the source failed.
    #[error("settings load failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Tuning for the nearest-available strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearestAvailableSettings {
    /// Search radius around the restaurant, kilometers.
    pub maximum_radius_km: f64,
    /// How many nearest candidates to try before giving up.
    pub max_candidates: usize,
    /// Break distance ties by rating instead of input order.
    pub prefer_higher_rating: bool,
}

impl Default for NearestAvailableSettings {
    fn default() -> Self {
        Self {
            maximum_radius_km: 5.0,
            max_candidates: 10,
            prefer_higher_rating: false,
        }
    }
}

/// Tuning for the one-by-one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneByOneSettings {
    /// How long each agent has to accept before the offer moves on, seconds.
    pub request_expiry_secs: u64,
    /// How many agents to offer to before escalating.
    pub number_of_retries: u32,
}

impl Default for OneByOneSettings {
    fn default() -> Self {
        Self {
            request_expiry_secs: 30,
            number_of_retries: 3,
        }
    }
}

/// Tuning for the round-robin strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRobinSettings {
    /// Search radius around the restaurant, kilometers.
    pub radius_km: f64,
    /// Per-agent concurrent task cap under this strategy.
    pub max_tasks_allowed: u32,
    /// Prefer rating over least-recently-assigned when loads tie.
    pub prefer_higher_rating: bool,
}

impl Default for RoundRobinSettings {
    fn default() -> Self {
        Self {
            radius_km: 5.0,
            max_tasks_allowed: 3,
            prefer_higher_rating: false,
        }
    }
}

/// The full allocation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    /// Which strategy the engine dispatches to.
    pub method: AllocationMethod,
    /// When false, every order goes to manual assignment.
    pub auto_allocation_enabled: bool,
    /// Default per-agent concurrent task cap, used where a strategy does
    /// not carry its own.
    pub max_tasks_allowed: u32,
    /// Nearest-available tuning.
    pub nearest_available: NearestAvailableSettings,
    /// One-by-one tuning.
    pub one_by_one: OneByOneSettings,
    /// Round-robin tuning.
    pub round_robin: RoundRobinSettings,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            method: AllocationMethod::NearestAvailable,
            auto_allocation_enabled: true,
            max_tasks_allowed: 3,
            nearest_available: NearestAvailableSettings::default(),
            one_by_one: OneByOneSettings::default(),
            round_robin: RoundRobinSettings::default(),
        }
    }
}

impl AllocationSettings {
    /// Loads settings from a file, with `ORDER_DISPATCH__` environment
    /// variables taking precedence (e.g.
    /// `ORDER_DISPATCH__ROUND_ROBIN__RADIUS_KM=8`).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] if the source cannot be read and
    /// [`SettingsError::Invalid`] if loaded values fail validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("ORDER_DISPATCH").separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks every tunable for a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_tasks_allowed == 0 {
            return Err(SettingsError::Invalid(
                "max_tasks_allowed must be at least 1".to_string(),
            ));
        }
        let na = &self.nearest_available;
        if !na.maximum_radius_km.is_finite() || na.maximum_radius_km <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "nearest_available.maximum_radius_km must be positive, got {}",
                na.maximum_radius_km
            )));
        }
        if na.max_candidates == 0 {
            return Err(SettingsError::Invalid(
                "nearest_available.max_candidates must be at least 1".to_string(),
            ));
        }
        if self.one_by_one.request_expiry_secs == 0 {
            return Err(SettingsError::Invalid(
                "one_by_one.request_expiry_secs must be at least 1".to_string(),
            ));
        }
        if self.one_by_one.number_of_retries == 0 {
            return Err(SettingsError::Invalid(
                "one_by_one.number_of_retries must be at least 1".to_string(),
            ));
        }
        let rr = &self.round_robin;
        if !rr.radius_km.is_finite() || rr.radius_km <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "round_robin.radius_km must be positive, got {}",
                rr.radius_km
            )));
        }
        if rr.max_tasks_allowed == 0 {
            return Err(SettingsError::Invalid(
                "round_robin.max_tasks_allowed must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AllocationSettings::default().validate().is_ok());
    }

    #[test]
    fn zero_radius_rejected() {
        let mut settings = AllocationSettings::default();
        settings.nearest_available.maximum_radius_km = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn zero_retries_rejected() {
        let mut settings = AllocationSettings::default();
        settings.one_by_one.number_of_retries = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let json = r#"{"method": "round_robin", "round_robin": {"radius_km": 8.0}}"#;
        let settings: AllocationSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.method, crate::domain::value_objects::AllocationMethod::RoundRobin);
        assert!((settings.round_robin.radius_km - 8.0).abs() < f64::EPSILON);
        // Untouched sections keep their defaults.
        assert_eq!(settings.one_by_one.number_of_retries, 3);
        assert!(settings.auto_allocation_enabled);
    }

    #[test]
    fn serde_roundtrip() {
        let settings = AllocationSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: AllocationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
