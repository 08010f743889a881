//! # Repository Ports
//!
//! Async traits the application layer depends on; storage backends implement
//! them. The crate ships in-memory implementations for tests and local runs.
//!
//! Agent updates use optimistic concurrency: callers pass the version they
//! read, and a mismatched stored version fails with
//! [`RepositoryError::VersionConflict`] instead of overwriting a concurrent
//! writer.

use crate::application::settings::AllocationSettings;
use crate::domain::entities::{Agent, Offer, Order, Restaurant, SurgeArea, TaxRule};
use crate::domain::value_objects::{AgentId, GeoPoint, OrderId, RestaurantId};
use async_trait::async_trait;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Insert collided with an existing record.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Optimistic concurrency check failed.
    #[error("version conflict: expected {expected}, stored {actual}")]
    VersionConflict {
        /// Version the caller read.
        expected: u64,
        /// Version actually stored.
        actual: u64,
    },

    /// Backend failure (connection, serialization, ...).
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(what: impl Into<String>) -> Self {
        Self::Duplicate(what.into())
    }

    /// Returns true for version conflicts, the signal to re-read and retry.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage port for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a new order.
    async fn insert(&self, order: Order) -> RepositoryResult<()>;

    /// Finds an order by id.
    async fn find(&self, id: OrderId) -> RepositoryResult<Order>;

    /// Replaces a stored order.
    async fn update(&self, order: Order) -> RepositoryResult<()>;
}

/// Storage port for delivery agents.
#[async_trait]
pub trait AgentRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a new agent.
    async fn insert(&self, agent: Agent) -> RepositoryResult<()>;

    /// Finds an agent by id.
    async fn find(&self, id: &AgentId) -> RepositoryResult<Agent>;

    /// Returns every agent in a workable status.
    async fn find_available(&self) -> RepositoryResult<Vec<Agent>>;

    /// Returns workable agents within `radius_meters` of `origin`, unordered.
    async fn find_within_radius(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
    ) -> RepositoryResult<Vec<Agent>>;

    /// Compare-and-swap update.
    ///
    /// Succeeds only when the stored version equals `expected_version`; the
    /// racing loser gets [`RepositoryError::VersionConflict`] and must
    /// re-read before retrying.
    async fn update(&self, agent: Agent, expected_version: u64) -> RepositoryResult<()>;
}

/// Storage port for restaurants.
#[async_trait]
pub trait RestaurantRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a new restaurant.
    async fn insert(&self, restaurant: Restaurant) -> RepositoryResult<()>;

    /// Finds a restaurant by id.
    async fn find(&self, id: &RestaurantId) -> RepositoryResult<Restaurant>;
}

/// Read port for pricing configuration: offers, tax rules, surge zones.
#[async_trait]
pub trait PricingCatalog: Send + Sync + std::fmt::Debug {
    /// Returns the configured offers.
    async fn offers(&self) -> RepositoryResult<Vec<Offer>>;

    /// Returns the configured tax rules.
    async fn tax_rules(&self) -> RepositoryResult<Vec<TaxRule>>;

    /// Returns the configured surge areas.
    async fn surge_areas(&self) -> RepositoryResult<Vec<SurgeArea>>;
}

/// Read port for allocation settings.
///
/// Settings are operator-editable at runtime, so the engine re-reads them on
/// every allocation attempt rather than caching at startup.
#[async_trait]
pub trait SettingsRepository: Send + Sync + std::fmt::Debug {
    /// Returns the current allocation settings.
    async fn load(&self) -> RepositoryResult<AllocationSettings>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_conflict_classification() {
        let err = RepositoryError::VersionConflict {
            expected: 3,
            actual: 4,
        };
        assert!(err.is_version_conflict());
        assert!(!RepositoryError::not_found("agent-1").is_version_conflict());
    }

    #[test]
    fn display_carries_versions() {
        let err = RepositoryError::VersionConflict {
            expected: 3,
            actual: 4,
        };
        let text = err.to_string();
        assert!(text.contains('3'));
        assert!(text.contains('4'));
    }
}
