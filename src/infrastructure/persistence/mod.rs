//! # Persistence
//!
//! Repository ports ([`traits`]) and the in-memory implementations
//! ([`in_memory`]).

pub mod in_memory;
pub mod traits;

pub use traits::{
    AgentRepository, OrderRepository, PricingCatalog, RepositoryError, RepositoryResult,
    RestaurantRepository, SettingsRepository,
};
