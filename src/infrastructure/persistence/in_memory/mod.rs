//! # In-Memory Persistence
//!
//! HashMap-backed repository implementations behind `tokio::sync::RwLock`,
//! used by the test suite and local development.

pub mod agent_repository;
pub mod order_repository;
pub mod pricing_catalog;
pub mod restaurant_repository;
pub mod settings_repository;

pub use agent_repository::InMemoryAgentRepository;
pub use order_repository::InMemoryOrderRepository;
pub use pricing_catalog::InMemoryPricingCatalog;
pub use restaurant_repository::InMemoryRestaurantRepository;
pub use settings_repository::InMemorySettingsRepository;
