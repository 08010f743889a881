//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`OrderId`]: UUID-based order identifier
//! - [`AgentId`], [`RestaurantId`], [`CustomerId`], [`ZoneId`], [`OfferId`]:
//!   string-based identifiers from the external stores
//!
//! ## Numeric and Spatial Types
//!
//! - [`Money`]: decimal amount with checked arithmetic and explicit rounding
//! - [`GeoPoint`]: validated `[lon, lat]` coordinate pair
//! - [`Timestamp`]: injected UTC instant (no ambient clock reads in core
//!   logic)
//!
//! ## Lifecycle Enums
//!
//! - [`AgentStatus`], [`AssignmentStatus`], [`OrderStatus`],
//!   [`PaymentMethod`], [`AllocationMethod`]

pub mod enums;
pub mod geo;
pub mod ids;
pub mod money;
pub mod timestamp;

pub use enums::{AgentStatus, AllocationMethod, AssignmentStatus, OrderStatus, PaymentMethod};
pub use geo::GeoPoint;
pub use ids::{AgentId, CustomerId, OfferId, OrderId, RestaurantId, ZoneId};
pub use money::Money;
pub use timestamp::Timestamp;
