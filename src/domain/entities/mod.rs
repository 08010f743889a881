//! # Domain Entities
//!
//! Aggregates with identity and lifecycle:
//!
//! - [`Order`](order::Order): cart, price summary, assignment state machine
//! - [`Agent`](agent::Agent): position, load, COD float, optimistic version
//! - [`Restaurant`](restaurant::Restaurant): pickup location and open hours
//! - [`SurgeArea`](surge_area::SurgeArea): geofenced, time-bounded surcharge
//! - [`Offer`](offer::Offer) / [`TaxRule`](offer::TaxRule): pricing inputs

pub mod agent;
pub mod offer;
pub mod order;
pub mod restaurant;
pub mod surge_area;

pub use agent::{Agent, AgentPermissions};
pub use offer::{DiscountKind, Offer, TaxCategory, TaxRule};
pub use order::{LineItem, Order, PriceSummary, RejectionRecord, TaxLine};
pub use restaurant::{OpeningWindow, Restaurant};
pub use surge_area::{SurgeArea, SurgeKind, ZoneGeometry};
