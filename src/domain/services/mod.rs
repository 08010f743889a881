//! # Domain Services
//!
//! Stateless logic that does not belong to a single entity:
//!
//! - [`GeoMatcher`](geo_matcher::GeoMatcher): distance, containment, and
//!   nearest-first ordering
//! - [`SurgeEvaluator`](surge::SurgeEvaluator): zone resolution for a drop
//!   point at an instant

pub mod geo_matcher;
pub mod surge;

pub use geo_matcher::GeoMatcher;
pub use surge::{SurgeCharge, SurgeEvaluator};
