//! # Domain Layer
//!
//! Pure business types and logic: value objects, entities, and stateless
//! domain services. Nothing in this layer performs I/O or reads the clock.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
