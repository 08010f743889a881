//! # Infrastructure Layer
//!
//! Ports to the outside world and their in-memory implementations:
//! persistence ([`persistence`]) and outbound notifications
//! ([`notification`]).

pub mod notification;
pub mod persistence;
