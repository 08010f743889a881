//! # order-dispatch
//!
//! Core engine for a food-delivery marketplace: order pricing and
//! delivery-agent task allocation.
//!
//! ## Architecture
//!
//! Three layers, dependencies pointing inward:
//!
//! - [`domain`]: value objects, entities, and pure services (geometry,
//!   surge resolution). No I/O, no ambient clock.
//! - [`application`]: the pricing and allocation use cases plus their
//!   configuration. Talks to the outside world only through ports.
//! - [`infrastructure`]: repository and notification ports with in-memory
//!   implementations for tests and local runs.
//!
//! ## Pricing
//!
//! [`application::services::PricingEngine`] computes an auditable breakdown
//! in one fixed sequence: cart total, best offer, coupon, taxable amount,
//! independent taxes, distance-based delivery fee, surge, tip, final total,
//! and an informational revenue share. Intermediate math keeps full decimal
//! precision; rounding happens once at emission.
//!
//! ## Allocation
//!
//! [`application::services::AllocationEngine`] runs one allocation attempt
//! per call: it re-reads the operator settings, ranks candidates through the
//! configured strategy (nearest-available, one-by-one, round-robin), bounds
//! acceptance waits with a timeout, and commits the winning agent through an
//! optimistic compare-and-swap so concurrent attempts can never double-book.
//! Every non-assigned path parks the order for retry or manual dispatch.

pub mod application;
pub mod domain;
pub mod infrastructure;
