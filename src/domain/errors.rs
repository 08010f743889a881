//! # Domain Errors
//!
//! Error types for domain-level validation and invariant violations.
//!
//! Every domain error is raised before any mutation takes place, so a
//! `DomainError` never implies partial state.

use std::fmt;
use thiserror::Error;

/// Error type for domain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Geometry is structurally invalid (open ring, too few vertices).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Coordinates outside valid latitude/longitude ranges.
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Monetary amount violates a constraint.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Quantity violates a constraint.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Rating outside the allowed range.
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    /// A time window whose start is not before its end.
    #[error("invalid time window: {0}")]
    InvalidTimeWindow(String),

    /// An entity state transition that the state machine forbids.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// State the entity was in.
        from: String,
        /// State the transition targeted.
        to: String,
    },

    /// A required pricing input was absent.
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// Checked arithmetic failed (overflow or division by zero).
    #[error("arithmetic failure: {0}")]
    Arithmetic(&'static str),
}

impl DomainError {
    /// Creates an invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Creates an invalid coordinates error.
    #[must_use]
    pub fn invalid_coordinates(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinates(msg.into())
    }

    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Creates an invalid state transition error.
    #[must_use]
    pub fn invalid_transition(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns true if this is a validation-class error (anything except
    /// arithmetic failures).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Arithmetic(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = DomainError::invalid_geometry("ring has 2 vertices");
        assert!(err.to_string().contains("invalid geometry"));
        assert!(err.to_string().contains("2 vertices"));
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = DomainError::invalid_transition("NotAssigned", "Accepted");
        assert!(err.to_string().contains("NotAssigned"));
        assert!(err.to_string().contains("Accepted"));
    }

    #[test]
    fn validation_classification() {
        assert!(DomainError::invalid_amount("negative").is_validation());
        assert!(!DomainError::Arithmetic("overflow").is_validation());
    }
}
