//! # Application Errors
//!
//! The error type use cases return: domain violations and repository
//! failures bubble up via `From`, plus the failure modes only the
//! application layer can detect.

use crate::application::settings::SettingsError;
use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Error type for application services.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Every CAS retry lost its race; the caller should re-run allocation.
    #[error("concurrency retries exhausted after {attempts} attempts")]
    ConcurrencyExhausted {
        /// How many candidate commits were attempted.
        attempts: u32,
    },
}

impl From<SettingsError> for ApplicationError {
    fn from(err: SettingsError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl ApplicationError {
    /// Returns true if retrying the whole operation could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyExhausted { .. }
                | Self::Repository(RepositoryError::VersionConflict { .. })
                | Self::Repository(RepositoryError::Storage(_))
        )
    }
}

/// Result type for application services.
pub type AppResult<T> = Result<T, ApplicationError>;
