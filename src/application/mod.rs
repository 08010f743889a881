//! # Application Layer
//!
//! Use cases orchestrating the domain over the infrastructure ports, plus
//! the configuration they run under.

pub mod error;
pub mod services;
pub mod settings;

pub use error::{AppResult, ApplicationError};
