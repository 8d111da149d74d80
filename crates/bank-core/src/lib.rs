//! # Bank Core
//!
//! Domain entities, field validators, repository ports and the account
//! lifecycle, query and authentication services.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod validation;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, ErrorKind, FieldErrors};
