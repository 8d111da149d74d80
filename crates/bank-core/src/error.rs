//! Domain errors

use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → messages, serialised as the `errors` object of a failure envelope.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Coarse taxonomy every [`DomainError`] maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    Internal,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Role '{actual}' cannot access a route reserved to '{required}'")]
    InsufficientRole { required: String, actual: String },

    #[error("Account already closed: {0}")]
    AccountAlreadyClosed(String),

    #[error("Duplicate value for {0}")]
    DuplicateValue(String),

    #[error("Unable to generate a unique account number")]
    UnableToGenerateAccountNumber,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        DomainError::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.clone()]);
        DomainError::Validation { message, errors }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::ClientNotFound(_) | DomainError::AccountNotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidCredentials | DomainError::InvalidToken(_) => ErrorKind::Unauthorized,
            DomainError::InsufficientRole { .. } => ErrorKind::Forbidden,
            DomainError::AccountAlreadyClosed(_)
            | DomainError::DuplicateValue(_)
            | DomainError::UnableToGenerateAccountNumber => ErrorKind::Conflict,
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => ErrorKind::Internal,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            DomainError::Validation { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }
}
