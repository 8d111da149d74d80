//! PostgreSQL repository implementations

pub mod account_query_sql;
pub mod account_repo_impl;
pub mod admin_repo_impl;
pub mod client_repo_impl;
pub mod token_repo_impl;

pub use account_repo_impl::PgAccountRepository;
pub use admin_repo_impl::PgAdminRepository;
pub use client_repo_impl::PgClientRepository;
pub use token_repo_impl::PgTokenRepository;

use bank_core::error::DomainError;
use tracing::error;

/// Logs the failure and maps unique violations to a conflict.
pub(crate) fn map_db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);

    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
            return DomainError::DuplicateValue(constraint);
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub(crate) fn corrupt_column(column: &str, value: &str) -> DomainError {
    error!("Unexpected value {:?} in column {}", value, column);
    DomainError::DatabaseError(format!("unexpected value in column {}", column))
}
