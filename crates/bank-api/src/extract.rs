//! Rejection handling for the built-in extractors
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (and the query/path
//! equivalents) so malformed input is reported in the standard envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use bank_core::DomainError;
use uuid::Uuid;

use crate::error::ApiError;

pub fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ApiError::BadRequest(format!("Corps de requête JSON invalide: {}", rejection.body_text()))
    })
}

pub fn extract_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(value)| value).map_err(|rejection| {
        ApiError::BadRequest(format!("Paramètres de requête invalides: {}", rejection.body_text()))
    })
}

/// A path id that is not a UUID cannot name an account.
pub fn extract_account_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::Domain(DomainError::AccountNotFound("invalid id".to_string())))
}
