//! HTTP error mapping
//!
//! Every failure leaves the API as `{ success: false, message, errors? }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bank_core::{DomainError, ErrorKind, FieldErrors};
use thiserror::Error;

use crate::response::ErrorBody;

pub const MSG_INVALID_CREDENTIALS: &str = "Les informations d'identification sont incorrectes.";
const MSG_UNAUTHENTICATED: &str = "Non authentifié. Token invalide ou expiré.";
const MSG_FORBIDDEN: &str = "Accès refusé. Permissions insuffisantes.";
const MSG_INTERNAL: &str = "Une erreur interne est survenue. Veuillez réessayer plus tard.";
const MSG_RATE_LIMITED: &str = "Trop de requêtes. Veuillez réessayer plus tard.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Malformed body, query string or path.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401 with a message safe to show to the caller.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimited,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Message shown to the caller. Internal details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::Validation { message, .. } => message.clone(),
                DomainError::ClientNotFound(_) => "Le client spécifié n'existe pas.".to_string(),
                DomainError::AccountNotFound(_) => "Compte introuvable.".to_string(),
                DomainError::InvalidCredentials => MSG_INVALID_CREDENTIALS.to_string(),
                DomainError::InvalidToken(_) => MSG_UNAUTHENTICATED.to_string(),
                DomainError::InsufficientRole { .. } => MSG_FORBIDDEN.to_string(),
                DomainError::AccountAlreadyClosed(_) => "Ce compte est déjà fermé.".to_string(),
                DomainError::DuplicateValue(_) => {
                    "Une ressource avec ces informations existe déjà.".to_string()
                }
                DomainError::UnableToGenerateAccountNumber => {
                    "Impossible de générer un numéro de compte unique. Veuillez réessayer.".to_string()
                }
                _ => MSG_INTERNAL.to_string(),
            },
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::RateLimited => MSG_RATE_LIMITED.to_string(),
        }
    }

    fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            ApiError::Domain(e) => e.field_errors().cloned(),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!("Internal error: {}", self),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => tracing::warn!("{}", self),
            StatusCode::TOO_MANY_REQUESTS => {}
            _ => tracing::debug!("Request rejected ({}): {}", status.as_u16(), self),
        }

        let body = Json(ErrorBody {
            success: false,
            message: self.public_message(),
            errors: self.field_errors(),
        });

        (status, body).into_response()
    }
}
