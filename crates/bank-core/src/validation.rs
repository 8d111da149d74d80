//! Field validators for Senegalese phone numbers and national ID (NCI) numbers.
//!
//! Both are pure functions returning the canonical value on success, so the
//! create flow (field required) and the update flow (field optional, validated
//! when present) share them.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::ValidationErrors;

use crate::error::FieldErrors;

/// `+221` / `221` / local prefix, then an operator digit (Orange, Free, Expresso), then 7 digits.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+221|221)?7[05678]\d{7}$").expect("valid phone regex"));

const COUNTRY_CODE: &str = "+221";
const LOCAL_PHONE_LENGTH: usize = 9;
const NATIONAL_ID_LENGTH: usize = 13;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{0}")]
    InvalidFormat(&'static str),
}

/// Returns the number in its stored form, `+221` followed by the 9 local digits,
/// whichever of the accepted shapes was given.
pub fn validate_phone(raw: &str) -> Result<String, FormatError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::InvalidFormat(
            "Le numéro de téléphone doit contenir uniquement des chiffres.",
        ));
    }

    if !PHONE_PATTERN.is_match(&cleaned) {
        return Err(FormatError::InvalidFormat(
            "Le numéro de téléphone doit être un numéro sénégalais valide (Orange, Free ou Expresso).",
        ));
    }

    let local = &cleaned[cleaned.len() - LOCAL_PHONE_LENGTH..];
    Ok(format!("{}{}", COUNTRY_CODE, local))
}

pub fn validate_national_id(raw: &str) -> Result<String, FormatError> {
    let value = raw.trim();

    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::InvalidFormat(
            "Le numéro NCI doit être composé uniquement de chiffres.",
        ));
    }
    if value.len() != NATIONAL_ID_LENGTH {
        return Err(FormatError::InvalidFormat(
            "Le numéro NCI doit contenir exactement 13 chiffres.",
        ));
    }
    if !value.starts_with(['1', '2']) {
        return Err(FormatError::InvalidFormat(
            "Le numéro NCI doit commencer par 1 ou 2.",
        ));
    }

    Ok(value.to_string())
}

/// Maps a domain field name to the name clients see in payloads and error maps.
pub fn wire_name(field: &str) -> &str {
    match field {
        "last_name" => "nom",
        "first_name" => "prenom",
        "email" => "email",
        "phone" => "telephone",
        "national_id" => "nci",
        "address" => "adresse",
        "holder" => "titulaire",
        "account_type" => "type",
        "initial_balance" => "soldeInitial",
        "currency" => "devise",
        other => other,
    }
}

pub fn push_error(errors: &mut FieldErrors, prefix: &str, field: &str, message: impl Into<String>) {
    errors
        .entry(format!("{}{}", prefix, wire_name(field)))
        .or_default()
        .push(message.into());
}

/// Folds `validator` derive output into the API error map.
pub fn merge_validation_errors(errors: &mut FieldErrors, prefix: &str, source: &ValidationErrors) {
    for (field, field_errors) in source.field_errors() {
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            push_error(errors, prefix, &field, message);
        }
    }
}
