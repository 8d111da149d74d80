// ============================================================================
// Bank Core - Client Entity
// File: crates/bank-core/src/domain/client.rs
// Description: Account holder entity and its editable field set
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, FieldErrors};
use crate::validation::{merge_validation_errors, push_error, validate_national_id, validate_phone};

/// Account holder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    /// Canonical form, whitespace and hyphens stripped
    pub phone: String,
    pub national_id: String,
    pub address: String,

    #[serde(skip_serializing)]
    pub temp_password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

/// Fields a client can be created or edited with. Every field is optional so the
/// same type serves the create flow (all required) and the update flow (any subset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ClientFields {
    #[validate(length(min = 2, max = 255, message = "Le nom doit contenir entre 2 et 255 caractères."))]
    pub last_name: Option<String>,

    #[validate(length(min = 2, max = 255, message = "Le prénom doit contenir entre 2 et 255 caractères."))]
    pub first_name: Option<String>,

    #[validate(email(message = "L'email doit être une adresse email valide."))]
    #[validate(length(max = 255, message = "L'email ne doit pas dépasser 255 caractères."))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub national_id: Option<String>,

    #[validate(length(min = 5, max = 500, message = "L'adresse doit contenir entre 5 et 500 caractères."))]
    pub address: Option<String>,
}

/// Unique column that is already held by another client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Phone,
    NationalId,
}

impl UniqueField {
    pub fn field_name(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
            UniqueField::NationalId => "national_id",
        }
    }

    pub fn taken_message(&self) -> &'static str {
        match self {
            UniqueField::Email => "Cet email est déjà utilisé.",
            UniqueField::Phone => "Ce numéro de téléphone est déjà utilisé.",
            UniqueField::NationalId => "Ce numéro NCI est déjà utilisé.",
        }
    }
}

/// Either an existing client id or the data needed to create one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientReference {
    pub id: Option<String>,
    pub fields: ClientFields,
}

impl ClientFields {
    /// Trims every value; blank values become `None`.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            last_name: clean(&self.last_name),
            first_name: clean(&self.first_name),
            email: clean(&self.email),
            phone: clean(&self.phone),
            national_id: clean(&self.national_id),
            address: clean(&self.address),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.national_id.is_none()
            && self.address.is_none()
    }

    /// Domain names of the fields that are absent.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.last_name.is_none() {
            missing.push("last_name");
        }
        if self.first_name.is_none() {
            missing.push("first_name");
        }
        if self.email.is_none() {
            missing.push("email");
        }
        if self.phone.is_none() {
            missing.push("phone");
        }
        if self.national_id.is_none() {
            missing.push("national_id");
        }
        if self.address.is_none() {
            missing.push("address");
        }
        missing
    }

    /// Validates every present field and returns a copy holding canonical values
    /// (stripped phone, lower-cased email). Error keys are prefixed with `prefix`.
    pub fn checked(&self, prefix: &str) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            merge_validation_errors(&mut errors, prefix, &e);
        }

        let mut canonical = self.clone();
        canonical.email = self.email.as_ref().map(|e| e.to_lowercase());

        if let Some(phone) = &self.phone {
            match validate_phone(phone) {
                Ok(value) => canonical.phone = Some(value),
                Err(e) => push_error(&mut errors, prefix, "phone", e.to_string()),
            }
        }
        if let Some(nci) = &self.national_id {
            match validate_national_id(nci) {
                Ok(value) => canonical.national_id = Some(value),
                Err(e) => push_error(&mut errors, prefix, "national_id", e.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(canonical)
        } else {
            Err(DomainError::validation("Les données fournies sont invalides.", errors))
        }
    }
}

impl Client {
    /// Builds a client from checked fields. Fails if a required field is missing.
    pub fn from_fields(
        fields: &ClientFields,
        temp_password_hash: String,
        verification_code: String,
    ) -> Result<Self, DomainError> {
        let missing = || DomainError::InternalError("client fields incomplete".to_string());

        Ok(Self {
            id: Uuid::new_v4(),
            last_name: fields.last_name.clone().ok_or_else(missing)?,
            first_name: fields.first_name.clone().ok_or_else(missing)?,
            email: fields.email.clone().ok_or_else(missing)?,
            phone: fields.phone.clone().ok_or_else(missing)?,
            national_id: fields.national_id.clone().ok_or_else(missing)?,
            address: fields.address.clone().ok_or_else(missing)?,
            temp_password_hash: Some(temp_password_hash),
            verification_code: Some(verification_code),
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        })
    }

    /// Overwrites the fields that are present. Expects checked values.
    pub fn apply(&mut self, fields: &ClientFields) {
        if let Some(v) = &fields.last_name {
            self.last_name = v.clone();
        }
        if let Some(v) = &fields.first_name {
            self.first_name = v.clone();
        }
        if let Some(v) = &fields.email {
            self.email = v.clone();
        }
        if let Some(v) = &fields.phone {
            self.phone = v.clone();
        }
        if let Some(v) = &fields.national_id {
            self.national_id = v.clone();
        }
        if let Some(v) = &fields.address {
            self.address = v.clone();
        }
        self.modified_at = Some(Utc::now());
    }

    /// "nom prenom"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}
