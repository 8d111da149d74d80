// ============================================================================
// Bank Core - Client Resolver
// File: crates/bank-core/src/services/client_resolver.rs
// ============================================================================
//! Finds the client an account is opened for, creating it when needed

use std::sync::Arc;

use bank_security::credentials::{generate_temporary_password, generate_verification_code};
use bank_security::PasswordService;
use bank_shared::constants::TEMP_PASSWORD_LENGTH;
use bank_shared::utils::{mask_email, parse_uuid};
use tracing::{error, info, warn};

use crate::domain::{Client, ClientFields, ClientReference, UniqueField};
use crate::error::{DomainError, FieldErrors};
use crate::repositories::ClientRepository;
use crate::services::notifier::{ClientNotifier, IssuedCredentials};
use crate::validation::push_error;

/// Error keys for client fields nested in the account payload.
pub const CLIENT_FIELD_PREFIX: &str = "client.";

pub struct ClientResolver {
    clients: Arc<dyn ClientRepository>,
    notifier: Arc<dyn ClientNotifier>,
}

impl ClientResolver {
    pub fn new(clients: Arc<dyn ClientRepository>, notifier: Arc<dyn ClientNotifier>) -> Self {
        Self { clients, notifier }
    }

    /// Existing client when `reference.id` is set, otherwise a newly created one.
    pub async fn resolve(&self, reference: &ClientReference) -> Result<Client, DomainError> {
        let id = reference
            .id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match id {
            Some(raw) => self.find_existing(raw).await,
            None => self.create(&reference.fields).await,
        }
    }

    async fn find_existing(&self, raw_id: &str) -> Result<Client, DomainError> {
        let id = parse_uuid(raw_id).ok_or_else(|| {
            DomainError::invalid_field("client.id", "L'identifiant du client doit être un UUID valide.")
        })?;

        self.clients
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::ClientNotFound(id.to_string()))
    }

    async fn create(&self, fields: &ClientFields) -> Result<Client, DomainError> {
        let fields = fields.normalized();

        let missing = fields.missing_required();
        if !missing.is_empty() {
            let mut errors = FieldErrors::new();
            for field in &missing {
                push_error(&mut errors, CLIENT_FIELD_PREFIX, field, "Ce champ est requis.");
            }
            return Err(DomainError::validation(
                "Les informations du client sont incomplètes.",
                errors,
            ));
        }

        let fields = fields.checked(CLIENT_FIELD_PREFIX)?;
        ensure_unique(self.clients.as_ref(), &fields, None, CLIENT_FIELD_PREFIX).await?;

        let temporary_password = generate_temporary_password(TEMP_PASSWORD_LENGTH);
        let verification_code = generate_verification_code();
        let password_hash = PasswordService::hash(&temporary_password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let client = Client::from_fields(&fields, password_hash, verification_code.clone())?;
        let client = self.clients.create(&client).await?;

        info!(
            client_id = %client.id,
            email = %mask_email(&client.email),
            "Client created"
        );

        let credentials = IssuedCredentials {
            client_id: client.id,
            email: client.email.clone(),
            phone: client.phone.clone(),
            temporary_password,
            verification_code,
        };
        if let Err(e) = self.notifier.client_created(&credentials).await {
            error!(client_id = %client.id, "Failed to notify new client: {}", e);
        }

        Ok(client)
    }
}

/// Fails with a validation error naming every unique field already taken by
/// another non-deleted client.
pub async fn ensure_unique(
    clients: &dyn ClientRepository,
    fields: &ClientFields,
    exclude: Option<uuid::Uuid>,
    prefix: &str,
) -> Result<(), DomainError> {
    if fields.email.is_none() && fields.phone.is_none() && fields.national_id.is_none() {
        return Ok(());
    }

    let conflicts: Vec<UniqueField> = clients.find_conflicts(fields, exclude).await?;
    if conflicts.is_empty() {
        return Ok(());
    }

    warn!(fields = ?conflicts, "Client uniqueness check failed");
    let mut errors = FieldErrors::new();
    for field in &conflicts {
        push_error(&mut errors, prefix, field.field_name(), field.taken_message());
    }
    Err(DomainError::validation("Les données fournies sont déjà utilisées.", errors))
}
