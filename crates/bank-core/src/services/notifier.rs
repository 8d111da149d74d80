//! Delivery hook for the credentials generated with a new client

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::DomainError;

/// Plain-text secrets handed to the notifier once, right after creation.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub client_id: Uuid,
    pub email: String,
    pub phone: String,
    pub temporary_password: String,
    pub verification_code: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientNotifier: Send + Sync {
    async fn client_created(&self, credentials: &IssuedCredentials) -> Result<(), DomainError>;
}

/// Drops the credentials. SMS and email delivery are handled elsewhere.
pub struct NoopNotifier;

#[async_trait]
impl ClientNotifier for NoopNotifier {
    async fn client_created(&self, credentials: &IssuedCredentials) -> Result<(), DomainError> {
        debug!(client_id = %credentials.client_id, "No notifier configured, credentials not sent");
        Ok(())
    }
}
