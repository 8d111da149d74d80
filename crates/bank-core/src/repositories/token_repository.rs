//! Token repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::AuthToken;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, token: &AuthToken) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AuthToken>, DomainError>;
    async fn find_refresh_by_digest(&self, digest: &str) -> Result<Option<AuthToken>, DomainError>;
    /// Returns `false` when the record was already revoked.
    async fn revoke(&self, id: &Uuid) -> Result<bool, DomainError>;
    /// Returns the number of records revoked.
    async fn revoke_all_for_principal(&self, principal_id: &Uuid) -> Result<u64, DomainError>;
    /// Deletes records that expired or were revoked before `cutoff`.
    async fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
