//! Client repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Client, ClientFields, UniqueField};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Non-deleted clients only.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Client>, DomainError>;
    /// Case-insensitive, non-deleted clients only.
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError>;
    /// Unique fields among `fields` already held by a non-deleted client other than `exclude`.
    async fn find_conflicts(
        &self,
        fields: &ClientFields,
        exclude: Option<Uuid>,
    ) -> Result<Vec<UniqueField>, DomainError>;
    async fn create(&self, client: &Client) -> Result<Client, DomainError>;
    async fn update(&self, client: &Client) -> Result<Client, DomainError>;
}
