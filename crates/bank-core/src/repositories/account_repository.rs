//! Account repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Account, AccountQuery, AccountView};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Checks every row, soft-deleted ones included.
    async fn number_exists(&self, account_number: &str) -> Result<bool, DomainError>;
    async fn create(&self, account: &Account) -> Result<Account, DomainError>;
    /// Visible (non-deleted) account joined with its holder.
    async fn find_view(&self, id: &Uuid) -> Result<Option<AccountView>, DomainError>;
    async fn find_by_id_including_deleted(&self, id: &Uuid) -> Result<Option<Account>, DomainError>;
    /// Persists status, closing date and deletion marker.
    async fn close(&self, account: &Account) -> Result<(), DomainError>;
    /// One page of matches plus the total match count.
    async fn search(&self, query: &AccountQuery) -> Result<(Vec<AccountView>, u64), DomainError>;
}
