//! Admin repository trait (port)

use async_trait::async_trait;
use crate::domain::Admin;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError>;
    async fn count(&self) -> Result<u64, DomainError>;
    async fn create(&self, admin: &Admin) -> Result<Admin, DomainError>;
}
