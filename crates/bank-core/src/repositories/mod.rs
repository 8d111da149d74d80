//! Repository traits (ports)

pub mod account_repository;
pub mod admin_repository;
pub mod client_repository;
pub mod token_repository;

pub use account_repository::AccountRepository;
pub use admin_repository::AdminRepository;
pub use client_repository::ClientRepository;
pub use token_repository::TokenRepository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
#[cfg(test)]
pub use client_repository::MockClientRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
