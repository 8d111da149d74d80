//! Domain services (business logic)

pub mod account_number;
pub mod account_query;
pub mod account_service;
pub mod auth_service;
pub mod client_resolver;
pub mod notifier;

pub use account_number::AccountNumberGenerator;
pub use account_query::AccountQueryService;
pub use account_service::{AccountService, CreateAccount, UpdateAccount};
pub use auth_service::{AuthService, LoginResult, PrincipalInfo, TokenPair};
pub use client_resolver::ClientResolver;
pub use notifier::{ClientNotifier, IssuedCredentials, NoopNotifier};
