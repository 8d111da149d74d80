//! # Bank Security
//!
//! Security utilities: JWT access tokens, password hashing, generated credentials.

pub mod jwt;
pub mod password;
pub mod credentials;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
