//! Domain entities

pub mod account;
pub mod admin;
pub mod client;
pub mod principal;
pub mod query;
pub mod token;

pub use account::*;
pub use admin::*;
pub use client::*;
pub use principal::*;
pub use query::*;
pub use token::*;
