//! # Bank Infrastructure
//!
//! PostgreSQL adapters for the repository ports, pool setup and migrations.

pub mod database;

pub use database::{
    create_pool, ping, run_migrations, PgAccountRepository, PgAdminRepository, PgClientRepository,
    PgTokenRepository,
};
