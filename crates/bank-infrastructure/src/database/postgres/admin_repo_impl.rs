//! PostgreSQL admin repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use bank_core::domain::Admin;
use bank_core::error::DomainError;
use bank_core::repositories::AdminRepository;

use super::map_db_error;

pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AdminRow {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            id: row.id,
            last_name: row.last_name,
            first_name: row.first_name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        let row: Option<AdminRow> = sqlx::query_as(
            r#"
            SELECT id, last_name, first_name, email, password_hash, created_at
            FROM admins
            WHERE LOWER(email) = LOWER($1)
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding admin by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("counting admins", e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn create(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let row: AdminRow = sqlx::query_as(
            r#"
            INSERT INTO admins (id, last_name, first_name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, last_name, first_name, email, password_hash, created_at
            "#
        )
        .bind(admin.id)
        .bind(&admin.last_name)
        .bind(&admin.first_name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("creating admin", e))?;

        Ok(row.into())
    }
}
