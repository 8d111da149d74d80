// ============================================================================
// Bank Infrastructure - PostgreSQL Client Repository
// File: crates/bank-infrastructure/src/database/postgres/client_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use bank_core::domain::{Client, ClientFields, UniqueField};
use bank_core::error::DomainError;
use bank_core::repositories::ClientRepository;

use super::map_db_error;

pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ClientRow {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
    pub temp_password_hash: Option<String>,
    pub verification_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            last_name: row.last_name,
            first_name: row.first_name,
            email: row.email,
            phone: row.phone,
            national_id: row.national_id,
            address: row.address,
            temp_password_hash: row.temp_password_hash,
            verification_code: row.verification_code,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ConflictRow {
    pub email_taken: bool,
    pub phone_taken: bool,
    pub national_id_taken: bool,
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Client>, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            SELECT
                id, last_name, first_name, email, phone, national_id, address,
                temp_password_hash, verification_code,
                created_at, modified_at, removed_at
            FROM clients
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding client by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            SELECT
                id, last_name, first_name, email, phone, national_id, address,
                temp_password_hash, verification_code,
                created_at, modified_at, removed_at
            FROM clients
            WHERE LOWER(email) = LOWER($1) AND removed_at IS NULL
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding client by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_conflicts(
        &self,
        fields: &ClientFields,
        exclude: Option<Uuid>,
    ) -> Result<Vec<UniqueField>, DomainError> {
        let row: ConflictRow = sqlx::query_as(
            r#"
            SELECT
                COALESCE(BOOL_OR(LOWER(email) = LOWER($1)), FALSE) AS email_taken,
                COALESCE(BOOL_OR(phone = $2), FALSE) AS phone_taken,
                COALESCE(BOOL_OR(national_id = $3), FALSE) AS national_id_taken
            FROM clients
            WHERE removed_at IS NULL
              AND ($4::uuid IS NULL OR id <> $4)
              AND (LOWER(email) = LOWER($1) OR phone = $2 OR national_id = $3)
            "#
        )
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.national_id)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("checking client uniqueness", e))?;

        let mut conflicts = Vec::new();
        if row.email_taken {
            conflicts.push(UniqueField::Email);
        }
        if row.phone_taken {
            conflicts.push(UniqueField::Phone);
        }
        if row.national_id_taken {
            conflicts.push(UniqueField::NationalId);
        }
        Ok(conflicts)
    }

    async fn create(&self, client: &Client) -> Result<Client, DomainError> {
        let row: ClientRow = sqlx::query_as(
            r#"
            INSERT INTO clients (
                id, last_name, first_name, email, phone, national_id, address,
                temp_password_hash, verification_code,
                created_at, modified_at, removed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, last_name, first_name, email, phone, national_id, address,
                temp_password_hash, verification_code,
                created_at, modified_at, removed_at
            "#
        )
        .bind(client.id)
        .bind(&client.last_name)
        .bind(&client.first_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.national_id)
        .bind(&client.address)
        .bind(&client.temp_password_hash)
        .bind(&client.verification_code)
        .bind(client.created_at)
        .bind(client.modified_at)
        .bind(client.removed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("creating client", e))?;

        info!(client_id = %row.id, "Client row inserted");
        Ok(row.into())
    }

    async fn update(&self, client: &Client) -> Result<Client, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            UPDATE clients SET
                last_name = $2,
                first_name = $3,
                email = $4,
                phone = $5,
                national_id = $6,
                address = $7,
                modified_at = $8
            WHERE id = $1 AND removed_at IS NULL
            RETURNING
                id, last_name, first_name, email, phone, national_id, address,
                temp_password_hash, verification_code,
                created_at, modified_at, removed_at
            "#
        )
        .bind(client.id)
        .bind(&client.last_name)
        .bind(&client.first_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.national_id)
        .bind(&client.address)
        .bind(client.modified_at.unwrap_or_else(Utc::now))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("updating client", e))?;

        row.map(|r| r.into())
            .ok_or_else(|| DomainError::ClientNotFound(client.id.to_string()))
    }
}
