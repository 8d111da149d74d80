//! PostgreSQL auth token repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use bank_core::domain::{AuthToken, Scope, TokenKind};
use bank_core::error::DomainError;
use bank_core::repositories::TokenRepository;

use super::{corrupt_column, map_db_error};

pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuthTokenRow {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub scope: String,
    pub kind: String,
    pub token_digest: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuthTokenRow> for AuthToken {
    type Error = DomainError;

    fn try_from(row: AuthTokenRow) -> Result<Self, Self::Error> {
        Ok(AuthToken {
            scope: Scope::from_str(&row.scope).ok_or_else(|| corrupt_column("scope", &row.scope))?,
            kind: TokenKind::from_str(&row.kind).ok_or_else(|| corrupt_column("kind", &row.kind))?,
            id: row.id,
            principal_id: row.principal_id,
            token_digest: row.token_digest,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn create(&self, token: &AuthToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (
                id, principal_id, scope, kind, token_digest, expires_at, revoked_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        )
        .bind(token.id)
        .bind(token.principal_id)
        .bind(token.scope.as_str())
        .bind(token.kind.as_str())
        .bind(&token.token_digest)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("storing token", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AuthToken>, DomainError> {
        let row: Option<AuthTokenRow> = sqlx::query_as(
            r#"
            SELECT id, principal_id, scope, kind, token_digest, expires_at, revoked_at, created_at
            FROM auth_tokens
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding token by id", e))?;

        row.map(AuthToken::try_from).transpose()
    }

    async fn find_refresh_by_digest(&self, digest: &str) -> Result<Option<AuthToken>, DomainError> {
        let row: Option<AuthTokenRow> = sqlx::query_as(
            r#"
            SELECT id, principal_id, scope, kind, token_digest, expires_at, revoked_at, created_at
            FROM auth_tokens
            WHERE token_digest = $1 AND kind = 'refresh'
            "#
        )
        .bind(digest)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding refresh token", e))?;

        row.map(AuthToken::try_from).transpose()
    }

    async fn revoke(&self, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE auth_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("revoking token", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_all_for_principal(&self, principal_id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE auth_tokens SET revoked_at = NOW() WHERE principal_id = $1 AND revoked_at IS NULL",
        )
        .bind(principal_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("revoking principal tokens", e))?;

        Ok(result.rows_affected())
    }

    async fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM auth_tokens WHERE expires_at < $1 OR revoked_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("purging stale tokens", e))?;

        Ok(result.rows_affected())
    }
}
