// ============================================================================
// Bank Infrastructure - PostgreSQL Account Repository
// File: crates/bank-infrastructure/src/database/postgres/account_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use bank_core::domain::{
    Account, AccountQuery, AccountStatus, AccountType, AccountView, Currency,
};
use bank_core::error::DomainError;
use bank_core::repositories::AccountRepository;

use super::account_query_sql::{count_query, list_query, ACCOUNT_VIEW_COLUMNS};
use super::{corrupt_column, map_db_error};

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AccountRow {
    pub id: Uuid,
    pub account_number: String,
    pub balance: Decimal,
    pub currency: String,
    pub account_type: String,
    pub opened_at: DateTime<Utc>,
    pub status: String,
    pub closed_at: Option<DateTime<Utc>>,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct AccountViewRow {
    #[sqlx(flatten)]
    pub account: AccountRow,
    pub holder_last_name: String,
    pub holder_first_name: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            currency: Currency::from_str(&row.currency)
                .ok_or_else(|| corrupt_column("currency", &row.currency))?,
            account_type: AccountType::from_str(&row.account_type)
                .ok_or_else(|| corrupt_column("account_type", &row.account_type))?,
            status: AccountStatus::from_str(&row.status)
                .ok_or_else(|| corrupt_column("status", &row.status))?,
            id: row.id,
            account_number: row.account_number,
            balance: row.balance,
            opened_at: row.opened_at,
            closed_at: row.closed_at,
            client_id: row.client_id,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        })
    }
}

impl TryFrom<AccountViewRow> for AccountView {
    type Error = DomainError;

    fn try_from(row: AccountViewRow) -> Result<Self, Self::Error> {
        Ok(AccountView {
            account: row.account.try_into()?,
            holder_last_name: row.holder_last_name,
            holder_first_name: row.holder_first_name,
        })
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn number_exists(&self, account_number: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE account_number = $1)")
            .bind(account_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("checking account number", e))
    }

    async fn create(&self, account: &Account) -> Result<Account, DomainError> {
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (
                id, account_number, balance, currency, account_type,
                opened_at, status, closed_at, client_id,
                created_at, modified_at, removed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, account_number, balance, currency, account_type,
                opened_at, status, closed_at, client_id,
                created_at, modified_at, removed_at
            "#
        )
        .bind(account.id)
        .bind(&account.account_number)
        .bind(account.balance)
        .bind(account.currency.as_str())
        .bind(account.account_type.as_str())
        .bind(account.opened_at)
        .bind(account.status.as_str())
        .bind(account.closed_at)
        .bind(account.client_id)
        .bind(account.created_at)
        .bind(account.modified_at)
        .bind(account.removed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("creating account", e))?;

        row.try_into()
    }

    async fn find_view(&self, id: &Uuid) -> Result<Option<AccountView>, DomainError> {
        let sql = format!(
            "SELECT {} FROM accounts a JOIN clients c ON c.id = a.client_id \
             WHERE a.id = $1 AND a.removed_at IS NULL",
            ACCOUNT_VIEW_COLUMNS
        );
        let row: Option<AccountViewRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding account", e))?;

        row.map(AccountView::try_from).transpose()
    }

    async fn find_by_id_including_deleted(&self, id: &Uuid) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT
                id, account_number, balance, currency, account_type,
                opened_at, status, closed_at, client_id,
                created_at, modified_at, removed_at
            FROM accounts
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("finding account including deleted", e))?;

        row.map(Account::try_from).transpose()
    }

    async fn close(&self, account: &Account) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                status = $2,
                closed_at = $3,
                removed_at = $4,
                modified_at = $5
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(account.id)
        .bind(account.status.as_str())
        .bind(account.closed_at)
        .bind(account.removed_at)
        .bind(account.modified_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("closing account", e))?;

        // lost a race with another close
        if result.rows_affected() == 0 {
            return Err(DomainError::AccountAlreadyClosed(account.account_number.clone()));
        }
        Ok(())
    }

    async fn search(&self, query: &AccountQuery) -> Result<(Vec<AccountView>, u64), DomainError> {
        let total: i64 = count_query(query)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("counting accounts", e))?;

        let rows: Vec<AccountViewRow> = list_query(query)
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing accounts", e))?;

        let items = rows
            .into_iter()
            .map(AccountView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, u64::try_from(total).unwrap_or(0)))
    }
}
