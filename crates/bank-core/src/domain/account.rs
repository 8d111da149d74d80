// ============================================================================
// Bank Core - Account Entity
// File: crates/bank-core/src/domain/account.rs
// Description: Bank account ("compte") entity and lifecycle transitions
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const BLOCK_REASON: &str = "Inactivité de 30+ jours";

/// Account type. `cheque` is accepted as an alias of `courant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Courant,
    Epargne,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Courant => "courant",
            AccountType::Epargne => "epargne",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "courant" | "cheque" => Some(AccountType::Courant),
            "epargne" => Some(AccountType::Epargne),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "actif")]
    Active,
    #[serde(rename = "bloque")]
    Blocked,
    #[serde(rename = "ferme")]
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "actif",
            AccountStatus::Blocked => "bloque",
            AccountStatus::Closed => "ferme",
        }
    }

    /// Exact match only.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "actif" => Some(AccountStatus::Active),
            "bloque" => Some(AccountStatus::Blocked),
            "ferme" => Some(AccountStatus::Closed),
            _ => None,
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Fcfa,
    Xof,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Fcfa => "FCFA",
            Currency::Xof => "XOF",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FCFA" => Some(Currency::Fcfa),
            "XOF" => Some(Currency::Xof),
            _ => None,
        }
    }
}

/// Bank account entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub account_number: String,
    pub balance: Decimal,
    pub currency: Currency,
    pub account_type: AccountType,
    pub opened_at: DateTime<Utc>,
    pub status: AccountStatus,
    pub closed_at: Option<DateTime<Utc>>,
    pub client_id: Uuid,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl Account {
    /// New active account opened at `now`.
    pub fn open(
        account_number: String,
        account_type: AccountType,
        initial_balance: Decimal,
        currency: Currency,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number,
            balance: initial_balance,
            currency,
            account_type,
            opened_at: now,
            status: AccountStatus::Active,
            closed_at: None,
            client_id,
            created_at: now,
            modified_at: None,
            removed_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }

    /// Moves the account to the terminal `ferme` state and soft-deletes it.
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status == AccountStatus::Closed || self.is_deleted() {
            return Err(DomainError::AccountAlreadyClosed(self.account_number.clone()));
        }

        self.status = AccountStatus::Closed;
        self.closed_at = Some(now);
        self.removed_at = Some(now);
        self.modified_at = Some(now);
        Ok(())
    }

    /// Only blocked accounts carry a reason.
    pub fn block_reason(&self) -> Option<&'static str> {
        match self.status {
            AccountStatus::Blocked => Some(BLOCK_REASON),
            _ => None,
        }
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.modified_at.unwrap_or(self.created_at)
    }
}

/// Account joined with its holder's names.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub account: Account,
    pub holder_last_name: String,
    pub holder_first_name: String,
}

impl AccountView {
    /// "nom prenom"
    pub fn holder(&self) -> String {
        format!("{} {}", self.holder_last_name, self.holder_first_name)
    }
}

/// Summary returned once an account has been closed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedAccount {
    pub id: Uuid,
    pub account_number: String,
    pub status: AccountStatus,
    pub closed_at: DateTime<Utc>,
}
