//! Account number generation
//!
//! Format: `SN` + `YYMMDDHHMMSS` + four random digits. Uniqueness is checked
//! against every stored account, closed and soft-deleted ones included.

use std::sync::Arc;

use bank_shared::constants::ACCOUNT_NUMBER_PREFIX;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::DomainError;
use crate::repositories::AccountRepository;

pub const MAX_GENERATION_ATTEMPTS: usize = 10;

pub fn format_account_number(now: DateTime<Utc>, suffix: u16) -> String {
    format!("{}{}{:04}", ACCOUNT_NUMBER_PREFIX, now.format("%y%m%d%H%M%S"), suffix)
}

fn random_suffix() -> u16 {
    rand::rng().random_range(1000..=9999)
}

pub struct AccountNumberGenerator {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountNumberGenerator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn generate(&self, now: DateTime<Utc>) -> Result<String, DomainError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = format_account_number(now, random_suffix());
            if !self.accounts.number_exists(&candidate).await? {
                debug!(account_number = %candidate, attempt, "Account number generated");
                return Ok(candidate);
            }
            debug!(account_number = %candidate, attempt, "Account number already taken");
        }

        warn!(attempts = MAX_GENERATION_ATTEMPTS, "Account number space exhausted for this second");
        Err(DomainError::UnableToGenerateAccountNumber)
    }
}
