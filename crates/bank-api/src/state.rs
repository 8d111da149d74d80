use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use bank_core::services::{AccountQueryService, AccountService, AuthService, ClientResolver, NoopNotifier};
use bank_infrastructure::{PgAccountRepository, PgAdminRepository, PgClientRepository, PgTokenRepository};
use bank_security::JwtService;
use bank_shared::config::AppConfig;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use sqlx::PgPool;
use tracing::warn;

use crate::middleware::prune_rate_limiter;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub accounts: Arc<AccountService>,
    pub account_queries: Arc<AccountQueryService>,
    pub rate_limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let clients = Arc::new(PgClientRepository::new(db.clone()));
        let admins = Arc::new(PgAdminRepository::new(db.clone()));
        let accounts = Arc::new(PgAccountRepository::new(db.clone()));
        let tokens = Arc::new(PgTokenRepository::new(db.clone()));

        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
        let auth = AuthService::new(
            clients.clone(),
            admins,
            tokens,
            jwt,
            config.jwt.refresh_token_expiry,
        );

        let resolver = ClientResolver::new(clients.clone(), Arc::new(NoopNotifier));
        let account_service = AccountService::new(accounts.clone(), clients, resolver);
        let account_queries = AccountQueryService::new(accounts);

        let per_minute = NonZeroU32::new(config.security.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::keyed(Quota::per_minute(per_minute));

        Self {
            db,
            config: Arc::new(config),
            auth: Arc::new(auth),
            accounts: Arc::new(account_service),
            account_queries: Arc::new(account_queries),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// Periodic housekeeping: prunes idle rate-limit keys and purges stale token records.
    pub async fn run_maintenance(&self) {
        prune_rate_limiter(&self.rate_limiter);

        if let Err(e) = self
            .auth
            .purge_stale_tokens(self.config.security.token_retention_seconds)
            .await
        {
            warn!("Token purge failed: {}", e);
        }
    }
}
