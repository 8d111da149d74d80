pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod role;

pub use auth::require_auth;
pub use logging::log_requests;
pub use rate_limit::{prune_rate_limiter, rate_limit};
pub use role::require_admin;
