//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 604_800;
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";
pub const ACCOUNT_NUMBER_PREFIX: &str = "SN";
pub const MIN_INITIAL_BALANCE: i64 = 10_000;
pub const TEMP_PASSWORD_LENGTH: usize = 12;
pub const API_PREFIX: &str = "/v1";
pub const DEFAULT_TOKEN_RETENTION: i64 = 86_400;
pub const MAINTENANCE_INTERVAL_SECS: u64 = 60;
