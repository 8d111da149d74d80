use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::DefaultKeyedRateLimiter;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Per-IP request quota. Requests without peer info share one bucket.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if state.rate_limiter.check_key(&ip).is_err() {
        warn!("Rate limit exceeded for IP: {}", ip);
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}

/// Forgets IPs whose bucket has fully refilled so the key map does not grow without bound.
pub fn prune_rate_limiter(limiter: &DefaultKeyedRateLimiter<IpAddr>) {
    limiter.retain_recent();
    limiter.shrink_to_fit();
    debug!(tracked_ips = limiter.len(), "Rate limiter pruned");
}
