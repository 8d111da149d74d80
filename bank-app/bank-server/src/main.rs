use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use bank_api::{build_router, AppState};
use bank_infrastructure::{create_pool, run_migrations};
use bank_shared::config::AppConfig;
use bank_shared::constants::MAINTENANCE_INTERVAL_SECS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Keep the guard alive or buffered file logs are dropped on exit
    let _guard = bank_shared::telemetry::init_telemetry()?;

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(env = %config.app.env, "{} starting...", config.app.name);

    info!("Connecting to database...");
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    }

    let host: IpAddr = config.app.host.parse().context("invalid app.host")?;
    let addr = SocketAddr::from((host, config.app.port));
    let bootstrap = config.bootstrap.clone();

    let state = AppState::new(pool, config);

    if let Some((email, password)) = bootstrap.admin_credentials() {
        let last_name = bootstrap.admin_last_name.as_deref().unwrap_or("Admin");
        let first_name = bootstrap.admin_first_name.as_deref().unwrap_or("Super");
        match state.auth.bootstrap_admin(email, password, last_name, first_name).await {
            Ok(Some(_)) => {}
            Ok(None) => info!("Admin already provisioned, bootstrap skipped."),
            Err(e) => warn!("Admin bootstrap failed: {}", e),
        }
    }

    let maintenance = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(MAINTENANCE_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            maintenance.run_maintenance().await;
        }
    });

    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
