use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use parley_api::{create_app, telemetry, AppState};
use parley_core::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};
use parley_infra::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use parley_shared::config::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is a development convenience only
    let environment =
        Environment::from_lookup(&|key: &str| std::env::var(key).ok()).unwrap_or_default();
    if !environment.is_production() {
        dotenvy::dotenv().ok();
    }

    let config = AppConfig::from_env().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting Parley API server");

    if config.auth.tokens.shares_secret() {
        warn!("TOKEN_SECRET and REFRESH_TOKEN_SECRET are identical; token classes are still kept apart by issuer");
    }

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to the database")?;
    if config.database.run_migrations {
        pool.run_migrations()
            .await
            .context("failed to run database migrations")?;
    }

    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let token_repository = MySqlTokenRepository::new(pool.get_pool().clone());

    let token_service = Arc::new(TokenService::new(
        token_repository,
        TokenServiceConfig::from(&config.auth.tokens),
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        token_service,
        AuthServiceConfig::from(&config.auth),
    ));

    let state = web::Data::new(AppState::new(auth_service, config.auth.cookies.clone()));

    let bind_address = config.server.bind_address();
    info!(%bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        create_app(state.clone()).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
