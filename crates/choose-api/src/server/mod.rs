//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use choose_common::{
    AccountTokenGenerator, AppConfig, AppError, JwtService, LocalObjectStore, LogMailer,
    MailTransportKind, Mailer, SmtpMailer,
};
use choose_core::SnowflakeGenerator;
use choose_db::{
    create_pool, run_migrations, PgAccountRepository, PgOptionRepository, PgPollRepository,
    PoolSettings,
};
use choose_service::{MailNotifier, RetryConfig, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes sit outside the middleware stack so probes are never rate limited.
pub fn create_app(state: AppState) -> Router {
    let router = apply_middleware(create_router(), state.config());
    router.merge(health_routes()).with_state(state)
}

/// Everything a service context needs apart from repositories and the notifier
pub async fn base_context(config: &AppConfig) -> Result<ServiceContextBuilder, AppError> {
    let object_store = LocalObjectStore::new(&config.media.root, &config.media.base_url);
    object_store.ensure_root().await?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let account_tokens = Arc::new(AccountTokenGenerator::new(
        &config.account_tokens.secret,
        config.account_tokens.timeout_days,
    )?);
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    Ok(ServiceContextBuilder::new()
        .object_store(Arc::new(object_store))
        .jwt_service(jwt_service)
        .account_tokens(account_tokens)
        .snowflake_generator(snowflake_generator)
        .links(config.links.clone())
        .media(config.media.clone()))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let settings = PoolSettings::from(&config.database);
    let pool = create_pool(&settings)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let mailer: Arc<dyn Mailer> = match config.mail.transport {
        MailTransportKind::Log => Arc::new(LogMailer),
        MailTransportKind::Smtp => Arc::new(
            SmtpMailer::from_config(&config.mail).map_err(|e| AppError::Config(e.to_string()))?,
        ),
    };
    info!(transport = ?config.mail.transport, "Mail transport ready");
    let notifier = MailNotifier::new(mailer, RetryConfig::from_mail_config(&config.mail));

    let service_context = base_context(&config)
        .await?
        .pool(pool.clone())
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .poll_repo(Arc::new(PgPollRepository::new(pool.clone())))
        .option_repo(Arc::new(PgOptionRepository::new(pool)))
        .notifier(Arc::new(notifier))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
///
/// Peer addresses are exposed to the handlers because the rate limiter keys on them.
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read local address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, listener).await
}
