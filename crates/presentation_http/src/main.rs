//! Nimbus HTTP Server
//!
//! Main entry point for the weather subscription API server.

use std::{sync::Arc, time::Duration};

use application::services::{NotificationService, RefreshService, SubscriptionService};
use infrastructure::{
    AppConfig, ConfigUserDirectory, SqliteCityRegistry, SqliteSnapshotStore,
    SqliteSubscriptionLedger, create_pool,
};
use integration_mail::HttpMailClient;
use integration_weather::OpenWeatherMapClient;
use presentation_http::{
    ApiKeyAuthLayer, routes, state::AppState, tasks,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log format can honor it
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });

    init_tracing(&config.server.log_format);

    info!("Nimbus v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        frequency_unit = ?config.sweeps.frequency_unit,
        "Configuration loaded"
    );

    // Storage
    let pool = Arc::new(create_pool(&config.database)?);
    let cities = Arc::new(SqliteCityRegistry::new(Arc::clone(&pool)));
    let snapshots = Arc::new(SqliteSnapshotStore::new(Arc::clone(&pool)));
    let ledger = Arc::new(SqliteSubscriptionLedger::new(Arc::clone(&pool)));

    // External collaborators
    let weather = Arc::new(
        OpenWeatherMapClient::new(config.weather.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize weather client: {e}"))?,
    );
    let mail = Arc::new(
        HttpMailClient::new(config.mail.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize mail client: {e}"))?,
    );
    let users = Arc::new(
        ConfigUserDirectory::from_config(&config.auth)
            .map_err(|e| anyhow::anyhow!("Invalid auth configuration: {e}"))?,
    );

    // Services
    let subscription_service = Arc::new(SubscriptionService::new(
        cities.clone() as _,
        snapshots.clone() as _,
        ledger.clone() as _,
        weather.clone() as _,
    ));
    let refresh_service = Arc::new(RefreshService::new(
        cities.clone() as _,
        snapshots.clone() as _,
        weather.clone() as _,
    ));
    let notification_service = Arc::new(NotificationService::new(
        ledger.clone() as _,
        cities.clone() as _,
        snapshots.clone() as _,
        users as _,
        mail as _,
        config.sweeps.frequency_unit,
    ));

    // Background sweeps
    let refresh_handle = tasks::spawn_refresh_sweep_task(
        refresh_service,
        Duration::from_secs(config.sweeps.refresh_interval_secs),
    );
    let notify_handle = tasks::spawn_notification_sweep_task(
        notification_service,
        Duration::from_secs(config.sweeps.notify_interval_secs),
    );

    // Build router
    let state = AppState {
        subscriptions: subscription_service,
    };
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.cors_enabled {
        Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        None
    };

    // Configure API key auth
    let auth_layer = ApiKeyAuthLayer::from_api_keys(&config.auth.api_keys);
    if config.auth.api_keys.is_empty() {
        tracing::warn!("No API keys configured; authentication is disabled");
    }

    // Add middleware (order matters: first added = outermost)
    let mut app = app.layer(TraceLayer::new_for_http());
    if let Some(cors) = cors_layer {
        app = app.layer(cors);
    }
    let app = app.layer(auth_layer);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{addr}");

    // Graceful shutdown configuration
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    refresh_handle.abort();
    notify_handle.abort();

    info!("Server shutdown complete");

    Ok(())
}

/// Initialize the tracing subscriber, honoring the configured format
fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nimbus_server=debug,presentation_http=debug,tower_http=debug".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {timeout:?} for connections to close...");
    // The actual connection draining is handled by axum's graceful_shutdown
}
