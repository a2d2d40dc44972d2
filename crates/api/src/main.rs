use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cheddit_api::config::{ServerConfig, StorageBackend, StorageConfig};
use cheddit_api::router::build_app_router;
use cheddit_api::state::AppState;
use cheddit_db::store::PgStore;
use cheddit_events::{EventBus, NotificationDispatcher, WebPushTransport};
use cheddit_storage::{LocalObjectStore, ObjectStore, S3ObjectStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cheddit_api=debug,cheddit_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = cheddit_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    cheddit_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    cheddit_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn cheddit_db::Store> = Arc::new(PgStore::new(pool));

    // --- Object storage ---
    let objects = build_object_store(&config.storage, &config.public_base_url).await;

    // --- Event bus + push dispatch ---
    let event_bus = Arc::new(EventBus::default());

    let dispatcher_handle = match &config.push.vapid_private_key {
        Some(key) => {
            let transport = WebPushTransport::new(key.clone(), config.push.vapid_subject.clone())
                .expect("Failed to build Web Push client");
            let dispatcher = NotificationDispatcher::new(
                Arc::clone(&store),
                Arc::new(transport),
                config.public_base_url.clone(),
            );
            Some(tokio::spawn(dispatcher.run(event_bus.subscribe())))
        }
        None => {
            tracing::warn!("VAPID_PRIVATE_KEY not set, push notifications disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        store,
        objects,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last sender closes the broadcast channel, which ends the
    // dispatcher loop once it has drained.
    drop(event_bus);
    if let Some(handle) = dispatcher_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Notification dispatcher stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

async fn build_object_store(config: &StorageConfig, public_base_url: &str) -> Arc<dyn ObjectStore> {
    match config.backend {
        StorageBackend::Local => {
            tracing::info!(root = %config.local_path.display(), bucket = %config.bucket, "Using local object storage");
            Arc::new(LocalObjectStore::new(
                config.local_path.clone(),
                config.bucket.clone(),
                public_base_url,
                config.signing_secret.clone().into_bytes(),
            ))
        }
        StorageBackend::S3 => {
            tracing::info!(bucket = %config.bucket, endpoint = ?config.s3_endpoint_url, "Using S3 object storage");
            Arc::new(
                S3ObjectStore::from_env(config.bucket.clone(), config.s3_endpoint_url.as_deref())
                    .await,
            )
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
