use cat_realm::{
    AppState,
    auth::SessionStore,
    config::{AppConfig, Env},
    create_router,
    policy::AccessPolicy,
    repository::{InMemoryCatRepository, RepositoryState},
    seed,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components in order: Configuration, Logging, Repository, Seed Data, and
/// the HTTP server. Every step is fail-fast; a service that cannot seed its
/// data does not start.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to sensible defaults for local
    // development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cat_realm=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Repository Initialization & Seeding
    // The in-memory repository starts empty; the seed loader runs exactly
    // once, before the server accepts its first request.
    let repo = Arc::new(InMemoryCatRepository::new()) as RepositoryState;
    let seeded = seed::seed_cats(&repo)
        .await
        .expect("FATAL: failed to seed cat records.");
    tracing::info!("Seeded {} cats", seeded);

    // 5. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        repo,
        sessions: SessionStore::new(),
        policy: AccessPolicy::realm_defaults(),
        config,
    };

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind listen address.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: server error.");
}
