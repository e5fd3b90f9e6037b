use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracktimer::config::Config;
use tracktimer::routes;
use tracktimer::state::AppState;
use tracktimer::store::{MemoryRouteStore, RouteStore, SqliteRouteStore};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracktimer=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let store: Arc<dyn RouteStore> = match &config.database_url {
        Some(url) => match SqliteRouteStore::connect(url).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                tracing::error!("Could not open route database {}: {}", url, err);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, saved routes are kept in memory only");
            Arc::new(MemoryRouteStore::new())
        }
    };
    let state = AppState::new(store);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router())
        .merge(routes::records::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("tracktimer listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Session: http://{}/api/session", addr);
    tracing::info!("Saved routes: http://{}/api/routes", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
