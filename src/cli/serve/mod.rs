//! Serve command - runs API + UI combined on the same port

use std::net::SocketAddr;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::api::{api_routes, AppState};
use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Run the combined API + UI server
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config);

    let addr = build_socket_addr(&config)?;
    let state = crate::create_app_state(config).await?;
    let app = create_router_with_ui(state);

    info!("Starting server (API + UI) on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &AppConfig) {
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

/// Create router with both API and UI endpoints
fn create_router_with_ui(state: AppState) -> Router {
    api_routes()
        // UI static files
        .nest_service(
            "/ui",
            ServeDir::new("public").fallback(ServeFile::new("public/index.html")),
        )
        // Redirect root to UI
        .route("/", get(|| async { Redirect::permanent("/ui/") }))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
