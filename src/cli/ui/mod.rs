//! UI command - serves the chat front end with a backend proxy

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use clap::Args;
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Arguments for the UI command
#[derive(Args, Clone)]
pub struct UiArgs {
    /// Backend URL to proxy /rag and /health requests to
    #[arg(long, default_value = "http://backend:8000")]
    pub api_url: String,

    /// Skip proxying - serve static files only
    #[arg(long)]
    pub skip_proxy: bool,

    /// Port to serve the UI on
    #[arg(long, default_value_t = 8501)]
    pub port: u16,
}

/// Run the UI server
pub async fn run(args: UiArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config);

    let app = create_ui_router(&args);

    let addr = SocketAddr::from((config.server.host.parse::<std::net::IpAddr>()?, args.port));

    if args.skip_proxy {
        info!("Starting UI server on {} (static files only)", addr);
    } else {
        info!(
            "Starting UI server on {} (proxying /rag/* to {})",
            addr, args.api_url
        );
    }

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

/// Create UI router with optional backend proxy
fn create_ui_router(args: &UiArgs) -> Router {
    let static_service = ServeDir::new("public").fallback(ServeFile::new("public/index.html"));

    if args.skip_proxy {
        Router::new().fallback_service(static_service)
    } else {
        let proxy_state = ProxyState {
            api_url: args.api_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        };

        Router::new()
            .route("/rag/{*path}", any(proxy_handler))
            .route("/health", any(proxy_handler))
            .with_state(proxy_state)
            .fallback_service(static_service)
    }
}

#[derive(Clone)]
struct ProxyState {
    api_url: String,
    client: Client,
}

async fn proxy_handler(State(state): State<ProxyState>, req: Request<Body>) -> impl IntoResponse {
    let target_url = format!("{}{}", state.api_url, req.uri().path());

    let target_url = if let Some(query) = req.uri().query() {
        format!("{}?{}", target_url, query)
    } else {
        target_url
    };

    match forward_request(&state.client, req, &target_url).await {
        Ok(response) => response,
        Err(e) => {
            error!("Proxy error: {}", e);
            (StatusCode::BAD_GATEWAY, format!("Proxy error: {}", e)).into_response()
        }
    }
}

async fn forward_request(
    client: &Client,
    req: Request<Body>,
    target_url: &str,
) -> Result<Response, anyhow::Error> {
    let method = req.method().clone();
    let headers = req.headers().clone();

    let mut proxy_req = client.request(method, target_url);

    // Copy headers (except host)
    for (key, value) in headers.iter() {
        if key != "host" {
            proxy_req = proxy_req.header(key, value);
        }
    }

    let body_bytes = axum::body::to_bytes(req.into_body(), usize::MAX).await?;

    if !body_bytes.is_empty() {
        proxy_req = proxy_req.body(body_bytes);
    }

    let response = proxy_req.send().await?;

    let status = response.status();
    let headers = response.headers().clone();

    let mut builder = Response::builder().status(status);

    for (key, value) in headers.iter() {
        builder = builder.header(key, value);
    }

    // Stream the body through so /rag/stream stays incremental
    Ok(builder.body(Body::from_stream(response.bytes_stream()))?)
}
