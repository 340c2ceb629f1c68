//! mvd-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, loads config,
//! connects and migrates the order store, wires the catalog client and the
//! payment simulator into shared state, attaches middleware, and starts the
//! HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use mvd_catalog::HttpCatalogClient;
use mvd_config::ServiceConfig;
use mvd_daemon::{routes, state::AppState};
use mvd_db::PgOrderStore;
use mvd_orders::{OrderStore, PaymentGateway, ProductLookup};
use mvd_payments::SimulatedGateway;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience). Silent if the file does
    // not exist — production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cfg = ServiceConfig::from_env().context("config load failed")?;

    let pool = mvd_db::connect(&cfg.database_url).await?;
    mvd_db::migrate(&pool).await?;

    let store: Arc<dyn OrderStore> = Arc::new(PgOrderStore::new(pool));
    let lookup: Arc<dyn ProductLookup> =
        Arc::new(HttpCatalogClient::new(cfg.catalog_base_url.clone()));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new());

    let shared = Arc::new(AppState::new(store, lookup, gateway, &cfg.auth_secret));

    let app = routes::build_router(shared)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    info!("mvd-daemon listening on http://{}", cfg.bind_addr);

    axum::serve(tokio::net::TcpListener::bind(cfg.bind_addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// CORS: allow only localhost dev origins (the frontend dev server).
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(tower_http::cors::Any)
}
