use std::net::SocketAddr;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod db;
mod domain;
mod rest;

/// Default location of the community data snapshot, overridable with the
/// PORTAL_DB environment variable.
const DEFAULT_DB_PATH: &str = "db/portal.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let db_path = std::env::var("PORTAL_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    info!("Serving lookups from snapshot at {}", db_path);

    // The snapshot is opened read-only per request, so the server starts even
    // if the file is missing; requests then surface StoreUnavailable.
    let state = rest::AppState::new(&db_path);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/verify", post(rest::verify))
        .route("/history", get(rest::history))
        .route("/calendar", get(rest::calendar_month))
        .route("/news", get(rest::news));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
