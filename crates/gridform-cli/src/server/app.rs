//! Axum application setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/columns", get(handlers::get_columns))
        .route("/rows", get(handlers::get_rows).put(handlers::put_rows))
        .route("/ingest", post(handlers::ingest_file))
        .route("/diff", get(handlers::get_diff))
        .route("/submit", post(handlers::submit))
        .route("/schema", get(handlers::get_schema))
        .route("/summary", get(handlers::get_summary));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "grid server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
