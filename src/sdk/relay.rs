//! Credential relay: a small HTTP service that hands the map-provider
//! access token to browser clients so the token never ships in the bundle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
struct AppState {
    access_token: Arc<String>,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    access_token: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn create_router(access_token: String) -> Router {
    let state = AppState {
        access_token: Arc::new(access_token),
    };
    Router::new()
        // both paths are live; older clients fetch /data, newer /api/data
        .route("/data", get(serve_token))
        .route("/api/data", get(serve_token))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

async fn serve_token(State(state): State<AppState>) -> Response {
    if state.access_token.is_empty() {
        log::error!("Relay has no access token configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "An error occurred",
            }),
        )
            .into_response();
    }
    Json(TokenBody {
        access_token: &state.access_token,
    })
    .into_response()
}

/// Blocking entry point for the CLI: builds its own runtime and serves
/// until the process is interrupted.
pub fn run(addr: SocketAddr, access_token: String) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Credential relay listening on {}", addr);
        axum::serve(listener, create_router(access_token)).await?;
        Ok(())
    })
}
