use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use super::book_routes::book_routes;
use super::{log_requests, state::*, ServerConfig};
use crate::catalog_service::CatalogService;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub books: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> Response {
    let books = match state.catalog_service.count_books() {
        Ok(count) => count,
        Err(err) => {
            error!("Failed to count books: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        books,
    };
    Json(stats).into_response()
}

pub fn make_app(config: ServerConfig, catalog_service: CatalogService) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        catalog_service: Arc::new(catalog_service),
        hash: env!("GIT_HASH").to_owned(),
    };

    Router::new()
        .route("/", get(home))
        .nest("/v1/books", book_routes())
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(config: ServerConfig, catalog_service: CatalogService) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_service);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    Ok(axum::serve(listener, app).await?)
}
