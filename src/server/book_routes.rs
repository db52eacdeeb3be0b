//! Book catalog HTTP routes.
//!
//! Provides endpoints for:
//! - Reading, adding, updating and deleting catalog books
//! - Searching the local catalog and listing popular books
//! - Importing from and searching the external catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::catalog_service::{BookRequest, CatalogError};
use crate::gutendex::ExternalSearchFilter;
use crate::server::state::{GuardedCatalogService, ServerState};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author: String,
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub min_downloads: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::Validation(_) | CatalogError::Conflict(_) => StatusCode::BAD_REQUEST,
            CatalogError::ExternalCatalog(err) => {
                warn!("External catalog failure: {}", err);
                StatusCode::BAD_GATEWAY
            }
            CatalogError::Store(err) => {
                error!("Catalog store failure: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn json_or_not_found<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn get_books(State(service): State<GuardedCatalogService>) -> Result<Response, CatalogError> {
    Ok(Json(service.get_all_books()?).into_response())
}

async fn get_book(
    State(service): State<GuardedCatalogService>,
    Path(id): Path<i64>,
) -> Result<Response, CatalogError> {
    Ok(json_or_not_found(service.get_book(id)?))
}

async fn get_book_by_source_id(
    State(service): State<GuardedCatalogService>,
    Path(source_id): Path<u32>,
) -> Result<Response, CatalogError> {
    Ok(json_or_not_found(service.get_book_by_source_id(source_id)?))
}

async fn post_book(
    State(service): State<GuardedCatalogService>,
    Json(body): Json<BookRequest>,
) -> Result<Response, CatalogError> {
    Ok(Json(service.add_book(body)?).into_response())
}

async fn import_book(
    State(service): State<GuardedCatalogService>,
    Path(source_id): Path<u32>,
) -> Result<Response, CatalogError> {
    Ok(json_or_not_found(service.import_book(source_id).await?))
}

async fn put_book(
    State(service): State<GuardedCatalogService>,
    Path(id): Path<i64>,
    Json(body): Json<BookRequest>,
) -> Result<Response, CatalogError> {
    Ok(json_or_not_found(service.update_book(id, body)?))
}

async fn delete_book(
    State(service): State<GuardedCatalogService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CatalogError> {
    match service.delete_book(id)? {
        true => Ok(StatusCode::OK),
        false => Ok(StatusCode::NOT_FOUND),
    }
}

async fn search_books(
    State(service): State<GuardedCatalogService>,
    Query(params): Query<SearchQuery>,
) -> Result<Response, CatalogError> {
    Ok(Json(service.search_books(&params.query)?).into_response())
}

async fn search_books_by_author(
    State(service): State<GuardedCatalogService>,
    Query(params): Query<AuthorQuery>,
) -> Result<Response, CatalogError> {
    Ok(Json(service.search_books_by_author(&params.author)?).into_response())
}

async fn popular_books(
    State(service): State<GuardedCatalogService>,
    Query(params): Query<PopularQuery>,
) -> Result<Response, CatalogError> {
    Ok(Json(service.popular_books(params.min_downloads)?).into_response())
}

async fn search_external(
    State(service): State<GuardedCatalogService>,
    Query(filter): Query<ExternalSearchFilter>,
) -> Result<Response, CatalogError> {
    Ok(Json(service.search_external(&filter).await?).into_response())
}

/// Routes mounted under `/v1/books`.
pub fn book_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(get_books).post(post_book))
        .route("/search", get(search_books))
        .route("/search/author", get(search_books_by_author))
        .route("/popular", get(popular_books))
        .route("/external/search", get(search_external))
        .route("/source/{source_id}", get(get_book_by_source_id))
        .route("/import/{source_id}", post(import_book))
        .route("/{id}", get(get_book).put(put_book).delete(delete_book))
}
