//! In-process stand-in for the Gutendex API
//!
//! Serves a handful of fixed records with the same JSON shape as the real
//! service, plus one id that always fails.

use super::constants::*;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

fn records() -> Vec<Value> {
    vec![
        json!({
            "id": FRANKENSTEIN_SOURCE_ID,
            "title": "Frankenstein; Or, The Modern Prometheus",
            "authors": [{"name": "Shelley, Mary Wollstonecraft", "birth_year": 1797, "death_year": 1851}],
            "translators": [],
            "subjects": ["Frankenstein's monster (Fictitious character) -- Fiction", "Horror tales"],
            "bookshelves": ["Gothic Fiction", "Movie Books"],
            "languages": ["en"],
            "copyright": false,
            "media_type": "Text",
            "formats": {
                "text/html": "https://www.gutenberg.org/ebooks/84.html.images",
                "image/jpeg": "https://www.gutenberg.org/cache/epub/84/pg84.cover.medium.jpg"
            },
            "download_count": 77000
        }),
        json!({
            "id": CHRISTMAS_CAROL_SOURCE_ID,
            "title": "A Christmas Carol in Prose; Being a Ghost Story of Christmas",
            "authors": [{"name": "Dickens, Charles", "birth_year": 1812, "death_year": 1870}],
            "subjects": ["Christmas stories", "Ghost stories"],
            "bookshelves": ["Christmas"],
            "languages": ["en", "fr"],
            "media_type": "Text",
            "formats": {"text/plain; charset=us-ascii": "https://www.gutenberg.org/ebooks/46.txt.utf-8"},
            "download_count": 3000
        }),
    ]
}

fn contains(haystack: &Value, needle: &str) -> bool {
    haystack
        .as_str()
        .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

fn any_contains(list: &Value, needle: &str) -> bool {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .any(|item| contains(item.get("name").unwrap_or(item), needle))
        })
        .unwrap_or(false)
}

async fn get_book(Path(id): Path<u32>) -> Response {
    if id == FAILING_SOURCE_ID {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match records().into_iter().find(|r| r["id"] == id) {
        Some(record) => Json(record).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "No Book matches the given query."})))
            .into_response(),
    }
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let results: Vec<Value> = records()
        .into_iter()
        .filter(|r| {
            params.iter().all(|(key, value)| match key.as_str() {
                "search" => contains(&r["title"], value) || any_contains(&r["authors"], value),
                "author" => any_contains(&r["authors"], value),
                "title" => contains(&r["title"], value),
                "topic" => {
                    any_contains(&r["subjects"], value) || any_contains(&r["bookshelves"], value)
                }
                _ => true,
            })
        })
        .collect();
    Json(json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    }))
}

/// Starts the fake on a random port and returns its books endpoint URL.
pub async fn spawn_fake_gutendex(shutdown_rx: tokio::sync::oneshot::Receiver<()>) -> String {
    let app = Router::new()
        .route("/books", get(search))
        .route("/books/{id}", get(get_book));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Gutendex");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Fake Gutendex failed");
    });

    format!("http://127.0.0.1:{}/books", port)
}
