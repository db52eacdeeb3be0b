//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all book catalog endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub async fn get_stats(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Books
    // ========================================================================

    pub async fn list_books(&self) -> Response {
        self.get("/v1/books").await
    }

    pub async fn get_book(&self, id: i64) -> Response {
        self.get(&format!("/v1/books/{}", id)).await
    }

    pub async fn get_book_by_source_id(&self, source_id: u32) -> Response {
        self.get(&format!("/v1/books/source/{}", source_id)).await
    }

    pub async fn add_book(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/v1/books"))
            .json(body)
            .send()
            .await
            .expect("Add book request failed")
    }

    pub async fn import_book(&self, source_id: u32) -> Response {
        self.client
            .post(self.url(&format!("/v1/books/import/{}", source_id)))
            .send()
            .await
            .expect("Import request failed")
    }

    pub async fn update_book(&self, id: i64, body: &Value) -> Response {
        self.client
            .put(self.url(&format!("/v1/books/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Update book request failed")
    }

    pub async fn delete_book(&self, id: i64) -> Response {
        self.client
            .delete(self.url(&format!("/v1/books/{}", id)))
            .send()
            .await
            .expect("Delete book request failed")
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn search(&self, query: &str) -> Response {
        self.client
            .get(self.url("/v1/books/search"))
            .query(&[("query", query)])
            .send()
            .await
            .expect("Search request failed")
    }

    pub async fn search_by_author(&self, author: &str) -> Response {
        self.client
            .get(self.url("/v1/books/search/author"))
            .query(&[("author", author)])
            .send()
            .await
            .expect("Author search request failed")
    }

    pub async fn popular(&self, min_downloads: Option<u32>) -> Response {
        let mut request = self.client.get(self.url("/v1/books/popular"));
        if let Some(min) = min_downloads {
            request = request.query(&[("min_downloads", min)]);
        }
        request.send().await.expect("Popular request failed")
    }

    pub async fn search_external(&self, params: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url("/v1/books/external/search"))
            .query(params)
            .send()
            .await
            .expect("External search request failed")
    }
}
