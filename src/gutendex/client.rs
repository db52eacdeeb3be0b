//! HTTP client for the Gutendex book metadata API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{GutendexBook, GutendexSearchResponse};
use crate::catalog_store::BookFields;

pub const DEFAULT_GUTENDEX_URL: &str = "https://gutendex.com/books";
pub const DEFAULT_USER_AGENT: &str = concat!("book-catalog-server/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    #[error("Failed to reach external catalog: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("External catalog responded with status {0}")]
    Status(StatusCode),

    #[error("Failed to decode external catalog response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("External catalog returned source id {returned} when asked for {requested}")]
    UnexpectedRecord { requested: u32, returned: u32 },
}

/// Filters for a search against the external catalog.
///
/// Blank values are treated as not provided.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ExternalSearchFilter {
    pub query: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
}

impl ExternalSearchFilter {
    /// Query string parameters understood by Gutendex, only for the filters
    /// that carry a non-blank value.
    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", &self.query),
            ("author", &self.author),
            ("title", &self.title),
            ("topic", &self.subject),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

/// Read access to a remote book catalog.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// Fetch one record by its source id. `Ok(None)` if the remote has no
    /// such record.
    async fn fetch_book(&self, source_id: u32)
        -> Result<Option<BookFields>, ExternalCatalogError>;

    /// First page of remote records matching the filter.
    async fn search_books(
        &self,
        filter: &ExternalSearchFilter,
    ) -> Result<Vec<BookFields>, ExternalCatalogError>;
}

/// [`ExternalCatalog`] backed by a Gutendex instance.
pub struct GutendexClient {
    client: reqwest::Client,
    base_url: String,
}

impl GutendexClient {
    /// Create a new Gutendex client.
    ///
    /// # Arguments
    /// * `base_url` - Books endpoint (e.g., "https://gutendex.com/books")
    /// * `timeout_sec` - Request timeout in seconds
    /// * `user_agent` - Value of the User-Agent header sent with every request
    pub fn new(base_url: &str, timeout_sec: u64, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the request and read the body. 404 yields `Ok(None)`.
    async fn get_text(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<String>, ExternalCatalogError> {
        let response = request
            .send()
            .await
            .map_err(ExternalCatalogError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ExternalCatalogError::Status(status));
        }

        let body = response
            .text()
            .await
            .map_err(ExternalCatalogError::Transport)?;
        Ok(Some(body))
    }
}

#[async_trait]
impl ExternalCatalog for GutendexClient {
    async fn fetch_book(
        &self,
        source_id: u32,
    ) -> Result<Option<BookFields>, ExternalCatalogError> {
        let url = format!("{}/{}", self.base_url, source_id);
        debug!("Fetching external book {}", url);

        let Some(body) = self.get_text(self.client.get(&url)).await? else {
            return Ok(None);
        };
        let book: Option<GutendexBook> =
            serde_json::from_str(&body).map_err(ExternalCatalogError::Decode)?;
        Ok(book.map(GutendexBook::into_book_fields))
    }

    async fn search_books(
        &self,
        filter: &ExternalSearchFilter,
    ) -> Result<Vec<BookFields>, ExternalCatalogError> {
        let params = filter.query_params();
        debug!("Searching external catalog with {:?}", params);

        let request = self.client.get(&self.base_url).query(&params);
        let Some(body) = self.get_text(request).await? else {
            return Err(ExternalCatalogError::Status(StatusCode::NOT_FOUND));
        };
        let response: GutendexSearchResponse =
            serde_json::from_str(&body).map_err(ExternalCatalogError::Decode)?;
        Ok(response
            .results
            .into_iter()
            .map(GutendexBook::into_book_fields)
            .collect())
    }
}
