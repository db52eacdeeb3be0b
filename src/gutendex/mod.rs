//! Client for Gutendex, the JSON API over Project Gutenberg's catalog.

mod client;
mod models;

pub use client::{
    ExternalCatalog, ExternalCatalogError, ExternalSearchFilter, GutendexClient,
    DEFAULT_GUTENDEX_URL, DEFAULT_USER_AGENT,
};
pub use models::{GutendexBook, GutendexPerson, GutendexSearchResponse, COVER_MIME_TYPE};
