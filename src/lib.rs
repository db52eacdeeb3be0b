//! Book Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog_service;
pub mod catalog_store;
pub mod config;
pub mod gutendex;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use gutendex::{ExternalCatalog, GutendexClient};
pub use server::{run_server, RequestsLoggingLevel};
