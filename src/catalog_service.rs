//! Book catalog use cases on top of the store and the external catalog.

use crate::catalog_store::{
    validate_book_fields, Book, BookFields, CatalogStore, ValidationError, ValidationResult,
};
use crate::gutendex::{ExternalCatalog, ExternalCatalogError, ExternalSearchFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Threshold used by [`CatalogService::popular_books`] when none is given.
pub const DEFAULT_POPULAR_MIN_DOWNLOADS: u32 = 1000;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    ExternalCatalog(#[from] ExternalCatalogError),

    #[error("Catalog store failure: {0:#}")]
    Store(anyhow::Error),
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::DuplicateSourceId { .. } => CatalogError::Conflict(err.to_string()),
            other => CatalogError::Validation(other),
        }
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<ValidationError>() {
            Some(validation) => validation.clone().into(),
            None => CatalogError::Store(err),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Body of add and update requests.
///
/// Everything is optional on the wire so that a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BookRequest {
    pub source_id: Option<u32>,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub bookshelves: Vec<String>,
    pub language: Option<String>,
    pub download_count: Option<u32>,
    pub media_type: Option<String>,
    pub cover_url: Option<String>,
}

impl BookRequest {
    fn into_fields(self, source_id: u32) -> ValidationResult<BookFields> {
        let title = self
            .title
            .ok_or(ValidationError::MissingField { field: "title" })?;
        let fields = BookFields {
            source_id,
            title,
            authors: self.authors,
            subjects: self.subjects,
            bookshelves: self.bookshelves,
            language: self.language,
            download_count: self.download_count,
            media_type: self.media_type,
            cover_url: self.cover_url,
        };
        validate_book_fields(&fields)?;
        Ok(fields)
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    external: Arc<dyn ExternalCatalog>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, external: Arc<dyn ExternalCatalog>) -> Self {
        Self { store, external }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn add_book(&self, request: BookRequest) -> CatalogResult<Book> {
        let source_id = request
            .source_id
            .ok_or(ValidationError::MissingField { field: "source_id" })?;
        let fields = request.into_fields(source_id)?;

        if self.store.get_book_by_source_id(source_id)?.is_some() {
            return Err(ValidationError::DuplicateSourceId { source_id }.into());
        }

        let book = self.store.insert_book(&fields)?;
        info!("Added book {} (source id {})", book.id, book.source_id);
        Ok(book)
    }

    /// Fetch a record from the external catalog and persist it.
    ///
    /// Returns `Ok(None)` if the external catalog has no such record.
    pub async fn import_book(&self, source_id: u32) -> CatalogResult<Option<Book>> {
        let Some(fields) = self.external.fetch_book(source_id).await? else {
            debug!("Source id {} not found in external catalog", source_id);
            return Ok(None);
        };
        if fields.source_id != source_id {
            return Err(ExternalCatalogError::UnexpectedRecord {
                requested: source_id,
                returned: fields.source_id,
            }
            .into());
        }

        if self.store.get_book_by_source_id(source_id)?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "Book with source id {} has already been imported",
                source_id
            )));
        }
        validate_book_fields(&fields)?;

        let book = self.store.insert_book(&fields)?;
        info!("Imported book {} (source id {})", book.id, book.source_id);
        Ok(Some(book))
    }

    /// Replace all mutable fields of a book. `Ok(None)` if there is no book
    /// with this id.
    pub fn update_book(&self, id: i64, request: BookRequest) -> CatalogResult<Option<Book>> {
        let requested_source_id = request.source_id;
        let fields = request.into_fields(requested_source_id.unwrap_or_default())?;

        let Some(existing) = self.store.get_book(id)? else {
            return Ok(None);
        };
        if let Some(requested) = requested_source_id {
            if requested != existing.source_id {
                return Err(ValidationError::SourceIdChanged {
                    current: existing.source_id,
                    requested,
                }
                .into());
            }
        }

        let updated = self.store.update_book(id, &fields)?;
        if updated.is_some() {
            info!("Updated book {}", id);
        }
        Ok(updated)
    }

    pub fn delete_book(&self, id: i64) -> CatalogResult<bool> {
        let deleted = self.store.delete_book(id)?;
        if deleted {
            info!("Deleted book {}", id);
        }
        Ok(deleted)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_all_books(&self) -> CatalogResult<Vec<Book>> {
        Ok(self.store.list_books()?)
    }

    pub fn get_book(&self, id: i64) -> CatalogResult<Option<Book>> {
        Ok(self.store.get_book(id)?)
    }

    pub fn get_book_by_source_id(&self, source_id: u32) -> CatalogResult<Option<Book>> {
        Ok(self.store.get_book_by_source_id(source_id)?)
    }

    pub fn search_books(&self, text: &str) -> CatalogResult<Vec<Book>> {
        Ok(self.store.search_books(text)?)
    }

    pub fn search_books_by_author(&self, author: &str) -> CatalogResult<Vec<Book>> {
        Ok(self.store.search_books_by_author(author)?)
    }

    pub fn popular_books(&self, min_downloads: Option<u32>) -> CatalogResult<Vec<Book>> {
        let min_downloads = min_downloads.unwrap_or(DEFAULT_POPULAR_MIN_DOWNLOADS);
        Ok(self.store.popular_books(min_downloads)?)
    }

    pub fn count_books(&self) -> CatalogResult<usize> {
        Ok(self.store.count_books()?)
    }

    /// Search the external catalog without persisting anything.
    pub async fn search_external(
        &self,
        filter: &ExternalSearchFilter,
    ) -> CatalogResult<Vec<BookFields>> {
        Ok(self.external.search_books(filter).await?)
    }
}
