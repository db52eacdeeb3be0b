//! CatalogStore trait definition.

use super::models::{Book, BookFields};
use anyhow::Result;

/// Trait for book storage backends.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// storage failures and for [`super::ValidationError::DuplicateSourceId`]
/// raised by the store's own uniqueness constraint.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Point Lookups
    // =========================================================================

    /// Get a book by its internal id.
    fn get_book(&self, id: i64) -> Result<Option<Book>>;

    /// Get a book by the id assigned by the external catalog.
    fn get_book_by_source_id(&self, source_id: u32) -> Result<Option<Book>>;

    /// All books, ordered by id.
    fn list_books(&self) -> Result<Vec<Book>>;

    /// Number of books in the catalog.
    fn count_books(&self) -> Result<usize>;

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Persist a new book, assigning its id and timestamps.
    fn insert_book(&self, fields: &BookFields) -> Result<Book>;

    /// Replace every mutable field of the book at `id`.
    ///
    /// The source id and creation timestamp are kept; `fields.source_id` is
    /// ignored. Returns `Ok(None)` without writing if there is no such book.
    fn update_book(&self, id: i64, fields: &BookFields) -> Result<Option<Book>>;

    /// Delete a book. Returns true iff a book existed and was removed.
    fn delete_book(&self, id: i64) -> Result<bool>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Case-insensitive substring match on title, any author or any subject.
    fn search_books(&self, text: &str) -> Result<Vec<Book>>;

    /// Case-insensitive substring match on author names only.
    fn search_books_by_author(&self, text: &str) -> Result<Vec<Book>>;

    /// Books downloaded at least `min_downloads` times, most downloaded first.
    fn popular_books(&self, min_downloads: u32) -> Result<Vec<Book>>;
}
