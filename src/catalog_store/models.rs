//! Book catalog models.

use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of a stored cover URL.
pub const MAX_COVER_URL_LENGTH: usize = 1000;

/// The caller-controlled part of a book: everything except the internal id
/// and the server-assigned timestamps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    /// Identifier assigned by the external catalog (Gutenberg ebook number).
    pub source_id: u32,
    pub title: String,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
    pub language: Option<String>,
    pub download_count: Option<u32>,
    pub media_type: Option<String>,
    pub cover_url: Option<String>,
}

/// A persisted book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub source_id: u32,
    pub title: String,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
    pub language: Option<String>,
    pub download_count: Option<u32>,
    pub media_type: Option<String>,
    pub cover_url: Option<String>,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
    /// Unix timestamp in milliseconds.
    pub updated_at: i64,
}

impl Book {
    pub fn from_fields(id: i64, fields: BookFields, created_at: i64, updated_at: i64) -> Self {
        Book {
            id,
            source_id: fields.source_id,
            title: fields.title,
            authors: fields.authors,
            subjects: fields.subjects,
            bookshelves: fields.bookshelves,
            language: fields.language,
            download_count: fields.download_count,
            media_type: fields.media_type,
            cover_url: fields.cover_url,
            created_at,
            updated_at,
        }
    }
}

/// Which list-valued child table a string belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookListKind {
    Author,
    Subject,
    Bookshelf,
}

impl BookListKind {
    pub const ALL: [BookListKind; 3] = [
        BookListKind::Author,
        BookListKind::Subject,
        BookListKind::Bookshelf,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            BookListKind::Author => "book_authors",
            BookListKind::Subject => "book_subjects",
            BookListKind::Bookshelf => "book_bookshelves",
        }
    }

    pub fn values<'a>(&self, fields: &'a BookFields) -> &'a [String] {
        match self {
            BookListKind::Author => &fields.authors,
            BookListKind::Subject => &fields.subjects,
            BookListKind::Bookshelf => &fields.bookshelves,
        }
    }

    pub fn values_mut<'a>(&self, book: &'a mut Book) -> &'a mut Vec<String> {
        match self {
            BookListKind::Author => &mut book.authors,
            BookListKind::Subject => &mut book.subjects,
            BookListKind::Bookshelf => &mut book.bookshelves,
        }
    }
}
