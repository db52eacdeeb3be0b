//! Models for the Gutendex API responses.
//!
//! These types match the JSON returned by Gutendex and convert to catalog
//! book fields. Optional and list fields default when absent; anything else
//! that does not fit fails to decode.

use crate::catalog_store::BookFields;
use serde::Deserialize;
use std::collections::HashMap;

/// MIME type of the cover image in a record's `formats` map.
pub const COVER_MIME_TYPE: &str = "image/jpeg";

/// Author or translator entry.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GutendexPerson {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
}

/// A single book record.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GutendexBook {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<GutendexPerson>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub bookshelves: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub download_count: Option<u32>,
    /// MIME type to URL.
    #[serde(default)]
    pub formats: HashMap<String, String>,
}

impl GutendexBook {
    /// Convert to catalog book fields.
    ///
    /// The first language wins when several are tagged, and only the JPEG
    /// image is used as cover.
    pub fn into_book_fields(self) -> BookFields {
        let GutendexBook {
            id,
            title,
            authors,
            subjects,
            bookshelves,
            languages,
            media_type,
            download_count,
            mut formats,
        } = self;

        BookFields {
            source_id: id,
            title,
            authors: authors.into_iter().map(|a| a.name).collect(),
            subjects,
            bookshelves,
            language: languages.into_iter().next(),
            download_count,
            media_type,
            cover_url: formats.remove(COVER_MIME_TYPE),
        }
    }
}

/// Paginated search envelope. Only the first page is ever read.
#[derive(Clone, Debug, Deserialize)]
pub struct GutendexSearchResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<GutendexBook>,
}
