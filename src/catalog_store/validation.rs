//! Validation for catalog entries.
//!
//! Requests are checked before anything is written to the store. The
//! duplicate-source-id variant is also produced by the store itself when the
//! UNIQUE constraint on `books.source_id` fires.

use super::models::{BookFields, MAX_COVER_URL_LENGTH};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField { field: &'static str },
    EmptyField { field: &'static str },
    TooLong { field: &'static str, max: usize, actual: usize },
    SourceIdChanged { current: u32, requested: u32 },
    DuplicateSourceId { source_id: u32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField { field } => {
                write!(f, "Field '{}' is mandatory", field)
            }
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::TooLong { field, max, actual } => write!(
                f,
                "Field '{}' must be at most {} characters, got {}",
                field, max, actual
            ),
            ValidationError::SourceIdChanged { current, requested } => write!(
                f,
                "Source id of a book cannot change (is {}, requested {})",
                current, requested
            ),
            ValidationError::DuplicateSourceId { source_id } => {
                write!(f, "Book with source id {} already exists", source_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate the fields of a book about to be written.
pub fn validate_book_fields(fields: &BookFields) -> ValidationResult<()> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "title" });
    }
    if let Some(cover_url) = &fields.cover_url {
        let length = cover_url.chars().count();
        if length > MAX_COVER_URL_LENGTH {
            return Err(ValidationError::TooLong {
                field: "cover_url",
                max: MAX_COVER_URL_LENGTH,
                actual: length,
            });
        }
    }
    Ok(())
}
