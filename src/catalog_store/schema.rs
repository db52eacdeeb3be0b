//! SQLite schema definitions for the book catalog database.
//!
//! Books are keyed by an integer id (rowid alias); the external source id
//! carries a UNIQUE constraint. List-valued fields live in child tables
//! ordered by `position` and are removed together with their book.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const BOOKS_TABLE: Table = Table {
    name: "books",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("source_id", &SqlType::Integer, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("language", &SqlType::Text),
        sqlite_column!("download_count", &SqlType::Integer),
        sqlite_column!("media_type", &SqlType::Text),
        sqlite_column!("cover_url", &SqlType::Text),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
        sqlite_column!("updated_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_books_download_count", "download_count")],
    unique_constraints: &[&["source_id"]],
};

const BOOK_FK: ForeignKey = ForeignKey {
    foreign_table: "books",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

macro_rules! book_list_table {
    ($table:expr, $index:expr) => {
        Table {
            name: $table,
            columns: &[
                sqlite_column!(
                    "book_id",
                    &SqlType::Integer,
                    non_null = true,
                    foreign_key = Some(&BOOK_FK)
                ),
                sqlite_column!("position", &SqlType::Integer, non_null = true),
                sqlite_column!("name", &SqlType::Text, non_null = true),
            ],
            indices: &[($index, "book_id")],
            unique_constraints: &[&["book_id", "position"]],
        }
    };
}

const BOOK_AUTHORS_TABLE: Table = book_list_table!("book_authors", "idx_book_authors_book");
const BOOK_SUBJECTS_TABLE: Table = book_list_table!("book_subjects", "idx_book_subjects_book");
const BOOK_BOOKSHELVES_TABLE: Table =
    book_list_table!("book_bookshelves", "idx_book_bookshelves_book");

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        BOOKS_TABLE,
        BOOK_AUTHORS_TABLE,
        BOOK_SUBJECTS_TABLE,
        BOOK_BOOKSHELVES_TABLE,
    ],
    migration: None,
}];
