//! SQLite-backed catalog store.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use super::validation::ValidationError;
use crate::sqlite_persistence::open_versioned;
use anyhow::{Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, ToSql};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const BOOK_COLUMNS: &str =
    "id, source_id, title, language, download_count, media_type, cover_url, created_at, updated_at";

/// SQLite-backed book catalog.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// SQL function lowercasing its argument with full Unicode case mapping.
/// SQLite's own `lower()` and `LIKE` only fold ASCII.
const LOWER_UNICODE_FN: &str = "lower_unicode";

fn register_lower_unicode(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        LOWER_UNICODE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
}

/// Turns free text into a lowercased LIKE pattern matching it anywhere, with
/// the LIKE wildcards in the text matched literally. Compare against
/// `lower_unicode(column)` with `ESCAPE '\'`.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn row_to_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        source_id: row.get(1)?,
        title: row.get(2)?,
        authors: Vec::new(),
        subjects: Vec::new(),
        bookshelves: Vec::new(),
        language: row.get(3)?,
        download_count: row.get(4)?,
        media_type: row.get(5)?,
        cover_url: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn =
            Connection::open(db_path.as_ref()).context("Failed to open catalog database")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let store = Self::from_connection(conn)?;
        info!("Opened book catalog: {} books", store.count_books()?);
        Ok(store)
    }

    /// A store backed by a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Needed on every connection for the list tables to cascade.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        register_lower_unicode(&conn).context("Failed to register lower_unicode")?;
        let version = open_versioned(&conn, CATALOG_VERSIONED_SCHEMAS)?;
        debug!("Catalog db at schema version {}", version);
        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // =========================================================================
    // Internal Helper Methods
    // =========================================================================

    fn load_lists(conn: &Connection, book: &mut Book) -> Result<()> {
        for kind in BookListKind::ALL {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT name FROM {} WHERE book_id = ?1 ORDER BY position",
                kind.table_name()
            ))?;
            let values = stmt
                .query_map(params![book.id], |r| r.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            *kind.values_mut(book) = values;
        }
        Ok(())
    }

    fn write_lists(conn: &Connection, book_id: i64, fields: &BookFields) -> Result<()> {
        for kind in BookListKind::ALL {
            conn.execute(
                &format!("DELETE FROM {} WHERE book_id = ?1", kind.table_name()),
                params![book_id],
            )?;
            let mut stmt = conn.prepare_cached(&format!(
                "INSERT INTO {} (book_id, position, name) VALUES (?1, ?2, ?3)",
                kind.table_name()
            ))?;
            for (position, value) in kind.values(fields).iter().enumerate() {
                stmt.execute(params![book_id, position as i64, value])?;
            }
        }
        Ok(())
    }

    /// Runs `SELECT <book columns> FROM books <tail>` and fills in the lists.
    fn query_books(conn: &Connection, tail: &str, args: &[&dyn ToSql]) -> Result<Vec<Book>> {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM books {}", BOOK_COLUMNS, tail))?;
        let mut books = stmt
            .query_map(args, row_to_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for book in books.iter_mut() {
            Self::load_lists(conn, book)?;
        }
        Ok(books)
    }

    fn query_one(conn: &Connection, tail: &str, args: &[&dyn ToSql]) -> Result<Option<Book>> {
        Ok(Self::query_books(conn, tail, args)?.into_iter().next())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn get_book(&self, id: i64) -> Result<Option<Book>> {
        let conn = self.conn.lock().unwrap();
        Self::query_one(&conn, "WHERE id = ?1", &[&id])
    }

    fn get_book_by_source_id(&self, source_id: u32) -> Result<Option<Book>> {
        let conn = self.conn.lock().unwrap();
        Self::query_one(&conn, "WHERE source_id = ?1", &[&source_id])
    }

    fn list_books(&self) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        Self::query_books(&conn, "ORDER BY id", &[])
    }

    fn count_books(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn insert_book(&self, fields: &BookFields) -> Result<Book> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let now = now_millis();

        let inserted = tx.execute(
            "INSERT INTO books (source_id, title, language, download_count, media_type, cover_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                fields.source_id,
                fields.title,
                fields.language,
                fields.download_count,
                fields.media_type,
                fields.cover_url,
                now,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(ValidationError::DuplicateSourceId {
                    source_id: fields.source_id,
                }
                .into());
            }
            Err(e) => return Err(e).context("Failed to insert book"),
        }

        let id = tx.last_insert_rowid();
        Self::write_lists(&tx, id, fields)?;
        tx.commit()?;

        debug!("Inserted book {} (source id {})", id, fields.source_id);
        Ok(Book::from_fields(id, fields.clone(), now, now))
    }

    fn update_book(&self, id: i64, fields: &BookFields) -> Result<Option<Book>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        // updated_at must move forward even when two writes share a millisecond.
        let changed = tx.execute(
            "UPDATE books SET title = ?2, language = ?3, download_count = ?4, media_type = ?5,
                 cover_url = ?6, updated_at = MAX(?7, updated_at + 1)
             WHERE id = ?1",
            params![
                id,
                fields.title,
                fields.language,
                fields.download_count,
                fields.media_type,
                fields.cover_url,
                now_millis(),
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        Self::write_lists(&tx, id, fields)?;
        let book = Self::query_one(&tx, "WHERE id = ?1", &[&id])?;
        tx.commit()?;
        Ok(book)
    }

    fn delete_book(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn search_books(&self, text: &str) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        let pattern = like_pattern(text);
        Self::query_books(
            &conn,
            "WHERE lower_unicode(title) LIKE ?1 ESCAPE '\\'
                OR EXISTS (SELECT 1 FROM book_authors a WHERE a.book_id = books.id AND lower_unicode(a.name) LIKE ?1 ESCAPE '\\')
                OR EXISTS (SELECT 1 FROM book_subjects s WHERE s.book_id = books.id AND lower_unicode(s.name) LIKE ?1 ESCAPE '\\')
             ORDER BY id",
            &[&pattern],
        )
    }

    fn search_books_by_author(&self, text: &str) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        let pattern = like_pattern(text);
        Self::query_books(
            &conn,
            "WHERE EXISTS (SELECT 1 FROM book_authors a WHERE a.book_id = books.id AND lower_unicode(a.name) LIKE ?1 ESCAPE '\\')
             ORDER BY id",
            &[&pattern],
        )
    }

    fn popular_books(&self, min_downloads: u32) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        Self::query_books(
            &conn,
            "WHERE download_count >= ?1 ORDER BY download_count DESC, id ASC",
            &[&min_downloads],
        )
    }
}
