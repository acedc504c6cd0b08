// Librarium - Library Lending Demo
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database migrations
//!
//! Schema changes are plain SQL applied at startup; sqlx's compile-time
//! migration support needs a database at build time, which this crate avoids.
//! The `_migrations` table records what already ran, so re-running the set
//! is a no-op.
//!
//! The schema grew in three steps: the catalog tables first, then lending,
//! then reviews. Each step is kept as its own migration so a database created
//! by an older build upgrades cleanly.

use crate::error::Result;
use sqlx::{Executor, SqlitePool};

/// Apply every migration that has not run yet, in order
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    ensure_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_catalog_tables(pool)).await?;
    run_migration(pool, 2, "readers_and_borrows", create_lending_tables(pool)).await?;
    run_migration(pool, 3, "reviews", create_review_table(pool)).await?;

    Ok(())
}

/// Create the tracking table on first use
async fn ensure_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Run one migration unless the tracking table says it already happened
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let already_applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if already_applied > 0 {
        return Ok(());
    }

    migration.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the catalog schema: publishers, genres, books, and the
/// book/genre junction table.
async fn create_catalog_tables(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- ============================================================================
-- CATALOG ENTITIES
-- ============================================================================

-- Publishers table: each book belongs to exactly one publisher
CREATE TABLE IF NOT EXISTS publishers (
    publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 150)
);

-- Genres table: classification labels, linked to books many-to-many
CREATE TABLE IF NOT EXISTS genres (
    genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 150)
);

-- Books table: core catalog records
-- Deleting a publisher that still has books is rejected (RESTRICT); the
-- year upper bound (current year) lives in NewBook::validate because CHECK
-- expressions must be deterministic
CREATE TABLE IF NOT EXISTS books (
    book_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 255),
    author TEXT NOT NULL,
    year INTEGER NOT NULL CHECK (year >= 1600),
    price REAL NOT NULL DEFAULT 0.0,
    publisher_id INTEGER NOT NULL,
    FOREIGN KEY (publisher_id) REFERENCES publishers(publisher_id) ON DELETE RESTRICT
);

-- ============================================================================
-- JUNCTION TABLES (Many-to-Many Relationships)
-- ============================================================================

-- book_genres: Book <-> Genre junction
CREATE TABLE IF NOT EXISTS book_genres (
    book_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE,
    FOREIGN KEY (genre_id) REFERENCES genres(genre_id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, genre_id)
);

-- ============================================================================
-- INDEXES for Performance
-- ============================================================================

CREATE INDEX IF NOT EXISTS idx_books_publisher ON books(publisher_id);
CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
CREATE INDEX IF NOT EXISTS idx_book_genres_genre ON book_genres(genre_id);
        "#,
    )
    .await?;

    Ok(())
}

/// Create the lending tables: readers and their borrow records.
async fn create_lending_tables(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- Readers table: people who borrow books
CREATE TABLE IF NOT EXISTS readers (
    reader_id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL CHECK (length(full_name) BETWEEN 1 AND 255)
);

-- Borrows table: one row per lending event
-- Removing a reader or a book removes their borrow history (CASCADE)
CREATE TABLE IF NOT EXISTS borrows (
    borrow_id INTEGER PRIMARY KEY AUTOINCREMENT,
    reader_id INTEGER NOT NULL,
    book_id INTEGER NOT NULL,
    borrow_date TEXT NOT NULL,  -- ISO 8601 date (YYYY-MM-DD)
    return_date TEXT,           -- NULL while the book is still out
    FOREIGN KEY (reader_id) REFERENCES readers(reader_id) ON DELETE CASCADE,
    FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_borrows_reader ON borrows(reader_id);
CREATE INDEX IF NOT EXISTS idx_borrows_book ON borrows(book_id);
        "#,
    )
    .await?;

    Ok(())
}

/// Create the reviews table.
async fn create_review_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- Reviews table: fractional ratings with an optional comment
CREATE TABLE IF NOT EXISTS reviews (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    rating REAL NOT NULL CHECK (rating >= 1.0 AND rating <= 5.0),
    comment TEXT NOT NULL DEFAULT '' CHECK (length(comment) <= 1000),
    book_id INTEGER NOT NULL,
    FOREIGN KEY (book_id) REFERENCES books(book_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reviews_book ON reviews(book_id);
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .expect("Failed to list tables")
    }

    #[tokio::test]
    async fn test_fresh_database_has_full_schema() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        // The tracking table sorts first; the seven schema tables follow
        assert_eq!(
            table_names(db.pool()).await,
            vec![
                "_migrations",
                "book_genres",
                "books",
                "borrows",
                "genres",
                "publishers",
                "readers",
                "reviews",
            ]
        );
    }

    #[tokio::test]
    async fn test_migration_tracking_records_each_step() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM _migrations ORDER BY id")
            .fetch_all(db.pool())
            .await
            .expect("Failed to read tracking table");

        assert_eq!(names, vec!["initial_schema", "readers_and_borrows", "reviews"]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        // A second full run must neither fail nor duplicate tracking rows
        run_migrations(db.pool()).await.expect("Second migration run failed");

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .expect("Failed to count applied migrations");
        assert_eq!(applied, 3);

        assert_eq!(table_names(db.pool()).await.len(), 8);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let fk_enabled: i32 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .expect("Failed to read the foreign_keys pragma");

        assert_eq!(fk_enabled, 1, "foreign key enforcement is off");
    }
}
