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


//! Database connection and management
//!
//! One [`Database`] value owns the SQLite connection pool for the whole
//! program. Opening a database also runs the migrations, so a fresh handle
//! always carries the full schema; [`Database::reset`] drops everything and
//! rebuilds it, which is how each demo run begins.
//!
//! # Database Location
//! - macOS: ~/Library/Application Support/Librarium/library.db
//! - Linux: ~/.local/share/Librarium/library.db
//! - Windows: %APPDATA%/Librarium/library.db
//!
//! # SQLite Configuration
//! WAL journal mode, foreign keys on, NORMAL synchronous, incremental
//! auto-vacuum, statement logging off.

use crate::error::{LibrariumError, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    ConnectOptions,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Pool size for a file-backed database
const POOL_SIZE: u32 = 5;

/// Upper bound for acquiring a connection and for SQLite's busy handler
const DB_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the library database: a SQLite pool plus its file location
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>, // None for in-memory databases
}

impl Database {
    /// Open (or create) the database file at `database_path` and migrate it
    ///
    /// The parent directory is created when missing. Fails when the file
    /// cannot be opened or a migration does not apply.
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        let path = database_path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LibrariumError::ConfigurationError(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let connection_string = format!("sqlite://{}?mode=rwc", path.display());
        let connect_opts =
            SqliteConnectOptions::from_str(&connection_string)?.create_if_missing(true);

        Self::open(connect_opts, POOL_SIZE, Some(path.to_path_buf())).await
    }

    /// Open a throwaway in-memory database, used by the tests
    ///
    /// In-memory SQLite exists per connection, so the pool is capped at one
    /// connection; a second connection would see an unrelated empty database.
    pub async fn new_in_memory() -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

        Self::open(connect_opts, 1, None).await
    }

    /// Shared open path: apply the SQLite settings, build the pool, migrate
    async fn open(
        connect_opts: SqliteConnectOptions,
        max_connections: u32,
        path: Option<PathBuf>,
    ) -> Result<Self> {
        let connect_opts = connect_opts
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(DB_TIMEOUT)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(DB_TIMEOUT)
            .connect_with(connect_opts)
            .await?;

        // auto_vacuum only takes effect while no tables exist yet, so it has
        // to run before the migrations do
        sqlx::query("PRAGMA auto_vacuum = INCREMENTAL")
            .execute(&pool)
            .await?;

        let db = Self { pool, path };
        db.migrate().await?;

        Ok(db)
    }

    /// Bring the schema up to date by applying any pending migrations
    pub async fn migrate(&self) -> Result<()> {
        crate::storage::migrations::run_migrations(&self.pool)
            .await
            .map_err(|e| LibrariumError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    /// Drop every table and rebuild the schema from scratch
    ///
    /// This is the destructive reset the demo driver runs first: all data is
    /// lost, including the migration history, and the schema is recreated by
    /// running every migration again.
    ///
    /// Tables are dropped children-first so foreign keys never block the drop.
    pub async fn reset(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS reviews").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS borrows").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS book_genres").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS books").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS readers").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS genres").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS publishers").execute(&self.pool).await?;
        sqlx::query("DROP TABLE IF EXISTS _migrations").execute(&self.pool).await?;

        self.migrate().await
    }

    /// The connection pool every query function runs against
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Location of the database file; `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the pool, waiting for in-flight connections to finish
    pub async fn close(self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }

    /// Default database location: `library.db` in the platform data directory
    pub fn get_default_path() -> PathBuf {
        Self::default_data_dir().join("library.db")
    }

    fn default_data_dir() -> PathBuf {
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("Librarium")
        }

        #[cfg(target_os = "linux")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local").join("share").join("Librarium")
        }

        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("Librarium")
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            PathBuf::from(".")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_accepts_writes() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create in-memory database");

        // Migrations ran in the constructor, so the schema is usable right away
        sqlx::query("INSERT INTO genres (name) VALUES ('Poetry')")
            .execute(db.pool())
            .await
            .expect("Failed to insert genre");

        let name: String = sqlx::query_scalar("SELECT name FROM genres")
            .fetch_one(db.pool())
            .await
            .expect("Failed to read genre back");
        assert_eq!(name, "Poetry");
    }

    #[tokio::test]
    async fn test_reset_drops_data_and_recreates_schema() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        sqlx::query("INSERT INTO publishers (name) VALUES ('Orbit')")
            .execute(db.pool())
            .await
            .expect("Failed to insert publisher");

        db.reset().await.expect("Failed to reset database");

        // Data is gone but the table is usable again
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publishers")
            .fetch_one(db.pool())
            .await
            .expect("Failed to count publishers");
        assert_eq!(count, 0);

        sqlx::query("INSERT INTO publishers (name) VALUES ('Orbit')")
            .execute(db.pool())
            .await
            .expect("Failed to insert after reset");
    }

    #[tokio::test]
    async fn test_reset_is_repeatable() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        db.reset().await.expect("First reset failed");
        db.reset().await.expect("Second reset failed");

        let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .expect("Failed to count migrations");
        assert_eq!(migrations, 3);
    }

    #[tokio::test]
    async fn test_default_path_ends_with_database_file() {
        let path = Database::get_default_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("library.db"));
    }
}
