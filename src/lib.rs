//! Librarium - a small library lending database with a console demo driver
//!
//! The crate manages a five-table SQLite schema (publishers, genres, books,
//! readers/borrows, reviews), seeds it with sample data, and prints a fixed
//! sequence of reports over it. The [`storage`] module owns the schema and
//! queries, [`tasks`] owns the demo sequence, and [`console`] formats the
//! output frames.

pub mod console;
pub mod error;
pub mod storage;
pub mod tasks;

// Re-export commonly used types
pub use error::{LibrariumError, Result};
pub use storage::Database;
