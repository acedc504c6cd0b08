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


//! Database storage and models
//!
//! This module handles all database operations for the library lending
//! schema using SQLite.
//!
//! # Database Schema
//! - publishers: Companies that publish books
//! - genres: Classification labels
//! - books: The catalog (title, author, year, price, publisher)
//! - book_genres: Many-to-many junction between books and genres
//! - readers: People who borrow books
//! - borrows: One row per lending event
//! - reviews: Fractional ratings with optional comments
//!
//! # Usage Example
//! ```no_run
//! use librarium::storage::{queries, Database, NewBook, NewPublisher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create database
//! let db = Database::new("./library.db").await?;
//!
//! // Insert a publisher and one of its books
//! let publisher_id =
//!     queries::insert_publisher(db.pool(), &NewPublisher::new("Ace Books")).await?;
//! let book = NewBook::new("Dune", "Frank Herbert", 1965, 25.00, publisher_id);
//! let book_id = queries::insert_book(db.pool(), &book).await?;
//!
//! // Look it back up by title
//! let found = queries::find_book_by_title(db.pool(), "Dune").await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    Book, Borrow, Genre, NewBook, NewBorrow, NewGenre, NewPublisher, NewReader, NewReview,
    Publisher, Reader, Review,
};
