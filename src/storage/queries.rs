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


//! Database query functions
//!
//! This module implements the repository pattern for the lending schema:
//! free async functions over a `SqlitePool`, grouped by entity, plus the
//! aggregation queries behind the console reports.
//!
//! # Query Patterns
//! - Repository functions per entity type
//! - Async/await for all database operations
//! - Insert payloads are validated before they reach SQLite
//! - Aggregations are pushed into SQL rather than computed in Rust

use crate::error::Result;
use crate::storage::models::*;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

// ============================================================================
// PUBLISHER QUERIES
// ============================================================================

/// Insert a new publisher
///
/// Returns the publisher_id of the inserted publisher.
pub async fn insert_publisher(pool: &SqlitePool, publisher: &NewPublisher) -> Result<i64> {
    publisher.validate()?;

    let result = sqlx::query("INSERT INTO publishers (name) VALUES (?)")
        .bind(&publisher.name)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// List all publishers in insertion order
pub async fn list_publishers(pool: &SqlitePool) -> Result<Vec<Publisher>> {
    let publishers =
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers ORDER BY publisher_id")
            .fetch_all(pool)
            .await?;

    Ok(publishers)
}

/// Count total publishers
pub async fn count_publishers(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publishers")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a publisher
///
/// Fails with a foreign key violation while the publisher still has books
/// (ON DELETE RESTRICT).
pub async fn delete_publisher(pool: &SqlitePool, publisher_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM publishers WHERE publisher_id = ?")
        .bind(publisher_id)
        .execute(pool)
        .await?;

    Ok(())
}

// ============================================================================
// GENRE QUERIES
// ============================================================================

/// Insert a new genre
///
/// Returns the genre_id of the inserted genre.
pub async fn insert_genre(pool: &SqlitePool, genre: &NewGenre) -> Result<i64> {
    genre.validate()?;

    let result = sqlx::query("INSERT INTO genres (name) VALUES (?)")
        .bind(&genre.name)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Link a book to a genre
///
/// Writes the junction row directly. Linking the same pair twice is a no-op,
/// not an error.
pub async fn link_book_genre(pool: &SqlitePool, book_id: i64, genre_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO book_genres (book_id, genre_id) VALUES (?, ?)")
        .bind(book_id)
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Find genres linked to a book
pub async fn list_genres_for_book(pool: &SqlitePool, book_id: i64) -> Result<Vec<Genre>> {
    let genres = sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.* FROM genres g
        INNER JOIN book_genres bg ON g.genre_id = bg.genre_id
        WHERE bg.book_id = ?
        ORDER BY g.genre_id
        "#,
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?;

    Ok(genres)
}

/// Count total genres
pub async fn count_genres(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Count book/genre links
pub async fn count_genre_links(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_genres")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book
///
/// Returns the book_id of the inserted book.
pub async fn insert_book(pool: &SqlitePool, book: &NewBook) -> Result<i64> {
    book.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO books (title, author, year, price, publisher_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.year)
    .bind(book.price)
    .bind(book.publisher_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Find book by ID
pub async fn find_book_by_id(pool: &SqlitePool, book_id: i64) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = ?")
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

    Ok(book)
}

/// Find book by exact title
///
/// Titles are not unique; the earliest inserted match wins.
pub async fn find_book_by_title(pool: &SqlitePool, title: &str) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE title = ? ORDER BY book_id LIMIT 1",
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(book)
}

/// List one page of books in insertion order
pub async fn list_books_page(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY book_id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// Count total books
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a book (borrows, reviews, and genre links go with it via CASCADE)
pub async fn delete_book(pool: &SqlitePool, book_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM books WHERE book_id = ?")
        .bind(book_id)
        .execute(pool)
        .await?;

    Ok(())
}

// ============================================================================
// READER QUERIES
// ============================================================================

/// Insert a new reader
///
/// Returns the reader_id of the inserted reader.
pub async fn insert_reader(pool: &SqlitePool, reader: &NewReader) -> Result<i64> {
    reader.validate()?;

    let result = sqlx::query("INSERT INTO readers (full_name) VALUES (?)")
        .bind(&reader.full_name)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Find reader by exact full name
pub async fn find_reader_by_name(pool: &SqlitePool, full_name: &str) -> Result<Option<Reader>> {
    let reader = sqlx::query_as::<_, Reader>(
        "SELECT * FROM readers WHERE full_name = ? ORDER BY reader_id LIMIT 1",
    )
    .bind(full_name)
    .fetch_optional(pool)
    .await?;

    Ok(reader)
}

/// List all reader names in insertion order
pub async fn list_reader_names(pool: &SqlitePool) -> Result<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar("SELECT full_name FROM readers ORDER BY reader_id")
        .fetch_all(pool)
        .await?;

    Ok(names)
}

/// Count total readers
pub async fn count_readers(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readers")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a reader (their borrow history goes with them via CASCADE)
pub async fn delete_reader(pool: &SqlitePool, reader_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM readers WHERE reader_id = ?")
        .bind(reader_id)
        .execute(pool)
        .await?;

    Ok(())
}

// ============================================================================
// BORROW QUERIES
// ============================================================================

/// Insert a new borrow record
///
/// Returns the borrow_id of the inserted record. The referenced reader and
/// book must exist; SQLite enforces both foreign keys.
pub async fn insert_borrow(pool: &SqlitePool, borrow: &NewBorrow) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO borrows (reader_id, book_id, borrow_date, return_date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(borrow.reader_id)
    .bind(borrow.book_id)
    .bind(borrow.borrow_date)
    .bind(borrow.return_date)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Count total borrow records
pub async fn count_borrows(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Find borrow records for a book, oldest first
pub async fn list_borrows_for_book(pool: &SqlitePool, book_id: i64) -> Result<Vec<Borrow>> {
    let borrows =
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE book_id = ? ORDER BY borrow_id")
            .bind(book_id)
            .fetch_all(pool)
            .await?;

    Ok(borrows)
}

/// A borrow record joined with the borrowed book's title
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BorrowedBook {
    pub title: String,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// List everything a reader has borrowed, oldest record first
pub async fn list_borrows_for_reader(
    pool: &SqlitePool,
    reader_id: i64,
) -> Result<Vec<BorrowedBook>> {
    let borrows = sqlx::query_as::<_, BorrowedBook>(
        r#"
        SELECT b.title AS title, br.borrow_date AS borrow_date, br.return_date AS return_date
        FROM borrows br
        JOIN books b ON b.book_id = br.book_id
        WHERE br.reader_id = ?
        ORDER BY br.borrow_id
        "#,
    )
    .bind(reader_id)
    .fetch_all(pool)
    .await?;

    Ok(borrows)
}

/// List borrows that are overdue as of the given date
///
/// A borrow is overdue when the book is still out and was borrowed strictly
/// more than [`LOAN_PERIOD_DAYS`] days before `as_of`. A borrow made exactly
/// [`LOAN_PERIOD_DAYS`] days ago is not included.
pub async fn list_overdue_borrows(
    pool: &SqlitePool,
    as_of: NaiveDate,
) -> Result<Vec<BorrowedBook>> {
    let cutoff = as_of - Duration::days(LOAN_PERIOD_DAYS);

    let borrows = sqlx::query_as::<_, BorrowedBook>(
        r#"
        SELECT b.title AS title, br.borrow_date AS borrow_date, br.return_date AS return_date
        FROM borrows br
        JOIN books b ON b.book_id = br.book_id
        WHERE br.return_date IS NULL AND br.borrow_date < ?
        ORDER BY br.borrow_date, br.borrow_id
        "#,
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(borrows)
}

// ============================================================================
// REVIEW QUERIES
// ============================================================================

/// Insert a new review
///
/// Returns the review_id of the inserted review.
pub async fn insert_review(pool: &SqlitePool, review: &NewReview) -> Result<i64> {
    review.validate()?;

    let result = sqlx::query("INSERT INTO reviews (rating, comment, book_id) VALUES (?, ?, ?)")
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.book_id)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Count total reviews
pub async fn count_reviews(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Find reviews for a book, oldest first
pub async fn list_reviews_for_book(pool: &SqlitePool, book_id: i64) -> Result<Vec<Review>> {
    let reviews =
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE book_id = ? ORDER BY review_id")
            .bind(book_id)
            .fetch_all(pool)
            .await?;

    Ok(reviews)
}

// ============================================================================
// REPORT QUERIES
// ============================================================================

/// List all books sorted by title
pub async fn list_books_by_title(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// List books priced strictly above the given threshold, sorted by title
pub async fn list_books_priced_above(pool: &SqlitePool, min_price: f64) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE price > ? ORDER BY title")
        .bind(min_price)
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// List only the titles, in insertion order
pub async fn list_book_titles(pool: &SqlitePool) -> Result<Vec<String>> {
    let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM books ORDER BY book_id")
        .fetch_all(pool)
        .await?;

    Ok(titles)
}

/// A book title paired with the name of its publisher
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookWithPublisher {
    pub title: String,
    pub publisher_name: String,
}

/// List every book together with its publisher's name
pub async fn list_books_with_publishers(pool: &SqlitePool) -> Result<Vec<BookWithPublisher>> {
    let rows = sqlx::query_as::<_, BookWithPublisher>(
        r#"
        SELECT b.title AS title, p.name AS publisher_name
        FROM books b
        JOIN publishers p ON p.publisher_id = b.publisher_id
        ORDER BY b.book_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// A genre with the number of books linked to it
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GenreBookCount {
    pub name: String,
    pub book_count: i64,
}

/// List every genre with its linked book count
///
/// Genres with no links still appear, with a count of zero.
pub async fn list_genres_with_book_counts(pool: &SqlitePool) -> Result<Vec<GenreBookCount>> {
    let rows = sqlx::query_as::<_, GenreBookCount>(
        r#"
        SELECT g.name AS name, COUNT(bg.book_id) AS book_count
        FROM genres g
        LEFT JOIN book_genres bg ON bg.genre_id = g.genre_id
        GROUP BY g.genre_id, g.name
        ORDER BY g.genre_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// An author with the number of books they wrote
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorBookCount {
    pub author: String,
    pub book_count: i64,
}

/// Count books per author, alphabetically by author
pub async fn count_books_per_author(pool: &SqlitePool) -> Result<Vec<AuthorBookCount>> {
    let rows = sqlx::query_as::<_, AuthorBookCount>(
        r#"
        SELECT author, COUNT(*) AS book_count
        FROM books
        GROUP BY author
        ORDER BY author
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// A publisher with the average price of its books
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublisherAveragePrice {
    pub name: String,
    pub average_price: f64,
}

/// Average book price per publisher, alphabetically by publisher
///
/// Publishers without books are omitted; they have no average.
pub async fn average_price_per_publisher(
    pool: &SqlitePool,
) -> Result<Vec<PublisherAveragePrice>> {
    let rows = sqlx::query_as::<_, PublisherAveragePrice>(
        r#"
        SELECT p.name AS name, AVG(b.price) AS average_price
        FROM publishers p
        JOIN books b ON b.publisher_id = p.publisher_id
        GROUP BY p.publisher_id, p.name
        ORDER BY p.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List titles of books that have never been borrowed, in insertion order
pub async fn list_never_borrowed_titles(pool: &SqlitePool) -> Result<Vec<String>> {
    let titles: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT b.title
        FROM books b
        LEFT JOIN borrows br ON br.book_id = b.book_id
        WHERE br.borrow_id IS NULL
        ORDER BY b.book_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(titles)
}

/// A book title with its publication year
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookYear {
    pub title: String,
    pub year: i32,
}

/// List books by publication year, newest first
pub async fn list_books_by_year_desc(pool: &SqlitePool) -> Result<Vec<BookYear>> {
    let rows = sqlx::query_as::<_, BookYear>(
        "SELECT title, year FROM books ORDER BY year DESC, book_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// A book title with the number of times it was borrowed
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookBorrowCount {
    pub title: String,
    pub borrow_count: i64,
}

/// The most borrowed books, most popular first
///
/// Only books that were borrowed at least once are ranked. Ties are broken
/// by book_id so the ranking is stable.
pub async fn top_borrowed_books(pool: &SqlitePool, limit: i64) -> Result<Vec<BookBorrowCount>> {
    let rows = sqlx::query_as::<_, BookBorrowCount>(
        r#"
        SELECT b.title AS title, COUNT(br.borrow_id) AS borrow_count
        FROM books b
        JOIN borrows br ON br.book_id = b.book_id
        GROUP BY b.book_id, b.title
        ORDER BY borrow_count DESC, b.book_id
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// A book title with its average review rating
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookAverageRating {
    pub title: String,
    pub average_rating: f64,
}

/// Average rating per book, in insertion order
///
/// Books without reviews are omitted; they have no average.
pub async fn average_rating_per_book(pool: &SqlitePool) -> Result<Vec<BookAverageRating>> {
    let rows = sqlx::query_as::<_, BookAverageRating>(
        r#"
        SELECT b.title AS title, AVG(r.rating) AS average_rating
        FROM books b
        JOIN reviews r ON r.book_id = b.book_id
        GROUP BY b.book_id, b.title
        ORDER BY b.book_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Books with more than `min_reviews` reviews and an average rating strictly
/// above `min_rating`, in insertion order
pub async fn list_highly_rated_books(
    pool: &SqlitePool,
    min_reviews: i64,
    min_rating: f64,
) -> Result<Vec<BookAverageRating>> {
    let rows = sqlx::query_as::<_, BookAverageRating>(
        r#"
        SELECT b.title AS title, AVG(r.rating) AS average_rating
        FROM books b
        JOIN reviews r ON r.book_id = b.book_id
        GROUP BY b.book_id, b.title
        HAVING COUNT(r.review_id) > ? AND AVG(r.rating) > ?
        ORDER BY b.book_id
        "#,
    )
    .bind(min_reviews)
    .bind(min_rating)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// A flat, display-ready projection of one book
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub publisher_name: String,
    /// None when the book has no reviews
    pub average_rating: Option<f64>,
    pub borrow_count: i64,
}

/// Build the display summary for one book, looked up by exact title
pub async fn book_summary(pool: &SqlitePool, title: &str) -> Result<Option<BookSummary>> {
    let summary = sqlx::query_as::<_, BookSummary>(
        r#"
        SELECT
            b.title AS title,
            b.author AS author,
            p.name AS publisher_name,
            (SELECT AVG(r.rating) FROM reviews r WHERE r.book_id = b.book_id) AS average_rating,
            (SELECT COUNT(*) FROM borrows br WHERE br.book_id = b.book_id) AS borrow_count
        FROM books b
        JOIN publishers p ON p.publisher_id = b.publisher_id
        WHERE b.title = ?
        ORDER BY b.book_id
        LIMIT 1
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(summary)
}
