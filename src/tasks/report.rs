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


//! Report tasks for the demo driver
//!
//! Read-only counterparts to the seed steps: each function runs one query,
//! formats the rows into the text shown in that task's result block, and
//! never writes. Thresholds and page sizes are fixed demo parameters, kept
//! as constants here.

use crate::error::{LibrariumError, Result};
use crate::storage::queries;
use chrono::NaiveDate;
use sqlx::SqlitePool;

// ============================================================================
// REPORT PARAMETERS
// ============================================================================

/// Price filter for the expensive-books report
pub const PRICE_THRESHOLD: f64 = 20.0;

/// Books per page in the paginated listing
pub const PAGE_SIZE: i64 = 2;

/// How many books the popularity ranking shows
pub const TOP_BORROWED_LIMIT: i64 = 3;

/// A book is highly rated with more than this many reviews...
pub const HIGHLY_RATED_MIN_REVIEWS: i64 = 1;

/// ...and an average rating strictly above this
pub const HIGHLY_RATED_MIN_RATING: f64 = 4.0;

/// The book whose summary the final task prints
pub const SUMMARY_TITLE: &str = "The Book of Five Rings";

/// Number of pages needed to show `total` items, `page_size` at a time
///
/// The final partial page counts as a page; zero items need zero pages.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

// ============================================================================
// REPORT STEPS
// ============================================================================

/// Every book, alphabetically by title
pub async fn books_sorted_by_title(pool: &SqlitePool) -> Result<String> {
    let books = queries::list_books_by_title(pool).await?;
    if books.is_empty() {
        return Ok("The catalog is empty".to_string());
    }

    let lines: Vec<String> = books
        .iter()
        .map(|book| format!("{} - by {}", book.title, book.author))
        .collect();

    Ok(lines.join("\n"))
}

/// Books priced above [`PRICE_THRESHOLD`]
pub async fn books_priced_above(pool: &SqlitePool) -> Result<String> {
    let books = queries::list_books_priced_above(pool, PRICE_THRESHOLD).await?;
    if books.is_empty() {
        return Ok(format!("No books priced above {:.2}", PRICE_THRESHOLD));
    }

    let lines: Vec<String> = books
        .iter()
        .map(|book| format!("{} - by {} - {:.2}", book.title, book.author, book.price))
        .collect();

    Ok(lines.join("\n"))
}

/// Only the titles, one per line
pub async fn book_titles(pool: &SqlitePool) -> Result<String> {
    let titles = queries::list_book_titles(pool).await?;
    if titles.is_empty() {
        return Ok("The catalog is empty".to_string());
    }

    Ok(titles.join("\n"))
}

/// Every book with the name of its publisher
pub async fn books_with_publishers(pool: &SqlitePool) -> Result<String> {
    let rows = queries::list_books_with_publishers(pool).await?;
    if rows.is_empty() {
        return Ok("The catalog is empty".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{}, published by {}", row.title, row.publisher_name))
        .collect();

    Ok(lines.join("\n"))
}

/// Every genre with its linked book count, including empty genres
pub async fn genres_with_book_counts(pool: &SqlitePool) -> Result<String> {
    let rows = queries::list_genres_with_book_counts(pool).await?;
    if rows.is_empty() {
        return Ok("No genres defined".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("Genre {} has {} book(s)", row.name, row.book_count))
        .collect();

    Ok(lines.join("\n"))
}

/// Borrows that are overdue as of the given date
pub async fn overdue_borrows(pool: &SqlitePool, as_of: NaiveDate) -> Result<String> {
    let overdue = queries::list_overdue_borrows(pool, as_of).await?;
    if overdue.is_empty() {
        return Ok("No overdue borrows".to_string());
    }

    let mut lines = vec![format!("Found {} overdue borrow(s):", overdue.len())];
    for record in &overdue {
        lines.push(format!(
            "  {} (borrowed {}, not returned)",
            record.title, record.borrow_date
        ));
    }

    Ok(lines.join("\n"))
}

/// How many books each author wrote
pub async fn books_per_author(pool: &SqlitePool) -> Result<String> {
    let rows = queries::count_books_per_author(pool).await?;
    if rows.is_empty() {
        return Ok("The catalog is empty".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{} wrote {} book(s)", row.author, row.book_count))
        .collect();

    Ok(lines.join("\n"))
}

/// Average book price per publisher
pub async fn average_price_per_publisher(pool: &SqlitePool) -> Result<String> {
    let rows = queries::average_price_per_publisher(pool).await?;
    if rows.is_empty() {
        return Ok("No publisher has any books".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{}: average price {:.2}", row.name, row.average_price))
        .collect();

    Ok(lines.join("\n"))
}

/// Books nobody has ever borrowed
pub async fn never_borrowed_books(pool: &SqlitePool) -> Result<String> {
    let titles = queries::list_never_borrowed_titles(pool).await?;
    if titles.is_empty() {
        return Ok("Every book has been borrowed at least once".to_string());
    }

    let mut lines = vec![format!("Found {} book(s) never borrowed:", titles.len())];
    for title in &titles {
        lines.push(format!("  {}", title));
    }

    Ok(lines.join("\n"))
}

/// Books by publication year, newest first
pub async fn books_by_year(pool: &SqlitePool) -> Result<String> {
    let rows = queries::list_books_by_year_desc(pool).await?;
    if rows.is_empty() {
        return Ok("The catalog is empty".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{} ({})", row.title, row.year))
        .collect();

    Ok(lines.join("\n"))
}

/// The [`TOP_BORROWED_LIMIT`] most borrowed books
pub async fn top_borrowed(pool: &SqlitePool) -> Result<String> {
    let rows = queries::top_borrowed_books(pool, TOP_BORROWED_LIMIT).await?;
    if rows.is_empty() {
        return Ok("No books have been borrowed yet".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(rank, row)| {
            format!("{}. {} - borrowed {} time(s)", rank + 1, row.title, row.borrow_count)
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Average review rating per reviewed book
pub async fn average_rating_per_book(pool: &SqlitePool) -> Result<String> {
    let rows = queries::average_rating_per_book(pool).await?;
    if rows.is_empty() {
        return Ok("No books have reviews yet".to_string());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{}: rated {:.2}", row.title, row.average_rating))
        .collect();

    Ok(lines.join("\n"))
}

/// Books with enough reviews and a high enough average to count as popular
pub async fn highly_rated_books(pool: &SqlitePool) -> Result<String> {
    let rows = queries::list_highly_rated_books(
        pool,
        HIGHLY_RATED_MIN_REVIEWS,
        HIGHLY_RATED_MIN_RATING,
    )
    .await?;
    if rows.is_empty() {
        return Ok("No books match the rating criteria".to_string());
    }

    let mut lines = vec![format!(
        "Found {} book(s) with more than {} review(s) and rating above {:.1}:",
        rows.len(),
        HIGHLY_RATED_MIN_REVIEWS,
        HIGHLY_RATED_MIN_RATING
    )];
    for row in &rows {
        lines.push(format!("  {}: rated {:.2}", row.title, row.average_rating));
    }

    Ok(lines.join("\n"))
}

/// The whole catalog, [`PAGE_SIZE`] books at a time
///
/// Prints exactly as many pages as the catalog needs: a final partial page
/// is shown, and no empty trailing page follows an exact multiple.
pub async fn paginated_books(pool: &SqlitePool) -> Result<String> {
    let total = queries::count_books(pool).await?;
    if total == 0 {
        return Ok("The catalog is empty".to_string());
    }

    let pages = page_count(total, PAGE_SIZE);
    let mut lines = vec![format!(
        "{} books, {} per page, {} page(s)",
        total, PAGE_SIZE, pages
    )];

    for page in 0..pages {
        lines.push(format!("--- Page {} of {} ---", page + 1, pages));
        let books = queries::list_books_page(pool, PAGE_SIZE, page * PAGE_SIZE).await?;
        for book in &books {
            lines.push(format!("  [Book] {}", book.title));
        }
    }

    Ok(lines.join("\n"))
}

/// Flat display summary of [`SUMMARY_TITLE`]
pub async fn single_book_summary(pool: &SqlitePool) -> Result<String> {
    let summary = queries::book_summary(pool, SUMMARY_TITLE)
        .await?
        .ok_or_else(|| LibrariumError::not_found(format!("book '{}'", SUMMARY_TITLE)))?;

    let rating = match summary.average_rating {
        Some(avg) => format!("{:.2}", avg),
        None => "no reviews yet".to_string(),
    };

    let lines = vec![
        format!("Title: {}", summary.title),
        format!("Author: {}", summary.author),
        format!("Publisher: {}", summary.publisher_name),
        format!("Average rating: {}", rating),
        format!("Times borrowed: {}", summary.borrow_count),
    ];

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 2), 0);
        assert_eq!(page_count(1, 2), 1);
        assert_eq!(page_count(2, 2), 1);
        assert_eq!(page_count(3, 2), 2);
        assert_eq!(page_count(4, 2), 2); // exact multiple, no empty trailing page
        assert_eq!(page_count(5, 2), 3);
        assert_eq!(page_count(5, 1), 5);
        assert_eq!(page_count(5, 10), 1);
        assert_eq!(page_count(5, 0), 0);
    }

    #[tokio::test]
    async fn test_reports_on_empty_database() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let pool = db.pool();

        assert_eq!(books_sorted_by_title(pool).await.unwrap(), "The catalog is empty");
        assert_eq!(
            books_priced_above(pool).await.unwrap(),
            "No books priced above 20.00"
        );
        assert_eq!(
            overdue_borrows(pool, chrono::Utc::now().date_naive()).await.unwrap(),
            "No overdue borrows"
        );
        assert_eq!(top_borrowed(pool).await.unwrap(), "No books have been borrowed yet");
        assert_eq!(paginated_books(pool).await.unwrap(), "The catalog is empty");
    }

    #[tokio::test]
    async fn test_summary_of_missing_book_fails() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let err = single_book_summary(db.pool()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
