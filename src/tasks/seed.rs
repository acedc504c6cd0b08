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


//! Seed tasks for the demo driver
//!
//! Each function performs one seeding step against a fresh database and
//! returns the text shown in that task's result block. The fixture data
//! lives here as constants; later steps find earlier rows by name or title,
//! so running a step out of order fails with a not-found error instead of
//! silently skipping work.

use crate::error::{LibrariumError, Result};
use crate::storage::models::{NewBook, NewBorrow, NewGenre, NewPublisher, NewReader, NewReview};
use crate::storage::{queries, Database};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;

// ============================================================================
// FIXTURE DATA
// ============================================================================

pub const SAMPLE_PUBLISHERS: [&str; 3] = ["Penguin Classics", "Shambhala", "Ace Books"];

/// (title, author, year, price, index into SAMPLE_PUBLISHERS)
pub const SAMPLE_BOOKS: [(&str, &str, i32, f64, usize); 5] = [
    ("The Art of War", "Sun Tzu", 2020, 15.99, 0),
    ("The Book of Five Rings", "Miyamoto Musashi", 1645, 22.50, 1),
    ("Brave New World", "Aldous Huxley", 1932, 18.00, 0),
    ("1984", "George Orwell", 1949, 17.99, 2),
    ("Dune", "Frank Herbert", 1965, 25.00, 2),
];

pub const SAMPLE_GENRES: [&str; 3] = ["Fantasy", "Philosophy", "Military Strategy"];

/// (genre name, book title) pairs for the junction table
pub const GENRE_LINKS: [(&str, &str); 7] = [
    ("Military Strategy", "The Art of War"),
    ("Military Strategy", "The Book of Five Rings"),
    ("Philosophy", "Brave New World"),
    ("Philosophy", "1984"),
    ("Fantasy", "Brave New World"),
    ("Fantasy", "1984"),
    ("Fantasy", "Dune"),
];

pub const SAMPLE_READERS: [&str; 8] = [
    "James Holloway",
    "Emily Carter",
    "Sofia Reyes",
    "Daniel Okafor",
    "Grace Lindqvist",
    "Peter Marsh",
    "Hannah Weiss",
    "Oliver Trent",
];

/// The reader whose borrow history the demo records and lists
pub const BORROWER: &str = "Emily Carter";

/// (book title, borrow date, return date), dates as (year, month, day)
pub const SAMPLE_BORROWS: [(&str, (i32, u32, u32), Option<(i32, u32, u32)>); 2] = [
    ("1984", (2025, 10, 15), Some((2025, 11, 1))),
    ("Dune", (2025, 11, 1), None),
];

/// (book title, rating, comment)
pub const SAMPLE_REVIEWS: [(&str, f32, &str); 8] = [
    ("The Art of War", 5.0, "Timeless."),
    ("The Art of War", 4.5, "Dense but rewarding."),
    ("The Art of War", 4.9, "Required reading."),
    ("The Book of Five Rings", 4.8, "Sharp and practical."),
    ("The Book of Five Rings", 4.0, "A little repetitive."),
    ("Brave New World", 3.5, "Bleaker than I expected."),
    ("Brave New World", 4.0, "Still relevant."),
    ("1984", 5.0, "Masterpiece."),
];

fn to_date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        LibrariumError::internal(format!("invalid fixture date {}-{}-{}", year, month, day))
    })
}

// ============================================================================
// SEED STEPS
// ============================================================================

/// Drop everything and recreate the schema
pub async fn reset_database(db: &Database) -> Result<String> {
    db.reset().await?;
    Ok("Database dropped and schema recreated".to_string())
}

/// Insert the sample publishers
pub async fn add_publishers(pool: &SqlitePool) -> Result<String> {
    for name in SAMPLE_PUBLISHERS {
        queries::insert_publisher(pool, &NewPublisher::new(name)).await?;
    }

    Ok(format!(
        "Added {} publishers: {}",
        SAMPLE_PUBLISHERS.len(),
        SAMPLE_PUBLISHERS.join(", ")
    ))
}

/// Insert the sample books, each linked to an already-seeded publisher
///
/// Publishers are matched by position in the fixture, so this step fails
/// if the publisher step has not run.
pub async fn add_books(pool: &SqlitePool) -> Result<String> {
    let publishers = queries::list_publishers(pool).await?;

    for (title, author, year, price, publisher_idx) in SAMPLE_BOOKS {
        let publisher = publishers.get(publisher_idx).ok_or_else(|| {
            LibrariumError::not_found(format!(
                "publisher #{} for book '{}'",
                publisher_idx + 1,
                title
            ))
        })?;

        let book = NewBook::new(title, author, year, price, publisher.publisher_id);
        queries::insert_book(pool, &book).await?;
    }

    Ok(format!(
        "Added {} books across {} publishers",
        SAMPLE_BOOKS.len(),
        publishers.len()
    ))
}

/// Insert the sample genres and write the book/genre junction rows
///
/// Books are found by title lookup; a missing title aborts the step.
pub async fn add_genres_and_links(pool: &SqlitePool) -> Result<String> {
    let mut genre_ids: HashMap<&str, i64> = HashMap::new();
    for name in SAMPLE_GENRES {
        let genre_id = queries::insert_genre(pool, &NewGenre::new(name)).await?;
        genre_ids.insert(name, genre_id);
    }

    for (genre_name, book_title) in GENRE_LINKS {
        let genre_id = *genre_ids
            .get(genre_name)
            .ok_or_else(|| LibrariumError::not_found(format!("genre '{}'", genre_name)))?;
        let book = queries::find_book_by_title(pool, book_title)
            .await?
            .ok_or_else(|| LibrariumError::not_found(format!("book '{}'", book_title)))?;

        queries::link_book_genre(pool, book.book_id, genre_id).await?;
    }

    Ok(format!(
        "Added {} genres and {} book links",
        SAMPLE_GENRES.len(),
        GENRE_LINKS.len()
    ))
}

/// Register the sample readers and list them back
pub async fn add_readers(pool: &SqlitePool) -> Result<String> {
    for name in SAMPLE_READERS {
        queries::insert_reader(pool, &NewReader::new(name)).await?;
    }

    let mut lines: Vec<String> = Vec::new();
    for name in queries::list_reader_names(pool).await? {
        lines.push(format!("Reader: {}", name));
    }
    lines.push(format!("{} readers registered", SAMPLE_READERS.len()));

    Ok(lines.join("\n"))
}

/// Record the sample borrows for one reader, then list that reader's history
pub async fn add_borrows(pool: &SqlitePool) -> Result<String> {
    let reader = queries::find_reader_by_name(pool, BORROWER)
        .await?
        .ok_or_else(|| LibrariumError::not_found(format!("reader '{}'", BORROWER)))?;

    for (title, borrowed, returned) in SAMPLE_BORROWS {
        let book = queries::find_book_by_title(pool, title)
            .await?
            .ok_or_else(|| LibrariumError::not_found(format!("book '{}'", title)))?;

        let borrow = NewBorrow {
            reader_id: reader.reader_id,
            book_id: book.book_id,
            borrow_date: to_date(borrowed)?,
            return_date: returned.map(to_date).transpose()?,
        };
        queries::insert_borrow(pool, &borrow).await?;
    }

    let borrows = queries::list_borrows_for_reader(pool, reader.reader_id).await?;
    let mut lines = vec![format!(
        "{} has {} borrow records:",
        reader.full_name,
        borrows.len()
    )];
    for record in &borrows {
        let returned = match record.return_date {
            Some(date) => format!("Returned: {}", date),
            None => "Not returned yet".to_string(),
        };
        lines.push(format!(
            "  {}. Borrowed: {}. {}",
            record.title, record.borrow_date, returned
        ));
    }

    Ok(lines.join("\n"))
}

/// Insert the sample reviews, finding each book by title
pub async fn add_reviews(pool: &SqlitePool) -> Result<String> {
    for (title, rating, comment) in SAMPLE_REVIEWS {
        let book = queries::find_book_by_title(pool, title)
            .await?
            .ok_or_else(|| LibrariumError::not_found(format!("book '{}'", title)))?;

        queries::insert_review(pool, &NewReview::new(book.book_id, rating, comment)).await?;
    }

    Ok(format!("Added {} reviews", SAMPLE_REVIEWS.len()))
}
