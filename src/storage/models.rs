//! Database models for Librarium
//!
//! This module contains the entity models for the library lending schema:
//! the catalog (publishers, genres, books), the lending side (readers,
//! borrows), and reviews.
//!
//! # SQLite Adaptations
//! - Dates stored as TEXT in ISO 8601 format (YYYY-MM-DD)
//! - Many-to-many relationships use junction tables
//! - Primary keys are auto-increment rowids
//!
//! Insert payloads (`New*` structs) validate themselves before they reach
//! SQLite, so callers get a message naming the offending field instead of a
//! bare CHECK failure. One rule cannot live in the schema at all: CHECK
//! expressions must be deterministic, so the "publication year is not in the
//! future" bound is only enforced here.

use crate::error::{LibrariumError, Result};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// DOMAIN CONSTANTS
// ============================================================================

/// Earliest publication year accepted by the catalog
pub const BOOK_YEAR_MIN: i32 = 1600;

/// Maximum lengths, in characters, matching the schema CHECK constraints
pub const BOOK_TITLE_MAX_CHARS: usize = 255;
pub const PUBLISHER_NAME_MAX_CHARS: usize = 150;
pub const GENRE_NAME_MAX_CHARS: usize = 150;
pub const READER_NAME_MAX_CHARS: usize = 255;
pub const REVIEW_COMMENT_MAX_CHARS: usize = 1000;

/// Review ratings are fractional and inclusive on both ends
pub const RATING_MIN: f32 = 1.0;
pub const RATING_MAX: f32 = 5.0;

/// A borrow is overdue once it has been out for more than this many days
pub const LOAN_PERIOD_DAYS: i64 = 30;

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Publisher - a company that publishes books
///
/// Books hold a required foreign key to their publisher. A publisher with
/// books cannot be deleted (ON DELETE RESTRICT).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Publisher {
    pub publisher_id: i64,
    pub name: String,
}

/// Genre - a classification label, linked to books many-to-many
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Genre {
    pub genre_id: i64,
    pub name: String,
}

/// Book - a catalog record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Book {
    /// Primary key (auto-increment)
    pub book_id: i64,
    pub title: String,
    pub author: String,
    /// Publication year, within [`BOOK_YEAR_MIN`]..=current year
    pub year: i32,
    pub price: f64,
    pub publisher_id: i64,
}

/// Reader - a person who borrows books
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reader {
    pub reader_id: i64,
    pub full_name: String,
}

/// Borrow - one lending event
///
/// `return_date` stays NULL while the book is out. Nothing stops a row from
/// claiming it was returned before it was borrowed; the schema records what
/// the librarian typed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Borrow {
    pub borrow_id: i64,
    pub reader_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    #[sqlx(default)]
    pub return_date: Option<NaiveDate>,
}

impl Borrow {
    /// Has the book come back?
    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }

    /// Is this borrow overdue as of the given date?
    ///
    /// A borrow is overdue when the book is still out and was borrowed
    /// strictly more than [`LOAN_PERIOD_DAYS`] days before `as_of`. A borrow
    /// made exactly [`LOAN_PERIOD_DAYS`] days ago is not yet overdue.
    pub fn is_overdue_as_of(&self, as_of: NaiveDate) -> bool {
        self.return_date.is_none() && self.borrow_date < as_of - Duration::days(LOAN_PERIOD_DAYS)
    }
}

/// Review - a fractional rating with an optional comment
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub review_id: i64,
    pub rating: f32,
    pub comment: String,
    pub book_id: i64,
}

// ============================================================================
// NEW RECORD STRUCTS (for inserts)
// ============================================================================

/// New publisher record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPublisher {
    pub name: String,
}

impl NewPublisher {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("publisher name", &self.name, PUBLISHER_NAME_MAX_CHARS)
    }
}

/// New genre record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
}

impl NewGenre {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("genre name", &self.name, GENRE_NAME_MAX_CHARS)
    }
}

/// New book record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub price: f64,
    pub publisher_id: i64,
}

impl NewBook {
    pub fn new<S: Into<String>>(title: S, author: S, year: i32, price: f64, publisher_id: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            price,
            publisher_id,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("book title", &self.title, BOOK_TITLE_MAX_CHARS)?;
        validate_name("book author", &self.author, BOOK_TITLE_MAX_CHARS)?;

        let current_year = Utc::now().year();
        if self.year < BOOK_YEAR_MIN || self.year > current_year {
            return Err(LibrariumError::validation(format!(
                "book year {} is outside {}..={}",
                self.year, BOOK_YEAR_MIN, current_year
            )));
        }

        Ok(())
    }
}

/// New reader record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReader {
    pub full_name: String,
}

impl NewReader {
    pub fn new<S: Into<String>>(full_name: S) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("reader name", &self.full_name, READER_NAME_MAX_CHARS)
    }
}

/// New borrow record for insertion
///
/// Borrows carry no validation of their own. The foreign keys are checked by
/// SQLite and the dates are deliberately unconstrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBorrow {
    pub reader_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// New review record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub book_id: i64,
    pub rating: f32,
    pub comment: String,
}

impl NewReview {
    pub fn new<S: Into<String>>(book_id: i64, rating: f32, comment: S) -> Self {
        Self {
            book_id,
            rating,
            comment: comment.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(LibrariumError::validation(format!(
                "review rating {} is outside {}..={}",
                self.rating, RATING_MIN, RATING_MAX
            )));
        }
        if self.comment.chars().count() > REVIEW_COMMENT_MAX_CHARS {
            return Err(LibrariumError::validation(format!(
                "review comment exceeds {} characters",
                REVIEW_COMMENT_MAX_CHARS
            )));
        }
        Ok(())
    }
}

// Shared rule for required, length-capped text fields. SQLite's length()
// counts characters on TEXT values, so we count chars here too.
fn validate_name(field: &str, value: &str, max_chars: usize) -> Result<()> {
    if value.is_empty() {
        return Err(LibrariumError::validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max_chars {
        return Err(LibrariumError::validation(format!(
            "{} exceeds {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_book_year_bounds() {
        let current_year = Utc::now().year();

        let ok = NewBook::new("Dune", "Frank Herbert", 1965, 25.0, 1);
        assert!(ok.validate().is_ok());

        let oldest = NewBook::new("Hamlet", "William Shakespeare", BOOK_YEAR_MIN, 9.99, 1);
        assert!(oldest.validate().is_ok());

        let this_year = NewBook::new("New Release", "Somebody", current_year, 30.0, 1);
        assert!(this_year.validate().is_ok());

        let too_old = NewBook::new("Scroll", "Anonymous", BOOK_YEAR_MIN - 1, 5.0, 1);
        assert!(too_old.validate().is_err());

        let future = NewBook::new("Not Yet Written", "Somebody", current_year + 1, 30.0, 1);
        assert!(future.validate().is_err());
    }

    #[test]
    fn test_book_title_required_and_capped() {
        let empty = NewBook::new("", "Author", 2000, 10.0, 1);
        assert!(empty.validate().is_err());

        let long_title: String = "x".repeat(BOOK_TITLE_MAX_CHARS + 1);
        let too_long = NewBook {
            title: long_title,
            author: "Author".into(),
            year: 2000,
            price: 10.0,
            publisher_id: 1,
        };
        assert!(too_long.validate().is_err());

        let at_limit = NewBook {
            title: "x".repeat(BOOK_TITLE_MAX_CHARS),
            author: "Author".into(),
            year: 2000,
            price: 10.0,
            publisher_id: 1,
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_publisher_and_reader_names() {
        assert!(NewPublisher::new("Ace Books").validate().is_ok());
        assert!(NewPublisher::new("").validate().is_err());
        assert!(NewPublisher::new("x".repeat(151)).validate().is_err());

        assert!(NewReader::new("Emily Carter").validate().is_ok());
        assert!(NewReader::new("").validate().is_err());
    }

    #[test]
    fn test_review_rating_range() {
        assert!(NewReview::new(1, 1.0, "").validate().is_ok());
        assert!(NewReview::new(1, 5.0, "").validate().is_ok());
        assert!(NewReview::new(1, 4.5, "Good").validate().is_ok());
        assert!(NewReview::new(1, 0.5, "").validate().is_err());
        assert!(NewReview::new(1, 5.5, "").validate().is_err());
    }

    #[test]
    fn test_review_comment_cap() {
        let at_limit = NewReview::new(1, 3.0, "x".repeat(REVIEW_COMMENT_MAX_CHARS));
        assert!(at_limit.validate().is_ok());

        let over = NewReview::new(1, 3.0, "x".repeat(REVIEW_COMMENT_MAX_CHARS + 1));
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_overdue_boundary_is_exclusive() {
        let as_of = date(2026, 1, 31);

        let mut borrow = Borrow {
            borrow_id: 1,
            reader_id: 1,
            book_id: 1,
            borrow_date: date(2026, 1, 1), // exactly 30 days before as_of
            return_date: None,
        };
        assert!(!borrow.is_overdue_as_of(as_of));

        borrow.borrow_date = date(2025, 12, 31); // 31 days out
        assert!(borrow.is_overdue_as_of(as_of));

        // Returned books are never overdue, however old the borrow is
        borrow.return_date = Some(date(2026, 1, 5));
        assert!(!borrow.is_overdue_as_of(as_of));
        assert!(borrow.is_returned());
    }
}
