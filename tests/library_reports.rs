//! Integration tests for the lending reports
//!
//! Seeds the full sample catalog through the public seed steps, then checks
//! every report query against values computed by hand from the fixture.

use chrono::NaiveDate;
use librarium::storage::{queries, Database};
use librarium::tasks::{report, seed};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fresh in-memory database with the complete sample data loaded
async fn seeded_db() -> Database {
    let db = Database::new_in_memory().await.expect("Failed to create database");
    let pool = db.pool();

    seed::add_publishers(pool).await.expect("publisher seed failed");
    seed::add_books(pool).await.expect("book seed failed");
    seed::add_genres_and_links(pool).await.expect("genre seed failed");
    seed::add_readers(pool).await.expect("reader seed failed");
    seed::add_borrows(pool).await.expect("borrow seed failed");
    seed::add_reviews(pool).await.expect("review seed failed");

    db
}

#[tokio::test]
async fn sorts_books_alphabetically_by_title() {
    let db = seeded_db().await;

    let books = queries::list_books_by_title(db.pool()).await.unwrap();
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();

    assert_eq!(
        titles,
        vec![
            "1984",
            "Brave New World",
            "Dune",
            "The Art of War",
            "The Book of Five Rings",
        ]
    );
}

#[tokio::test]
async fn filters_books_priced_above_threshold() {
    let db = seeded_db().await;

    let books = queries::list_books_priced_above(db.pool(), 20.0).await.unwrap();
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();

    assert_eq!(titles, vec!["Dune", "The Book of Five Rings"]);
    assert!(books.iter().all(|b| b.price > 20.0));
}

#[tokio::test]
async fn pairs_each_book_with_its_publisher() {
    let db = seeded_db().await;

    let rows = queries::list_books_with_publishers(db.pool()).await.unwrap();
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.title.as_str(), r.publisher_name.as_str()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("The Art of War", "Penguin Classics"),
            ("The Book of Five Rings", "Shambhala"),
            ("Brave New World", "Penguin Classics"),
            ("1984", "Ace Books"),
            ("Dune", "Ace Books"),
        ]
    );
}

#[tokio::test]
async fn counts_books_per_genre() {
    let db = seeded_db().await;

    let rows = queries::list_genres_with_book_counts(db.pool()).await.unwrap();
    let counts: Vec<(&str, i64)> = rows
        .iter()
        .map(|r| (r.name.as_str(), r.book_count))
        .collect();

    assert_eq!(
        counts,
        vec![("Fantasy", 3), ("Philosophy", 2), ("Military Strategy", 2)]
    );
}

#[tokio::test]
async fn counts_books_per_author() {
    let db = seeded_db().await;

    let rows = queries::count_books_per_author(db.pool()).await.unwrap();
    let counts: Vec<(&str, i64)> = rows
        .iter()
        .map(|r| (r.author.as_str(), r.book_count))
        .collect();

    // Every fixture author wrote exactly one book; rows are alphabetical
    assert_eq!(
        counts,
        vec![
            ("Aldous Huxley", 1),
            ("Frank Herbert", 1),
            ("George Orwell", 1),
            ("Miyamoto Musashi", 1),
            ("Sun Tzu", 1),
        ]
    );
}

#[tokio::test]
async fn averages_prices_per_publisher() {
    let db = seeded_db().await;

    let rows = queries::average_price_per_publisher(db.pool()).await.unwrap();
    assert_eq!(rows.len(), 3);

    // Alphabetical: Ace (17.99 + 25.00)/2, Penguin (15.99 + 18.00)/2, Shambhala 22.50
    assert_eq!(rows[0].name, "Ace Books");
    assert!((rows[0].average_price - 21.495).abs() < 1e-6);
    assert_eq!(rows[1].name, "Penguin Classics");
    assert!((rows[1].average_price - 16.995).abs() < 1e-6);
    assert_eq!(rows[2].name, "Shambhala");
    assert!((rows[2].average_price - 22.50).abs() < 1e-6);
}

#[tokio::test]
async fn finds_books_nobody_borrowed() {
    let db = seeded_db().await;

    let titles = queries::list_never_borrowed_titles(db.pool()).await.unwrap();

    // Only 1984 and Dune were ever lent out
    assert_eq!(
        titles,
        vec!["The Art of War", "The Book of Five Rings", "Brave New World"]
    );
}

#[tokio::test]
async fn orders_books_by_year_newest_first() {
    let db = seeded_db().await;

    let rows = queries::list_books_by_year_desc(db.pool()).await.unwrap();
    let years: Vec<(&str, i32)> = rows.iter().map(|r| (r.title.as_str(), r.year)).collect();

    assert_eq!(
        years,
        vec![
            ("The Art of War", 2020),
            ("Dune", 1965),
            ("1984", 1949),
            ("Brave New World", 1932),
            ("The Book of Five Rings", 1645),
        ]
    );
}

#[tokio::test]
async fn ranks_most_borrowed_books() {
    let db = seeded_db().await;

    let rows = queries::top_borrowed_books(db.pool(), 3).await.unwrap();

    // Both lent books have one borrow each; 1984 was inserted first.
    // Never-borrowed books do not pad the ranking.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "1984");
    assert_eq!(rows[0].borrow_count, 1);
    assert_eq!(rows[1].title, "Dune");
    assert_eq!(rows[1].borrow_count, 1);
}

#[tokio::test]
async fn averages_ratings_per_reviewed_book() {
    let db = seeded_db().await;

    let rows = queries::average_rating_per_book(db.pool()).await.unwrap();
    assert_eq!(rows.len(), 4); // Dune has no reviews

    let expected = [
        ("The Art of War", 4.8),
        ("The Book of Five Rings", 4.4),
        ("Brave New World", 3.75),
        ("1984", 5.0),
    ];
    for (row, (title, avg)) in rows.iter().zip(expected) {
        assert_eq!(row.title, title);
        assert!(
            (row.average_rating - avg).abs() < 1e-3,
            "{}: expected about {}, got {}",
            title,
            avg,
            row.average_rating
        );
    }
}

#[tokio::test]
async fn selects_highly_rated_books() {
    let db = seeded_db().await;

    // More than one review and an average strictly above 4.0
    let rows = queries::list_highly_rated_books(db.pool(), 1, 4.0).await.unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();

    // Brave New World averages 3.75; 1984 has only one review
    assert_eq!(titles, vec!["The Art of War", "The Book of Five Rings"]);
}

#[tokio::test]
async fn reports_overdue_borrows_relative_to_date() {
    let db = seeded_db().await;
    let pool = db.pool();

    // Dune went out on 2025-11-01 and never came back.
    // Exactly 30 days later it is still fine.
    let on_day_30 = queries::list_overdue_borrows(pool, date(2025, 12, 1)).await.unwrap();
    assert!(on_day_30.is_empty());

    // One day later it is overdue. 1984 was returned, so it never shows up.
    let on_day_31 = queries::list_overdue_borrows(pool, date(2025, 12, 2)).await.unwrap();
    assert_eq!(on_day_31.len(), 1);
    assert_eq!(on_day_31[0].title, "Dune");
    assert_eq!(on_day_31[0].borrow_date, date(2025, 11, 1));
}

#[tokio::test]
async fn lists_borrow_history_for_the_borrower() {
    let db = seeded_db().await;
    let pool = db.pool();

    let reader = queries::find_reader_by_name(pool, seed::BORROWER)
        .await
        .unwrap()
        .expect("Borrower missing");
    let history = queries::list_borrows_for_reader(pool, reader.reader_id).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].title, "1984");
    assert_eq!(history[0].return_date, Some(date(2025, 11, 1)));
    assert_eq!(history[1].title, "Dune");
    assert_eq!(history[1].return_date, None);

    // The other seven readers have no history
    let other = queries::find_reader_by_name(pool, "James Holloway")
        .await
        .unwrap()
        .expect("Reader missing");
    assert!(queries::list_borrows_for_reader(pool, other.reader_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn paginates_catalog_without_trailing_empty_page() {
    let db = seeded_db().await;
    let pool = db.pool();

    let total = queries::count_books(pool).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(report::page_count(total, 2), 3);

    let page1 = queries::list_books_page(pool, 2, 0).await.unwrap();
    let page2 = queries::list_books_page(pool, 2, 2).await.unwrap();
    let page3 = queries::list_books_page(pool, 2, 4).await.unwrap();

    let titles = |page: &[librarium::storage::Book]| -> Vec<String> {
        page.iter().map(|b| b.title.clone()).collect()
    };

    assert_eq!(titles(&page1), vec!["The Art of War", "The Book of Five Rings"]);
    assert_eq!(titles(&page2), vec!["Brave New World", "1984"]);
    assert_eq!(titles(&page3), vec!["Dune"]);
}

#[tokio::test]
async fn paginates_evenly_divisible_catalog() {
    let db = seeded_db().await;
    let pool = db.pool();

    // Dropping Dune takes its open borrow with it and leaves four books,
    // which split into exactly two full pages.
    let dune = queries::find_book_by_title(pool, "Dune").await.unwrap().unwrap();
    queries::delete_book(pool, dune.book_id).await.unwrap();

    let total = queries::count_books(pool).await.unwrap();
    assert_eq!(total, 4);
    assert_eq!(report::page_count(total, 2), 2);
    assert!(queries::list_borrows_for_book(pool, dune.book_id).await.unwrap().is_empty());

    let last_page = queries::list_books_page(pool, 2, 2).await.unwrap();
    assert_eq!(last_page.len(), 2);
    assert_eq!(last_page[1].title, "1984");

    let rendered = report::paginated_books(pool).await.unwrap();
    assert!(rendered.starts_with("4 books, 2 per page, 2 page(s)"));
    assert!(!rendered.contains("--- Page 3"));
}

#[tokio::test]
async fn summarizes_a_single_book() {
    let db = seeded_db().await;

    let summary = queries::book_summary(db.pool(), "The Book of Five Rings")
        .await
        .unwrap()
        .expect("Summary missing");

    assert_eq!(summary.author, "Miyamoto Musashi");
    assert_eq!(summary.publisher_name, "Shambhala");
    assert_eq!(summary.borrow_count, 0);
    let avg = summary.average_rating.expect("Average missing");
    assert!((avg - 4.4).abs() < 1e-3);
}

#[tokio::test]
async fn report_bodies_render_the_fixture() {
    let db = seeded_db().await;
    let pool = db.pool();

    let sorted = report::books_sorted_by_title(pool).await.unwrap();
    assert!(sorted.starts_with("1984 - by George Orwell"));
    assert!(sorted.ends_with("The Book of Five Rings - by Miyamoto Musashi"));

    let priced = report::books_priced_above(pool).await.unwrap();
    assert_eq!(
        priced,
        "Dune - by Frank Herbert - 25.00\nThe Book of Five Rings - by Miyamoto Musashi - 22.50"
    );

    let pages = report::paginated_books(pool).await.unwrap();
    assert!(pages.starts_with("5 books, 2 per page, 3 page(s)"));
    assert!(pages.contains("--- Page 3 of 3 ---"));
    assert!(pages.ends_with("  [Book] Dune"));

    let summary = report::single_book_summary(pool).await.unwrap();
    assert!(summary.contains("Title: The Book of Five Rings"));
    assert!(summary.contains("Publisher: Shambhala"));
    assert!(summary.contains("Average rating: 4.40"));
    assert!(summary.contains("Times borrowed: 0"));

    let overdue = report::overdue_borrows(pool, date(2025, 12, 15)).await.unwrap();
    assert!(overdue.starts_with("Found 1 overdue borrow(s):"));
    assert!(overdue.contains("Dune (borrowed 2025-11-01, not returned)"));
}
