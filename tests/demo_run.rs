//! End-to-end test for the demo driver
//!
//! Runs the full 22-task sequence the CLI runs, against in-memory and
//! file-backed databases, and checks the state it leaves behind.

use librarium::storage::{queries, Database};
use librarium::tasks;

async fn assert_seeded_state(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let pool = db.pool();
    assert_eq!(queries::count_publishers(pool).await?, 3);
    assert_eq!(queries::count_books(pool).await?, 5);
    assert_eq!(queries::count_genres(pool).await?, 3);
    assert_eq!(queries::count_genre_links(pool).await?, 7);
    assert_eq!(queries::count_readers(pool).await?, 8);
    assert_eq!(queries::count_borrows(pool).await?, 2);
    assert_eq!(queries::count_reviews(pool).await?, 8);
    Ok(())
}

#[tokio::test]
async fn test_demo_completes_in_memory() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Creating in-memory database...");
    let db = Database::new_in_memory().await?;

    println!("2. Running the full task sequence...");
    tasks::run(&db).await?;

    println!("3. Verifying the seeded state...");
    assert_seeded_state(&db).await?;

    println!("Demo run completed");
    Ok(())
}

#[tokio::test]
async fn test_demo_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::new_in_memory().await?;

    // The first task resets the schema, so a second run starts clean
    // instead of doubling every row count.
    tasks::run(&db).await?;
    tasks::run(&db).await?;

    assert_seeded_state(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_demo_on_file_backed_database() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("library.db");

    println!("1. Creating database at {:?}...", db_path);
    let db = Database::new(&db_path).await?;
    assert!(db_path.exists());

    println!("2. Running the full task sequence...");
    tasks::run(&db).await?;
    assert_seeded_state(&db).await?;

    println!("3. Closing and reopening...");
    db.close().await?;

    let reopened = Database::new(&db_path).await?;
    println!("4. Verifying the data survived...");
    assert_seeded_state(&reopened).await?;

    let title = queries::find_book_by_title(reopened.pool(), "Dune")
        .await?
        .map(|book| book.title);
    assert_eq!(title.as_deref(), Some("Dune"));

    reopened.close().await?;
    Ok(())
}
