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


//! The demo driver: a fixed sequence of seed and report tasks
//!
//! [`run`] executes all twenty-two tasks in order against one database,
//! printing each task's title, status, and result block to the console.
//! The sequence aborts on the first failure: every step returns its error to
//! the runner, and a step that depends on earlier data fails loudly rather
//! than seeding around the gap.

pub mod report;
pub mod seed;

use crate::console::{self, TaskStatus};
use crate::error::Result;
use crate::storage::Database;
use chrono::Utc;
use std::future::Future;

/// Run the full demo sequence against the given database
///
/// Seed steps and report steps interleave in a fixed order, so each report
/// sees exactly the data the steps before it created. Returns the first
/// error encountered; everything after the failing task is skipped.
pub async fn run(db: &Database) -> Result<()> {
    let pool = db.pool();
    let today = Utc::now().date_naive();

    run_task("Task 1: Reset the database", seed::reset_database(db)).await?;
    run_task("Task 2: Add publishers", seed::add_publishers(pool)).await?;
    run_task("Task 3: Add books", seed::add_books(pool)).await?;
    run_task(
        "Task 4: All books sorted by title",
        report::books_sorted_by_title(pool),
    )
    .await?;
    run_task(
        "Task 5: Books priced above 20.00",
        report::books_priced_above(pool),
    )
    .await?;
    run_task("Task 6: Book titles only", report::book_titles(pool)).await?;
    run_task(
        "Task 7: Books with their publishers",
        report::books_with_publishers(pool),
    )
    .await?;
    run_task(
        "Task 8: Add genres and link books",
        seed::add_genres_and_links(pool),
    )
    .await?;
    run_task(
        "Task 9: Book count per genre",
        report::genres_with_book_counts(pool),
    )
    .await?;
    run_task("Task 10: Register readers", seed::add_readers(pool)).await?;
    run_task("Task 11: Record borrows", seed::add_borrows(pool)).await?;
    run_task(
        "Task 12: Overdue borrows",
        report::overdue_borrows(pool, today),
    )
    .await?;
    run_task(
        "Task 13: Book count per author",
        report::books_per_author(pool),
    )
    .await?;
    run_task(
        "Task 14: Average price per publisher",
        report::average_price_per_publisher(pool),
    )
    .await?;
    run_task(
        "Task 15: Books never borrowed",
        report::never_borrowed_books(pool),
    )
    .await?;
    run_task(
        "Task 16: Books by year, newest first",
        report::books_by_year(pool),
    )
    .await?;
    run_task(
        "Task 17: Top 3 most borrowed books",
        report::top_borrowed(pool),
    )
    .await?;
    run_task("Task 18: Add reviews", seed::add_reviews(pool)).await?;
    run_task(
        "Task 19: Average rating per book",
        report::average_rating_per_book(pool),
    )
    .await?;
    run_task(
        "Task 20: Highly rated books",
        report::highly_rated_books(pool),
    )
    .await?;
    run_task("Task 21: Paginated catalog", report::paginated_books(pool)).await?;
    run_task("Task 22: Book summary", report::single_book_summary(pool)).await?;

    Ok(())
}

/// Frame one task: title, await the work, then status and result block
async fn run_task(title: &str, task: impl Future<Output = Result<String>>) -> Result<()> {
    console::task_title(title);

    match task.await {
        Ok(body) => {
            console::task_status(TaskStatus::Success);
            console::task_result(&body);
            Ok(())
        }
        Err(err) => {
            console::task_status(TaskStatus::Failure);
            console::task_result(&err.user_message());
            Err(err)
        }
    }
}
