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


use clap::Parser;
use librarium::storage::Database;
use librarium::tasks;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "librarium-cli")]
#[command(about = "Seeds the library lending database and prints the demo reports", long_about = None)]
struct Cli {
    /// Path to the SQLite database file (defaults to LIBRARIUM_DB or the
    /// platform data directory)
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Run against a throwaway in-memory database instead of a file
    #[arg(long, conflicts_with = "database")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up LIBRARIUM_DB from a .env file if one is present
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let db = if cli.in_memory {
        Database::new_in_memory().await?
    } else {
        let path = cli
            .database
            .or_else(|| std::env::var("LIBRARIUM_DB").ok().map(PathBuf::from))
            .unwrap_or_else(Database::get_default_path);
        println!("Using database at {}", path.display());
        Database::new(&path).await?
    };

    tasks::run(&db).await?;
    db.close().await?;

    Ok(())
}
