//! Shared fixtures: an isolated, migrated SQLite database per test

#![allow(dead_code)]

use sqlx::SqlitePool;
use tempfile::TempDir;

use stacks_server::{
    config::DatabaseConfig,
    repository::{self, Repository},
    services::Services,
};

pub struct TestDb {
    // Keeps the database directory alive for the duration of the test
    _dir: TempDir,
    pub pool: SqlitePool,
    pub services: Services,
}

pub async fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("library.db").display()),
        max_connections: 8,
        min_connections: 1,
        busy_timeout_ms: 30_000,
    };

    let pool = repository::connect(&config)
        .await
        .expect("Failed to open test database");
    repository::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    let services = Services::new(Repository::new(pool.clone()));

    TestDb {
        _dir: dir,
        pool,
        services,
    }
}

pub async fn add_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO User (Username, Email, Password) VALUES (?, ?, 'x')")
        .bind(username)
        .bind(format!("{}@example.org", username))
        .execute(pool)
        .await
        .expect("Failed to insert user")
        .last_insert_rowid()
}

pub async fn add_book(pool: &SqlitePool, title: &str, author: &str, genres: &[&str]) -> i64 {
    let book_id = sqlx::query("INSERT INTO Book (Title, Author, Abstract, CoverUrl) VALUES (?, ?, NULL, NULL)")
        .bind(title)
        .bind(author)
        .execute(pool)
        .await
        .expect("Failed to insert book")
        .last_insert_rowid();

    for genre in genres {
        sqlx::query("INSERT INTO Genre (bookID, genre) VALUES (?, ?)")
            .bind(book_id)
            .bind(*genre)
            .execute(pool)
            .await
            .expect("Failed to insert genre");
    }

    book_id
}

pub async fn loan_rows_for_book(pool: &SqlitePool, book_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM Loaned WHERE bookID = ?")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count loans")
}

/// A small catalog; returns the ids in insertion order
pub struct Catalog {
    pub dune: i64,
    pub hobbit: i64,
    pub nineteen_eighty_four: i64,
    pub dracula: i64,
    pub frankenstein: i64,
    pub odyssey: i64,
    pub mountains: i64,
}

pub async fn seed_catalog(pool: &SqlitePool) -> Catalog {
    Catalog {
        dune: add_book(pool, "Dune", "Frank Herbert", &["Science Fiction", "Adventure"]).await,
        hobbit: add_book(
            pool,
            "The Hobbit",
            "J.R.R. Tolkien",
            &["Fantasy", "Adventure", "Fantasy", "fantasy"],
        )
        .await,
        nineteen_eighty_four: add_book(
            pool,
            "1984",
            "George Orwell",
            &["Dystopian", "Political Fiction"],
        )
        .await,
        dracula: add_book(pool, "Dracula", "Bram Stoker", &["Gothic", "Horror"]).await,
        frankenstein: add_book(
            pool,
            "Frankenstein",
            "Mary Shelley",
            &["Gothic", "Science Fiction"],
        )
        .await,
        odyssey: add_book(pool, "the Odyssey", "Homer", &["Classic", "Epic"]).await,
        mountains: add_book(
            pool,
            "At the Mountains of Madness",
            "H. P. Lovecraft",
            &["Horror, Cosmic"],
        )
        .await,
    }
}
