//! Loans repository for database operations

use std::collections::HashSet;

use sqlx::{error::ErrorKind, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        ids::{BookId, LoanId, UserId},
        loan::{ActiveLoan, Loan},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Create a loan if the book is available.
    ///
    /// The conditional insert against the unique index on `Loaned(bookID)` is the
    /// availability check: it either takes the book or inserts nothing. The
    /// holder is then read inside the same write transaction, so the failure kind
    /// reflects the row that actually blocked the insert.
    pub async fn create(&self, user_id: UserId, book_id: BookId) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, LoanId>(
            r#"
            INSERT INTO Loaned (userID, bookID)
            VALUES (?, ?)
            ON CONFLICT(bookID) DO NOTHING
            RETURNING loanID
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await;

        let inserted = match inserted {
            Ok(inserted) => inserted,
            Err(e) if is_foreign_key_violation(&e) => {
                let book_exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM Book WHERE bookID = ?)")
                        .bind(book_id)
                        .fetch_one(&mut *tx)
                        .await?;
                tx.rollback().await?;
                return Err(if book_exists {
                    AppError::NotFound(format!("User {} not found", user_id))
                } else {
                    AppError::NotFound(format!("Book {} not found", book_id))
                });
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(loan_id) = inserted {
            tx.commit().await?;
            return Ok(Loan {
                loan_id,
                user_id,
                book_id,
            });
        }

        let holder: Option<UserId> =
            sqlx::query_scalar("SELECT userID FROM Loaned WHERE bookID = ?")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;
        tx.rollback().await?;

        match holder {
            Some(holder) if holder == user_id => Err(AppError::AlreadyLoanedBySelf),
            // The conflicting row cannot disappear while this transaction holds the write lock
            _ => Err(AppError::AlreadyLoanedByOther),
        }
    }

    /// Delete the loan of `book_id` held by `user_id`. Returns false when no such loan exists.
    pub async fn delete(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM Loaned WHERE userID = ? AND bookID = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Current holder of a book, if any
    pub async fn holder(&self, book_id: BookId) -> AppResult<Option<UserId>> {
        let holder = sqlx::query_scalar("SELECT userID FROM Loaned WHERE bookID = ?")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(holder)
    }

    /// Active loans of a user with book details, ordered by title
    pub async fn get_user_loans(&self, user_id: UserId) -> AppResult<Vec<ActiveLoan>> {
        let loans = sqlx::query_as::<_, ActiveLoan>(
            r#"
            SELECT L.loanID   AS loan_id,
                   L.bookID   AS book_id,
                   B.Title    AS title,
                   B.Author   AS author,
                   B.CoverUrl AS cover_url
            FROM Loaned AS L
            JOIN Book AS B ON L.bookID = B.bookID
            WHERE L.userID = ?
            ORDER BY B.Title COLLATE NOCASE ASC, B.bookID ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Count active loans of a user
    pub async fn count_for_user(&self, user_id: UserId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Loaned WHERE userID = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every book currently on loan
    pub async fn loaned_book_ids(&self) -> AppResult<HashSet<BookId>> {
        let ids: Vec<BookId> = sqlx::query_scalar("SELECT DISTINCT bookID FROM Loaned")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(db.kind(), ErrorKind::ForeignKeyViolation),
        _ => false,
    }
}
