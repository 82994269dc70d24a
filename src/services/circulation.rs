//! Circulation service: checkout and check-in of single-copy books
//!
//! Each book is either available (no loan row) or on loan to exactly one user.
//! Identifiers are validated here, before any storage access.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        ids::{BookId, UserId},
        loan::{ActiveLoan, Loan, LoanStatus, UserLoans},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend `book_id` to `user_id`
    pub async fn checkout(&self, user_id: i64, book_id: i64) -> AppResult<Loan> {
        let user_id = UserId::new(user_id)?;
        let book_id = BookId::new(book_id)?;

        match self.repository.loans.create(user_id, book_id).await {
            Ok(loan) => {
                tracing::info!(
                    loan_id = %loan.loan_id,
                    %user_id,
                    %book_id,
                    "book checked out"
                );
                Ok(loan)
            }
            Err(e) => {
                tracing::debug!(%user_id, %book_id, error = %e, "checkout rejected");
                Err(e)
            }
        }
    }

    /// Return `book_id`, which `user_id` must currently hold
    pub async fn check_in(&self, user_id: i64, book_id: i64) -> AppResult<()> {
        let user_id = UserId::new(user_id)?;
        let book_id = BookId::new(book_id)?;

        if !self.repository.loans.delete(user_id, book_id).await? {
            tracing::debug!(%user_id, %book_id, "check-in rejected: no matching loan");
            return Err(AppError::NothingToReturn);
        }

        tracing::info!(%user_id, %book_id, "book checked in");
        Ok(())
    }

    /// Active loans of a user, ordered by title
    pub async fn active_loans_for_user(&self, user_id: i64) -> AppResult<Vec<ActiveLoan>> {
        let user_id = UserId::new(user_id)?;
        self.repository.loans.get_user_loans(user_id).await
    }

    /// Number of active loans of a user
    pub async fn active_loan_count_for_user(&self, user_id: i64) -> AppResult<i64> {
        let user_id = UserId::new(user_id)?;
        self.repository.loans.count_for_user(user_id).await
    }

    /// Listing and count together
    pub async fn user_loans(&self, user_id: i64) -> AppResult<UserLoans> {
        Ok(UserLoans {
            items: self.active_loans_for_user(user_id).await?,
            count: self.active_loan_count_for_user(user_id).await?,
        })
    }

    /// Every book currently on loan
    pub async fn all_active_loaned_book_ids(&self) -> AppResult<HashSet<BookId>> {
        self.repository.loans.loaned_book_ids().await
    }

    /// Whether `user_id` may check `book_id` out or in
    pub async fn loan_status(&self, user_id: i64, book_id: i64) -> AppResult<LoanStatus> {
        let user_id = UserId::new(user_id)?;
        let book_id = BookId::new(book_id)?;
        let holder = self.repository.loans.holder(book_id).await?;
        Ok(LoanStatus::from_holder(user_id, holder))
    }
}
