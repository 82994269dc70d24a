//! Loan model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::ids::{BookId, LoanId, UserId};

/// Active loan row. Its existence is what marks the book as on loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub loan_id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
}

/// Active loan joined with the book it holds, for a borrower's listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActiveLoan {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
}

/// A borrower's active loans together with their count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserLoans {
    pub items: Vec<ActiveLoan>,
    pub count: i64,
}

/// What a given user may do with a given book right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoanStatus {
    /// Nobody holds the book
    pub can_checkout: bool,
    /// The user holds the book
    pub can_check_in: bool,
}

impl LoanStatus {
    pub fn from_holder(user_id: UserId, holder: Option<UserId>) -> Self {
        Self {
            can_checkout: holder.is_none(),
            can_check_in: holder == Some(user_id),
        }
    }
}
