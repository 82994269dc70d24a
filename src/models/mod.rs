//! Data models for Stacks

pub mod book;
pub mod ids;
pub mod loan;

// Re-export commonly used types
pub use book::{Book, BookFilter, GenreMode};
pub use ids::{BookId, LoanId, UserId};
pub use loan::{ActiveLoan, Loan, LoanStatus, UserLoans};
