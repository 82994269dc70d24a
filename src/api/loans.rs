//! Circulation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        ids::BookId,
        loan::{Loan, UserLoans},
    },
};

use super::CallerIdentity;

/// Check-in response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    pub book_id: BookId,
}

/// Check a book out for the caller
#[utoipa::path(
    post,
    path = "/books/{id}/checkout",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Book ID"),
        ("x-user-id" = i64, Header, description = "Caller user ID")
    ),
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Invalid identifier"),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "Book already on loan")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let book_id: BookId = id.parse()?;

    let loan = state
        .services
        .circulation
        .checkout(user_id.get(), book_id.get())
        .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a book held by the caller
#[utoipa::path(
    post,
    path = "/books/{id}/checkin",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Book ID"),
        ("x-user-id" = i64, Header, description = "Caller user ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Invalid identifier"),
        (status = 409, description = "Caller does not hold this book")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<ReturnResponse>> {
    let book_id: BookId = id.parse()?;

    state
        .services
        .circulation
        .check_in(user_id.get(), book_id.get())
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        book_id,
    }))
}

/// Active loans of the caller
#[utoipa::path(
    get,
    path = "/me/loans",
    tag = "loans",
    params(
        ("x-user-id" = i64, Header, description = "Caller user ID")
    ),
    responses(
        (status = 200, description = "Caller's active loans", body = UserLoans),
        (status = 401, description = "No caller identity")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> AppResult<Json<UserLoans>> {
    let loans = state.services.circulation.user_loans(user_id.get()).await?;
    Ok(Json(loans))
}

/// IDs of every book currently on loan
#[utoipa::path(
    get,
    path = "/loans/book-ids",
    tag = "loans",
    responses(
        (status = 200, description = "Loaned book IDs, ascending", body = Vec<i64>)
    )
)]
pub async fn loaned_book_ids(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<BookId>>> {
    let mut ids: Vec<BookId> = state
        .services
        .circulation
        .all_active_loaned_book_ids()
        .await?
        .into_iter()
        .collect();
    ids.sort();

    Ok(Json(ids))
}
