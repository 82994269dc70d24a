//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter, GenreMode},
        ids::BookId,
        loan::LoanStatus,
    },
};

use super::CallerIdentity;

/// Catalog query string
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Case-insensitive author substring
    pub author: Option<String>,
    /// Comma-separated genre labels
    pub genres: Option<String>,
    /// `any` (default) or `all`
    #[param(inline)]
    pub genre_mode: Option<GenreMode>,
}

impl From<BookListQuery> for BookFilter {
    fn from(query: BookListQuery) -> Self {
        BookFilter {
            title: query.title,
            author: query.author,
            genres: None,
            genre_mode: query.genre_mode,
        }
        .with_genres_csv(query.genres.as_deref())
    }
}

/// Book annotated with its availability
#[derive(Serialize, ToSchema)]
pub struct BookListItem {
    #[serde(flatten)]
    pub book: Book,
    /// False while someone holds the book
    pub available: bool,
}

/// Book detail, with what the caller may do when an identity was supplied
#[derive(Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub status: Option<LoanStatus>,
}

/// List the catalog, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Matching books ordered by title", body = Vec<BookListItem>),
        (status = 404, description = "The filter matched no book"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookListQuery>,
) -> AppResult<Json<Vec<BookListItem>>> {
    let filter = BookFilter::from(query);

    let books = state.services.catalog.list(&filter).await?;
    let loaned = state.services.circulation.all_active_loaned_book_ids().await?;

    Ok(Json(
        books
            .into_iter()
            .map(|book| BookListItem {
                available: !loaned.contains(&book.book_id),
                book,
            })
            .collect(),
    ))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 400, description = "Invalid book id or caller id"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    caller: Result<CallerIdentity, AppError>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetail>> {
    let book_id: BookId = id.parse()?;

    // Anonymous callers are fine here; a malformed identity is not
    let caller = match caller {
        Ok(caller) => Some(caller),
        Err(AppError::Authentication(_)) => None,
        Err(err) => return Err(err),
    };

    let book = state.services.catalog.get_book(book_id.get()).await?;
    let status = match caller {
        Some(CallerIdentity(user_id)) => Some(
            state
                .services
                .circulation
                .loan_status(user_id.get(), book_id.get())
                .await?,
        ),
        None => None,
    };

    Ok(Json(BookDetail { book, status }))
}
