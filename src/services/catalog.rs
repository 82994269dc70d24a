//! Catalog query service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter},
        ids::BookId,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every book with its genres, ordered by title
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_all().await
    }

    /// Books matching `filter`.
    ///
    /// An empty filter is rejected with [`AppError::InvalidFilter`] rather than
    /// falling through to the full listing, and an empty result is reported as
    /// [`AppError::NoMatch`].
    pub async fn list_filtered(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let predicates = filter.predicates()?;
        let books = self.repository.books.list_matching(&predicates).await?;

        if books.is_empty() {
            tracing::debug!(?filter, "catalog filter matched nothing");
            return Err(AppError::NoMatch);
        }
        Ok(books)
    }

    /// Full listing when `filter` carries no criteria, filtered listing otherwise
    pub async fn list(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        if filter.is_empty() {
            self.list_all().await
        } else {
            self.list_filtered(filter).await
        }
    }

    /// Get a single book with its genres
    pub async fn get_book(&self, book_id: i64) -> AppResult<Book> {
        let book_id = BookId::new(book_id)?;
        self.repository.books.get_by_id(book_id).await
    }
}
