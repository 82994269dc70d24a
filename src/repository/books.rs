//! Books repository: catalog reads
//!
//! Filters arrive as independent [`CatalogPredicate`]s. Each one renders into a
//! bound-parameter condition on `Book AS b`, and the conditions are AND-ed, which
//! is the intersection of the candidate sets each predicate selects.

use indexmap::IndexMap;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookRow, CatalogPredicate, GenreMode},
        ids::BookId,
    },
};

const SELECT_BOOK: &str = r#"
    SELECT b.bookID   AS book_id,
           b.Title    AS title,
           b.Author   AS author,
           b.Abstract AS abstract_text,
           b.CoverUrl AS cover_url
    FROM Book AS b
"#;

const ORDER_BY_TITLE: &str = " ORDER BY b.Title COLLATE NOCASE ASC, b.bookID ASC";

const SELECT_GENRE: &str = "SELECT bookID, genre FROM Genre";

const ORDER_BY_GENRE: &str = " ORDER BY genreID";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// All books, ordered by title
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{}{}", SELECT_BOOK, ORDER_BY_TITLE))
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let tags = sqlx::query_as::<_, (BookId, String)>(&format!("{}{}", SELECT_GENRE, ORDER_BY_GENRE))
            .fetch_all(&self.pool)
            .await?;

        Ok(with_genres(rows, tags))
    }

    /// Books satisfying every predicate, ordered by title
    pub async fn list_matching(&self, predicates: &[CatalogPredicate]) -> AppResult<Vec<Book>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_BOOK);
        push_conditions(&mut query, predicates);
        query.push(ORDER_BY_TITLE);

        let rows = query
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Genres are selected through the same conditions, so the number of bound
        // parameters does not grow with the number of matching books.
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_GENRE);
        query.push(" WHERE bookID IN (SELECT b.bookID FROM Book AS b");
        push_conditions(&mut query, predicates);
        query.push(")");
        query.push(ORDER_BY_GENRE);

        let tags = query
            .build_query_as::<(BookId, String)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(with_genres(rows, tags))
    }

    /// Get book by ID
    pub async fn get_by_id(&self, book_id: BookId) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.bookID = ?", SELECT_BOOK))
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

        let tags = sqlx::query_as::<_, (BookId, String)>(&format!(
            "{} WHERE bookID = ?{}",
            SELECT_GENRE, ORDER_BY_GENRE
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        with_genres(vec![row], tags)
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))
    }
}

/// Attach the full, unfiltered genre set of every book, keeping row order.
///
/// Tags for books outside `rows` are ignored.
fn with_genres(rows: Vec<BookRow>, tags: Vec<(BookId, String)>) -> Vec<Book> {
    let mut books: IndexMap<BookId, Book> = rows
        .into_iter()
        .map(|row| (row.book_id, Book::from(row)))
        .collect();

    for (book_id, genre) in tags {
        let Some(book) = books.get_mut(&book_id) else {
            continue;
        };
        let genre = genre.trim();
        if !genre.is_empty() && !book.genres.iter().any(|g| g == genre) {
            book.genres.push(genre.to_string());
        }
    }

    books.into_values().collect()
}

/// AND every predicate onto a query selecting from `Book AS b`
fn push_conditions<'a>(query: &mut QueryBuilder<'a, Sqlite>, predicates: &'a [CatalogPredicate]) {
    query.push(" WHERE 1 = 1");
    for predicate in predicates {
        query.push(" AND ");
        push_predicate(query, predicate);
    }
}

/// Render one predicate as a boolean condition over `b`
fn push_predicate<'a>(query: &mut QueryBuilder<'a, Sqlite>, predicate: &'a CatalogPredicate) {
    match predicate {
        CatalogPredicate::TitleContains(needle) => {
            query.push("instr(LOWER(b.Title), ");
            query.push_bind(needle.as_str());
            query.push(") > 0");
        }
        CatalogPredicate::AuthorContains(needle) => {
            query.push("instr(LOWER(b.Author), ");
            query.push_bind(needle.as_str());
            query.push(") > 0");
        }
        CatalogPredicate::Genres { labels, mode } => {
            query.push("b.bookID IN (SELECT g.bookID FROM Genre AS g WHERE LOWER(TRIM(g.genre)) IN (");
            {
                let mut list = query.separated(", ");
                for label in labels {
                    list.push_bind(label.as_str());
                }
                list.push_unseparated(")");
            }

            if *mode == GenreMode::All {
                query.push(" GROUP BY g.bookID HAVING COUNT(DISTINCT LOWER(TRIM(g.genre))) = ");
                query.push_bind(labels.len() as i64);
            }
            query.push(")");
        }
    }
}
