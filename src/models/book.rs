//! Book model and catalog filter types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::ids::BookId;
use crate::error::{AppError, AppResult};

/// Book with its deduplicated genre labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub cover_url: Option<String>,
    /// Stored case preserved, first occurrence wins
    pub genres: Vec<String>,
}

/// Book row without genres
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub cover_url: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            book_id: row.book_id,
            title: row.title,
            author: row.author,
            abstract_text: row.abstract_text,
            cover_url: row.cover_url,
            genres: Vec::new(),
        }
    }
}

/// How multiple requested genres combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GenreMode {
    /// A book matches when it carries at least one requested genre
    #[default]
    #[serde(alias = "contain")]
    Any,
    /// A book matches only when it carries every requested genre
    #[serde(alias = "has")]
    All,
}

/// Catalog filter request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Genre labels, compared case-insensitively
    pub genres: Option<Vec<String>>,
    pub genre_mode: Option<GenreMode>,
}

/// One independent condition over the catalog.
///
/// Text is already folded with [`fold`]; the repository compares it against
/// `LOWER(column)`, which folds the same ASCII range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogPredicate {
    TitleContains(String),
    AuthorContains(String),
    Genres { labels: Vec<String>, mode: GenreMode },
}

/// Case folding shared with SQLite's built-in `LOWER()`
pub fn fold(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

/// Deduplicate labels exactly (case-sensitive), keeping the first occurrence
pub fn dedup_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref().trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

impl BookFilter {
    /// Title-only filter
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Author-only filter
    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Self::default()
        }
    }

    /// Genre-only filter
    pub fn genres<I, S>(genres: I, mode: GenreMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            genres: Some(genres.into_iter().map(Into::into).collect()),
            genre_mode: Some(mode),
            ..Self::default()
        }
    }

    /// Replace the genre list with labels parsed from a comma-separated field
    pub fn with_genres_csv(mut self, csv: Option<&str>) -> Self {
        self.genres = csv.map(|csv| dedup_labels(csv.split(',')));
        self
    }

    /// True when no usable criterion is present
    pub fn is_empty(&self) -> bool {
        fn blank(s: &Option<String>) -> bool {
            s.as_deref().map_or(true, |s| s.trim().is_empty())
        }

        blank(&self.title)
            && blank(&self.author)
            && self
                .genres
                .as_ref()
                .map_or(true, |g| g.iter().all(|l| l.trim().is_empty()))
    }

    /// Normalize into independent predicates.
    ///
    /// Fails with [`AppError::InvalidFilter`] when nothing usable remains.
    pub fn predicates(&self) -> AppResult<Vec<CatalogPredicate>> {
        let mut predicates = Vec::new();

        if let Some(labels) = &self.genres {
            let mut folded: Vec<String> = Vec::new();
            for label in labels.iter().map(|l| fold(l)).filter(|l| !l.is_empty()) {
                if !folded.contains(&label) {
                    folded.push(label);
                }
            }
            if !folded.is_empty() {
                predicates.push(CatalogPredicate::Genres {
                    labels: folded,
                    mode: self.genre_mode.unwrap_or_default(),
                });
            }
        }

        if let Some(title) = self.title.as_deref().map(fold).filter(|t| !t.is_empty()) {
            predicates.push(CatalogPredicate::TitleContains(title));
        }

        if let Some(author) = self.author.as_deref().map(fold).filter(|a| !a.is_empty()) {
            predicates.push(CatalogPredicate::AuthorContains(author));
        }

        if predicates.is_empty() {
            return Err(AppError::InvalidFilter);
        }
        Ok(predicates)
    }
}
