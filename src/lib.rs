//! Stacks library circulation server
//!
//! Catalog browsing with multi-criteria filtering, and checkout/check-in of
//! single-copy books, exposed as a REST JSON API over an SQLite store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
