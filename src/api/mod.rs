//! API handlers for Stacks REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::ids::UserId, AppState};

/// Header carrying the caller's user id, set by the authenticating proxy in front of us
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the caller identity. The id is trusted as-is.
pub struct CallerIdentity(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Authentication("Missing X-User-Id header".to_string()))?
            .to_str()
            .map_err(|_| AppError::InvalidIdentifier("user id header is not valid text".to_string()))?;

        Ok(CallerIdentity(raw.parse()?))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        // Circulation
        .route("/books/:id/checkout", post(loans::checkout))
        .route("/books/:id/checkin", post(loans::check_in))
        .route("/loans/book-ids", get(loans::loaned_book_ids))
        .route("/me/loans", get(loans::my_loans))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
