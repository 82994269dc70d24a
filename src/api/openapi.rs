//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stacks API",
        version = "0.1.0",
        description = "Library catalog and circulation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        books::list_books,
        books::get_book,
        // Loans
        loans::checkout,
        loans::check_in,
        loans::my_loans,
        loans::loaned_book_ids,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookFilter,
            crate::models::book::GenreMode,
            crate::models::ids::BookId,
            crate::models::ids::UserId,
            crate::models::ids::LoanId,
            books::BookListItem,
            books::BookDetail,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::ActiveLoan,
            crate::models::loan::UserLoans,
            crate::models::loan::LoanStatus,
            loans::ReturnResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog browsing"),
        (name = "loans", description = "Checkout and check-in")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
