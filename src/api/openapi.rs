//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, borrowing, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Book Library Management REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Borrowing
        borrowing::borrow_book,
        borrowing::return_book,
        borrowing::get_history,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::UserPublic,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorWithBooks,
            crate::models::author::CreateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Borrowing
            crate::models::borrow::BorrowRecordDetails,
            crate::models::borrow::BorrowRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book catalog management"),
        (name = "borrowing", description = "Borrow and return workflow")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
