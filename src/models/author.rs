//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookSummary;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
}

/// Author with their books for the detail view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorWithBooks {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub books: Vec<BookSummary>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub bio: Option<String>,
}

/// Author list query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AuthorQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
