//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::author::Author;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub is_available: bool,
    pub author_id: i32,
}

/// Book with its author resolved for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub is_available: bool,
    pub author: Author,
}

/// Lending state of a book, derived from the availability flag and the
/// open-record check inside one transactional read.
///
/// `record_id` is None when the flag was flipped without an open record
/// (catalog override via book update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Available,
    Borrowed { record_id: Option<i32> },
}

/// Short book representation for embedding in author views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub author_id: i32,
}

/// Partial update request; only supplied fields are changed
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub is_available: Option<bool>,
    pub author_id: Option<i32>,
}

/// Book search query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Case-insensitive title substring
    pub search: Option<String>,
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
