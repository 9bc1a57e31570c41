//! Borrow record model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookDetails;
use super::user::UserPublic;

/// Borrow record from database.
///
/// `book_id` is nullable: records outlive catalog deletions of the book they
/// reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: Option<i32>,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// Borrow record with user and book resolved for display.
///
/// `book` is absent when the book has been removed from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowRecordDetails {
    pub id: i32,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub user: UserPublic,
    pub book: Option<BookDetails>,
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub book_id: i32,
}
