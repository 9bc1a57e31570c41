//! Borrow and return endpoints
//!
//! The authenticated identity is the borrower; these handlers never accept a
//! user id from the request body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow::{BorrowRecordDetails, BorrowRequest},
};

use super::AuthenticatedUser;

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Borrow record created", body = BorrowRecordDetails),
        (status = 400, description = "Book is not available"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRecordDetails>)> {
    let record = state
        .services
        .borrowing
        .borrow_book(claims.user_id, request.book_id)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrow/return/{record_id}",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    params(
        ("record_id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecordDetails),
        (status = 400, description = "Book already returned"),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(record_id): Path<i32>,
) -> AppResult<Json<BorrowRecordDetails>> {
    let record = state
        .services
        .borrowing
        .return_book(record_id, claims.user_id)
        .await?;

    Ok(Json(record))
}

/// Get the authenticated user's borrowing history
#[utoipa::path(
    get,
    path = "/borrow/history",
    tag = "borrowing",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowing history", body = Vec<BorrowRecordDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRecordDetails>>> {
    let history = state.services.borrowing.get_history(claims.user_id).await?;
    Ok(Json(history))
}
