//! Borrowing service: the borrow/return lifecycle
//!
//! The state transitions themselves live in the borrows repository, where
//! they run as single transactions. This layer resolves the resulting
//! records for display.

use crate::{
    error::AppResult,
    models::borrow::BorrowRecordDetails,
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowingService {
    repository: Repository,
}

impl BorrowingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the authenticated user
    pub async fn borrow_book(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecordDetails> {
        let record = self.repository.borrows.create(user_id, book_id).await?;
        self.repository.borrows.get_details(record.id).await
    }

    /// Return a borrowed book; users can only return their own loans
    pub async fn return_book(
        &self,
        record_id: i32,
        user_id: i32,
    ) -> AppResult<BorrowRecordDetails> {
        let record = self
            .repository
            .borrows
            .return_record(record_id, user_id)
            .await?;
        self.repository.borrows.get_details(record.id).await
    }

    /// Full borrowing history (open and closed records) for a user
    pub async fn get_history(&self, user_id: i32) -> AppResult<Vec<BorrowRecordDetails>> {
        self.repository.borrows.get_user_history(user_id).await
    }
}
