//! Borrow records repository.
//!
//! Owns the borrow/return state transitions. Every transition runs inside a
//! single transaction with a row lock on the book, so the availability check
//! and the state write are never interleaved with another transition on the
//! same book. A failed precondition rolls back the whole unit: no record
//! without its availability flip, and vice versa.

use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{BookDetails, BookState},
        borrow::{BorrowRecord, BorrowRecordDetails},
        user::UserPublic,
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book for a user.
    ///
    /// Locks the book row, checks availability, creates the open record and
    /// flips the flag as one atomic unit. Concurrent borrows of the same book
    /// serialize on the row lock; the loser observes `is_available = false`
    /// and gets a Conflict with no record created.
    pub async fn create(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        match lock_book_state(&mut tx, book_id).await? {
            BookState::Available => {}
            BookState::Borrowed { record_id } => {
                tracing::debug!(
                    "Borrow of book {} rejected, held by record {:?}",
                    book_id,
                    record_id
                );
                return Err(AppError::Conflict("Book is not available".to_string()));
            }
        }

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (user_id, book_id, borrow_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now().date_naive())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET is_available = FALSE WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("User {} borrowed book {} (record {})", user_id, book_id, record.id);
        Ok(record)
    }

    /// Return a borrowed book.
    ///
    /// A record belonging to another user is reported as NotFound, never as
    /// an ownership error. If the book was removed from the catalog while
    /// borrowed, the availability flip is a no-op and the return still
    /// succeeds.
    pub async fn return_record(&self, record_id: i32, user_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let mut record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(record_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Borrow record not found".to_string()))?;

        if record.return_date.is_some() {
            return Err(AppError::Conflict("Book already returned".to_string()));
        }

        let today = Utc::now().date_naive();

        sqlx::query("UPDATE borrow_records SET return_date = $1 WHERE id = $2")
            .bind(today)
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        if let Some(book_id) = record.book_id {
            sqlx::query("UPDATE books SET is_available = TRUE WHERE id = $1")
                .bind(book_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        record.return_date = Some(today);
        tracing::info!("User {} returned record {}", user_id, record_id);
        Ok(record)
    }

    /// Get a single record with user and book resolved
    pub async fn get_details(&self, record_id: i32) -> AppResult<BorrowRecordDetails> {
        let row = sqlx::query(&details_query("r.id = $1"))
            .bind(record_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Borrow record with id {} not found", record_id))
            })?;

        Ok(map_details_row(&row))
    }

    /// Get all records (open and closed) for a user, oldest first
    pub async fn get_user_history(&self, user_id: i32) -> AppResult<Vec<BorrowRecordDetails>> {
        let rows = sqlx::query(&details_query("r.user_id = $1"))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_details_row).collect())
    }
}

/// Lock the book row and derive its lending state in one read.
///
/// The row lock orders concurrent transitions on the same book; holding it
/// until commit makes the check-then-act sequence linearizable. NotFound when
/// the book does not exist.
async fn lock_book_state(
    tx: &mut Transaction<'_, Postgres>,
    book_id: i32,
) -> AppResult<BookState> {
    let row = sqlx::query(
        r#"
        SELECT b.is_available, r.id AS open_record_id
        FROM books b
        LEFT JOIN borrow_records r ON r.book_id = b.id AND r.return_date IS NULL
        WHERE b.id = $1
        FOR UPDATE OF b
        "#,
    )
    .bind(book_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

    let is_available: bool = row.get("is_available");
    let open_record_id: Option<i32> = row.get("open_record_id");

    let state = match open_record_id {
        Some(record_id) => BookState::Borrowed {
            record_id: Some(record_id),
        },
        None if !is_available => BookState::Borrowed { record_id: None },
        None => BookState::Available,
    };
    Ok(state)
}

fn details_query(filter: &str) -> String {
    format!(
        r#"
        SELECT r.id, r.borrow_date, r.return_date,
               u.id AS user_id, u.email,
               b.id AS book_id, b.title, b.publication_date, b.is_available,
               a.id AS author_id, a.name AS author_name, a.bio AS author_bio
        FROM borrow_records r
        JOIN users u ON u.id = r.user_id
        LEFT JOIN books b ON b.id = r.book_id
        LEFT JOIN authors a ON a.id = b.author_id
        WHERE {}
        ORDER BY r.id
        "#,
        filter
    )
}

fn map_details_row(row: &PgRow) -> BorrowRecordDetails {
    // book_id is NULL when the book vanished from the catalog
    let book = row.get::<Option<i32>, _>("book_id").map(|book_id| BookDetails {
        id: book_id,
        title: row.get("title"),
        publication_date: row.get("publication_date"),
        is_available: row.get("is_available"),
        author: Author {
            id: row.get("author_id"),
            name: row.get("author_name"),
            bio: row.get("author_bio"),
        },
    });

    BorrowRecordDetails {
        id: row.get("id"),
        borrow_date: row.get("borrow_date"),
        return_date: row.get("return_date"),
        user: UserPublic {
            id: row.get("user_id"),
            email: row.get("email"),
        },
        book,
    }
}
