//! Books repository for database operations

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get book by ID with its author resolved
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let row = sqlx::query(&format!("{} WHERE b.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(map_details_row(&row))
    }

    /// Search books by title substring and availability, with pagination.
    /// Each result carries its resolved author.
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let rows = sqlx::query(&format!(
            r#"
            {}
            WHERE ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%')
              AND ($2::boolean IS NULL OR b.is_available = $2)
            ORDER BY b.id
            LIMIT $3 OFFSET $4
            "#,
            DETAILS_SELECT
        ))
        .bind(&query.search)
        .bind(query.available)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books b
            WHERE ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%')
              AND ($2::boolean IS NULL OR b.is_available = $2)
            "#,
        )
        .bind(&query.search)
        .bind(query.available)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.iter().map(map_details_row).collect(), total))
    }

    /// Create a new book; new books start available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, publication_date, author_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(book.publication_date)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a book; only supplied fields are changed
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                publication_date = COALESCE($3, publication_date),
                is_available = COALESCE($4, is_available),
                author_id = COALESCE($5, author_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.publication_date)
        .bind(book.is_available)
        .bind(book.author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book.
    ///
    /// The availability check and the delete run under one row lock so a
    /// concurrent borrow cannot slip in between. Historical borrow records
    /// keep existing (their book_id is nulled by the schema).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let is_available: bool =
            sqlx::query_scalar("SELECT is_available FROM books WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if !is_available {
            return Err(AppError::Conflict(
                "Cannot delete a book that is currently borrowed".to_string(),
            ));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.publication_date, b.is_available,
           a.id AS author_id, a.name AS author_name, a.bio AS author_bio
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

fn map_details_row(row: &PgRow) -> BookDetails {
    BookDetails {
        id: row.get("id"),
        title: row.get("title"),
        publication_date: row.get("publication_date"),
        is_available: row.get("is_available"),
        author: Author {
            id: row.get("author_id"),
            name: row.get("author_name"),
            bio: row.get("author_bio"),
        },
    }
}
