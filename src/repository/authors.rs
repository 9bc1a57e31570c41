//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorWithBooks, CreateAuthor},
        book::BookSummary,
    },
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Get author by ID with their books resolved
    pub async fn get_with_books(&self, id: i32) -> AppResult<AuthorWithBooks> {
        let author = self.get_by_id(id).await?;

        let books = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title FROM books WHERE author_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AuthorWithBooks {
            id: author.id,
            name: author.name,
            bio: author.bio,
            books,
        })
    }

    /// Check if an author exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// List authors with pagination
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        let offset = (page - 1) * per_page;

        let authors = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok((authors, total))
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, bio)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&author.name)
        .bind(&author.bio)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
