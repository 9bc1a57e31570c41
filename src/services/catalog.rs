//! Catalog management service: authors and books

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorQuery, AuthorWithBooks, CreateAuthor},
        book::{BookDetails, BookQuery, CreateBook, UpdateBook},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new author
    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(&author).await
    }

    /// List authors with pagination
    pub async fn list_authors(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        self.repository.authors.list(page, per_page).await
    }

    /// Get an author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorWithBooks> {
        self.repository.authors.get_with_books(id).await
    }

    /// Create a new book; the referenced author must exist
    pub async fn create_book(&self, book: CreateBook) -> AppResult<BookDetails> {
        if !self.repository.authors.exists(book.author_id).await? {
            return Err(AppError::NotFound("Author not found".to_string()));
        }

        let created = self.repository.books.create(&book).await?;
        self.repository.books.get_details(created.id).await
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get book by ID with full details
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    /// Update an existing book; a supplied author must exist
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<BookDetails> {
        if let Some(author_id) = book.author_id {
            if !self.repository.authors.exists(author_id).await? {
                return Err(AppError::NotFound("Author not found".to_string()));
            }
        }

        let updated = self.repository.books.update(id, &book).await?;
        self.repository.books.get_details(updated.id).await
    }

    /// Delete a book; fails while it is borrowed
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
