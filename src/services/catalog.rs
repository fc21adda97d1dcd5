//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookId, BookQuery, BookShort, CreateBook, UpdateBook},
    repository::Repository,
};

pub struct CatalogService<'a> {
    repository: &'a mut Repository,
}

impl<'a> CatalogService<'a> {
    pub fn new(repository: &'a mut Repository) -> Self {
        Self { repository }
    }

    /// Validate and register a new book
    pub fn create_book(&mut self, data: CreateBook) -> AppResult<Book> {
        let book = Book::new(data)?;
        self.add_book(book.clone())?;
        Ok(book)
    }

    /// Register an already built book
    pub fn add_book(&mut self, book: Book) -> AppResult<BookId> {
        let title = book.title.clone();
        let id = self.repository.books.create(book)?;
        tracing::info!(book_id = %id, %title, "Book added to catalog");
        Ok(id)
    }

    /// Search books with a single criterion
    pub fn search_books(&self, query: &BookQuery) -> Vec<Book> {
        let books: Vec<Book> = self.repository.books.search(query).into_iter().cloned().collect();
        tracing::debug!(?query, found = books.len(), "Catalog search");
        books
    }

    pub fn get_book(&self, id: &BookId) -> AppResult<Book> {
        self.repository.books.get_by_id(id).cloned()
    }

    /// Update a book's fields
    pub fn update_book(&mut self, id: &BookId, data: UpdateBook) -> AppResult<Book> {
        let book = self.repository.books.get_by_id_mut(id)?;
        book.apply(data)?;
        if book.available_copies() > book.num_copies {
            tracing::warn!(
                book_id = %id,
                num_copies = book.num_copies,
                available_copies = book.available_copies(),
                "Available copies now exceed total copies"
            );
        }
        tracing::info!(book_id = %id, "Book updated");
        Ok(book.clone())
    }

    /// Remove the first book carrying this title
    pub fn remove_book(&mut self, title: &str) -> AppResult<Book> {
        let book = self.repository.books.delete_by_title(title)?;
        let on_loan = self.repository.loans.count_for_book(&book.id);
        if on_loan > 0 {
            tracing::warn!(book_id = %book.id, on_loan, "Removed a book that is still on loan");
        }
        tracing::info!(book_id = %book.id, title = %book.title, "Book removed from catalog");
        Ok(book)
    }

    pub fn list_books(&self) -> Vec<BookShort> {
        self.repository.books.list().map(BookShort::from).collect()
    }

    pub fn count_books(&self) -> usize {
        self.repository.books.count()
    }
}
