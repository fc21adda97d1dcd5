//! Books repository (in-memory catalog)

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookId, BookQuery},
};

#[derive(Debug, Default)]
pub struct BooksRepository {
    books: IndexMap<BookId, Book>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a book under its identifier
    pub fn create(&mut self, book: Book) -> AppResult<BookId> {
        let id = book.id;
        if self.books.contains_key(&id) {
            return Err(AppError::DuplicateKey(format!("Book with id {} already exists", id)));
        }
        self.books.insert(id, book);
        Ok(id)
    }

    /// Get book by ID
    pub fn get_by_id(&self, id: &BookId) -> AppResult<&Book> {
        self.books
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub fn get_by_id_mut(&mut self, id: &BookId) -> AppResult<&mut Book> {
        self.books
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books, in insertion order
    pub fn search(&self, query: &BookQuery) -> Vec<&Book> {
        self.books.values().filter(|b| b.matches(query)).collect()
    }

    /// Remove the first book whose title matches, ignoring case
    pub fn delete_by_title(&mut self, title: &str) -> AppResult<Book> {
        let wanted = title.to_lowercase();
        let index = self
            .books
            .values()
            .position(|b| b.title.to_lowercase() == wanted)
            .ok_or_else(|| AppError::NotFound(format!("No book found with title: {}", title)))?;

        self.books
            .shift_remove_index(index)
            .map(|(_, book)| book)
            .ok_or_else(|| AppError::NotFound(format!("No book found with title: {}", title)))
    }

    pub fn list(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn count(&self) -> usize {
        self.books.len()
    }
}
