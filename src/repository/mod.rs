//! Repository layer: in-memory registries

pub mod books;
pub mod loans;
pub mod users;

/// Main repository struct holding every registry for the process lifetime
#[derive(Debug, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            books: books::BooksRepository::new(),
            users: users::UsersRepository::new(),
            loans: loans::LoansRepository::new(),
        }
    }
}
