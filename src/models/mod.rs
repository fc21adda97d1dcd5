//! Data models for the Elidune ledger

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookId, BookQuery, BookShort, CreateBook, UpdateBook};
pub use loan::{Loan, OverdueLoan};
pub use user::{CreateUser, UpdateUser, User};
