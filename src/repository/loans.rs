//! Loans repository: the ledger of active loans

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookId},
        loan::Loan,
    },
};

/// Active loans, username -> (book id -> due date).
///
/// Holds identifiers only; the borrowed book is passed in so its available
/// count moves together with the ledger entry.
#[derive(Debug, Default)]
pub struct LoansRepository {
    loans: IndexMap<String, IndexMap<BookId, DateTime<Utc>>>,
}

impl LoansRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_due_date(&self, username: &str, book_id: &BookId) -> Option<DateTime<Utc>> {
        self.loans.get(username).and_then(|books| books.get(book_id)).copied()
    }

    /// Create a new loan and take one copy of the book
    pub fn create(&mut self, username: &str, book: &mut Book, due_date: DateTime<Utc>) -> AppResult<()> {
        if book.available_copies() == 0 {
            return Err(AppError::OutOfStock(format!(
                "No available copies of \"{}\"",
                book.title
            )));
        }

        if self.get_due_date(username, &book.id).is_some() {
            return Err(AppError::AlreadyBorrowed(format!(
                "User {} already has \"{}\" on loan",
                username, book.title
            )));
        }

        book.take_copy()?;
        self.loans
            .entry(username.to_string())
            .or_default()
            .insert(book.id, due_date);

        Ok(())
    }

    /// Return a loan and put the copy back
    pub fn return_loan(&mut self, username: &str, book: &mut Book) -> AppResult<DateTime<Utc>> {
        let due_date = self
            .loans
            .get_mut(username)
            .and_then(|books| books.shift_remove(&book.id))
            .ok_or_else(|| {
                AppError::NotOnLoan(format!(
                    "\"{}\" is not on loan to user {}",
                    book.title, username
                ))
            })?;

        if self.loans.get(username).is_some_and(|books| books.is_empty()) {
            self.loans.shift_remove(username);
        }
        book.put_back_copy();

        Ok(due_date)
    }

    /// Count active loans for a user
    pub fn count_for_user(&self, username: &str) -> usize {
        self.loans.get(username).map_or(0, |books| books.len())
    }

    /// Get loans for a user, in borrow order
    pub fn get_user_loans(&self, username: &str) -> Vec<Loan> {
        self.loans
            .get(username)
            .map(|books| {
                books
                    .iter()
                    .map(|(book_id, due_date)| Loan {
                        username: username.to_string(),
                        book_id: *book_id,
                        due_date: *due_date,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Usernames holding at least one loan, in first-borrow order
    pub fn borrowers(&self) -> impl Iterator<Item = &str> + '_ {
        self.loans.keys().map(String::as_str)
    }

    /// Count active loans of a book, across users
    pub fn count_for_book(&self, book_id: &BookId) -> usize {
        self.loans.values().filter(|books| books.contains_key(book_id)).count()
    }

    /// Count active loans
    pub fn count_active(&self) -> usize {
        self.loans.values().map(|books| books.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::CreateBook;
    use chrono::{Duration, NaiveDate};

    fn book(copies: i64) -> Book {
        Book::new(CreateBook {
            title: "Middlemarch".to_string(),
            author: "George Eliot".to_string(),
            year: 1871,
            publisher: "Blackwood".to_string(),
            num_copies: copies,
            publication_date: NaiveDate::from_ymd_opt(1871, 12, 1).unwrap(),
        })
        .unwrap()
    }

    fn due() -> DateTime<Utc> {
        Utc::now() + Duration::days(14)
    }

    #[test]
    fn test_create_then_return_round_trip() {
        let mut repo = LoansRepository::new();
        let mut b = book(2);

        repo.create("alice", &mut b, due()).unwrap();
        assert_eq!(b.available_copies(), 1);
        assert_eq!(repo.count_for_user("alice"), 1);

        repo.return_loan("alice", &mut b).unwrap();
        assert_eq!(b.available_copies(), 2);
        assert_eq!(repo.count_for_user("alice"), 0);
        assert_eq!(repo.get_due_date("alice", &b.id), None);
        assert_eq!(repo.count_active(), 0);
    }

    #[test]
    fn test_double_borrow_is_rejected_without_side_effects() {
        let mut repo = LoansRepository::new();
        let mut b = book(3);
        let first_due = due();

        repo.create("alice", &mut b, first_due).unwrap();
        let err = repo.create("alice", &mut b, first_due + Duration::days(1));
        assert!(matches!(err, Err(AppError::AlreadyBorrowed(_))));
        assert_eq!(b.available_copies(), 2);
        assert_eq!(repo.get_due_date("alice", &b.id), Some(first_due));
    }

    #[test]
    fn test_out_of_stock_leaves_ledger_untouched() {
        let mut repo = LoansRepository::new();
        let mut b = book(0);

        assert!(matches!(
            repo.create("alice", &mut b, due()),
            Err(AppError::OutOfStock(_))
        ));
        assert_eq!(b.available_copies(), 0);
        assert_eq!(repo.count_for_user("alice"), 0);
    }

    #[test]
    fn test_return_without_loan() {
        let mut repo = LoansRepository::new();
        let mut b = book(1);
        assert!(matches!(
            repo.return_loan("alice", &mut b),
            Err(AppError::NotOnLoan(_))
        ));
        assert_eq!(b.available_copies(), 1);
    }

    #[test]
    fn test_borrowers_in_first_borrow_order() {
        let mut repo = LoansRepository::new();
        let mut a = book(2);
        let mut b = book(2);
        repo.create("alice", &mut a, due()).unwrap();
        repo.create("alice", &mut b, due()).unwrap();
        repo.create("bob", &mut a, due()).unwrap();

        assert_eq!(repo.borrowers().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert_eq!(repo.count_active(), 3);

        repo.return_loan("alice", &mut a).unwrap();
        repo.return_loan("alice", &mut b).unwrap();
        assert_eq!(repo.borrowers().collect::<Vec<_>>(), vec!["bob"]);
    }
}
