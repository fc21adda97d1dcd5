//! Loan management service

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{
        book::BookId,
        loan::{Loan, OverdueLoan},
    },
    repository::Repository,
    services::clock::Clock,
};

pub struct LoansService<'a> {
    repository: &'a mut Repository,
    config: &'a LoansConfig,
    clock: &'a dyn Clock,
}

impl<'a> LoansService<'a> {
    pub fn new(repository: &'a mut Repository, config: &'a LoansConfig, clock: &'a dyn Clock) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    /// Borrow a book for the configured loan duration
    pub fn borrow(&mut self, username: &str, book_id: &BookId) -> AppResult<DateTime<Utc>> {
        self.borrow_for(username, book_id, self.config.duration_days)
    }

    /// Borrow a book for `duration_days` days and return the due date
    pub fn borrow_for(
        &mut self,
        username: &str,
        book_id: &BookId,
        duration_days: i64,
    ) -> AppResult<DateTime<Utc>> {
        if duration_days < 1 {
            return Err(AppError::Validation(
                "Loan duration must be at least one day".to_string(),
            ));
        }
        let due_date = Duration::try_days(duration_days)
            .and_then(|d| self.clock.now().checked_add_signed(d))
            .ok_or_else(|| AppError::Validation(format!("Loan duration out of range: {} days", duration_days)))?;

        let repository = &mut *self.repository;
        let user = repository.users.get_by_username(username)?;
        let book = repository.books.get_by_id_mut(book_id)?;
        repository.loans.create(&user.username, book, due_date)?;

        tracing::info!(
            %username,
            %book_id,
            %due_date,
            available_copies = book.available_copies(),
            "Book borrowed"
        );
        Ok(due_date)
    }

    /// Return a borrowed book
    pub fn return_book(&mut self, username: &str, book_id: &BookId) -> AppResult<()> {
        let repository = &mut *self.repository;
        let user = repository.users.get_by_username(username)?;
        let book = repository.books.get_by_id_mut(book_id)?;
        let due_date = repository.loans.return_loan(&user.username, book)?;

        let late = due_date < self.clock.now();
        tracing::info!(
            %username,
            %book_id,
            late,
            available_copies = book.available_copies(),
            "Book returned"
        );
        Ok(())
    }

    /// Number of books a user currently has on loan
    pub fn loan_count(&self, username: &str) -> AppResult<usize> {
        self.repository.users.get_by_username(username)?;
        Ok(self.repository.loans.count_for_user(username))
    }

    /// Get loans for a user
    pub fn get_user_loans(&self, username: &str) -> AppResult<Vec<Loan>> {
        // Verify user exists
        self.repository.users.get_by_username(username)?;
        Ok(self.repository.loans.get_user_loans(username))
    }

    /// Every loan whose due date has passed, with the borrower's first name
    pub fn overdue_loans(&self) -> AppResult<Vec<OverdueLoan>> {
        let now = self.clock.now();
        let mut overdue = Vec::new();
        for username in self.repository.loans.borrowers() {
            // Every borrower must resolve, whether or not their loans are late
            let user = self.repository.users.get_by_username(username)?;
            overdue.extend(
                self.repository
                    .loans
                    .get_user_loans(username)
                    .into_iter()
                    .filter(|loan| loan.is_overdue(now))
                    .map(|loan| OverdueLoan {
                        firstname: user.firstname.clone(),
                        username: loan.username,
                        book_id: loan.book_id,
                        due_date: loan.due_date,
                    }),
            );
        }

        tracing::debug!(count = overdue.len(), "Overdue loans computed");
        Ok(overdue)
    }

    /// Count active loans
    pub fn count_active(&self) -> usize {
        self.repository.loans.count_active()
    }
}
