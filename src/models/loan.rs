//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::BookId;

/// Active loan of one book by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub username: String,
    pub book_id: BookId,
    pub due_date: DateTime<Utc>,
}

impl Loan {
    /// Overdue once the due date is strictly in the past
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

/// Overdue loan report entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueLoan {
    pub username: String,
    pub firstname: String,
    pub book_id: BookId,
    pub due_date: DateTime<Utc>,
}
