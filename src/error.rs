//! Error types for the Elidune ledger

use thiserror::Error;
use validator::ValidationErrors;

/// Numeric error codes, shared with the Elidune server protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NoSuchItem = 5,
    ItemNotAvailable = 7,
    Duplicate = 8,
    SpecimenBorrowed = 13,
    BadValue = 18,
    NoSuchData = 20,
}

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous match: {0}")]
    AmbiguousMatch(String),

    #[error("Out of stock: {0}")]
    OutOfStock(String),

    #[error("Already borrowed: {0}")]
    AlreadyBorrowed(String),

    #[error("Not on loan: {0}")]
    NotOnLoan(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

impl AppError {
    /// Numeric code reported alongside the message
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::AmbiguousMatch(_) => ErrorCode::Failure,
            AppError::OutOfStock(_) => ErrorCode::ItemNotAvailable,
            AppError::AlreadyBorrowed(_) => ErrorCode::SpecimenBorrowed,
            AppError::NotOnLoan(_) => ErrorCode::NoSuchItem,
            AppError::DuplicateKey(_) => ErrorCode::Duplicate,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
