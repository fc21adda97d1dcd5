//! Book (catalog entry) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book identifier, generated when the book is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BookId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| AppError::Validation(format!("Invalid book identifier: {}", s)))
    }
}

/// Book held in the catalog.
///
/// `available_copies` is only ever changed by the loan ledger, through
/// [`Book::take_copy`] and [`Book::put_back_copy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: u32,
    pub publisher: String,
    pub num_copies: u32,
    available_copies: u32,
    pub publication_date: NaiveDate,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must be a non-empty string"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must be a non-empty string"))]
    pub author: String,
    #[validate(range(min = 0, message = "Year must be a non-negative integer"))]
    pub year: i64,
    #[validate(length(min = 1, message = "Publisher must be a non-empty string"))]
    pub publisher: String,
    #[validate(range(min = 0, message = "Number of copies must be a non-negative integer"))]
    pub num_copies: i64,
    pub publication_date: NaiveDate,
}

/// Update book request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must be a non-empty string"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must be a non-empty string"))]
    pub author: Option<String>,
    #[validate(range(min = 0, message = "Year must be a non-negative integer"))]
    pub year: Option<i64>,
    #[validate(length(min = 1, message = "Publisher must be a non-empty string"))]
    pub publisher: Option<String>,
    #[validate(range(min = 0, message = "Number of copies must be a non-negative integer"))]
    pub num_copies: Option<i64>,
    pub publication_date: Option<NaiveDate>,
}

/// Book search criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookQuery {
    /// Case-insensitive substring of the title
    Title(String),
    /// Case-insensitive substring of the author
    Author(String),
    /// Case-insensitive substring of the publisher
    Publisher(String),
    /// Exact publication date
    PublicationDate(NaiveDate),
}

fn to_count(value: i64, what: &str) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::Validation(format!("{} must be a non-negative integer", what)))
}

impl Book {
    /// Build a validated book with a fresh identifier; every copy starts available
    pub fn new(data: CreateBook) -> AppResult<Self> {
        data.validate()?;
        let year = to_count(data.year, "Year")?;
        let num_copies = to_count(data.num_copies, "Number of copies")?;

        Ok(Self {
            id: BookId::generate(),
            title: data.title,
            author: data.author,
            year,
            publisher: data.publisher,
            num_copies,
            available_copies: num_copies,
            publication_date: data.publication_date,
        })
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    /// Apply an update. Nothing changes unless every supplied field is valid.
    ///
    /// Changing `num_copies` leaves `available_copies` as it is.
    pub fn apply(&mut self, update: UpdateBook) -> AppResult<()> {
        update.validate()?;
        let year = update.year.map(|y| to_count(y, "Year")).transpose()?;
        let num_copies = update
            .num_copies
            .map(|n| to_count(n, "Number of copies"))
            .transpose()?;

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(year) = year {
            self.year = year;
        }
        if let Some(publisher) = update.publisher {
            self.publisher = publisher;
        }
        if let Some(num_copies) = num_copies {
            self.num_copies = num_copies;
        }
        if let Some(date) = update.publication_date {
            self.publication_date = date;
        }
        Ok(())
    }

    /// Whether this book satisfies a search query
    pub fn matches(&self, query: &BookQuery) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        match query {
            BookQuery::Title(q) => contains_ci(&self.title, q),
            BookQuery::Author(q) => contains_ci(&self.author, q),
            BookQuery::Publisher(q) => contains_ci(&self.publisher, q),
            BookQuery::PublicationDate(date) => self.publication_date == *date,
        }
    }

    /// Check out one copy
    pub(crate) fn take_copy(&mut self) -> AppResult<()> {
        self.available_copies = self.available_copies.checked_sub(1).ok_or_else(|| {
            AppError::OutOfStock(format!("No available copies of \"{}\"", self.title))
        })?;
        Ok(())
    }

    /// Check a copy back in. Not bounded by `num_copies`.
    pub(crate) fn put_back_copy(&mut self) {
        self.available_copies = self.available_copies.saturating_add(1);
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize)]
pub struct BookShort {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: u32,
    pub num_copies: u32,
    pub available_copies: u32,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            num_copies: book.num_copies,
            available_copies: book.available_copies,
        }
    }
}
