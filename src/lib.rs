//! Elidune Ledger
//!
//! An in-memory library catalog: books, users, and the loan ledger that
//! keeps availability counts consistent with who has borrowed what.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Services;
