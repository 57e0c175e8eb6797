//! Expense Tracker is a console application for recording personal expenses.
//!
//! Expenses are recorded against users and categories in a local SQLite
//! database. The library exposes the database handle, the record store for
//! users, categories and expenses, and the business layer that validates
//! input and computes summaries. The `tracker` binary wraps all of this in an
//! interactive menu.

#![warn(missing_docs)]

pub mod category;
pub mod console;
pub mod database_id;
pub mod db;
pub mod expense;
pub mod format;
pub mod logging;
pub mod operations;
pub mod summary;
pub mod user;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use category::{Category, CategoryName};
pub use database_id::{CategoryId, DatabaseId, ExpenseId, UserId};
pub use db::{DEFAULT_CATEGORIES, Database, current_timestamp, initialize as initialize_db};
pub use expense::{Expense, ExpenseFilter, NewExpense};
pub use summary::ExpenseSummary;
pub use user::{User, UserName};
pub use validation::ValidationError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The database file could not be opened or created.
    ///
    /// Callers should pass in the path that was opened and the error message
    /// from SQLite.
    #[error("could not open the database at \"{0}\": {1}")]
    ConnectionError(String, String),

    /// The database handle was used after it was closed.
    #[error("the database connection has been closed")]
    ConnectionClosed,

    /// Creating the tables or seeding the default categories failed.
    #[error("could not initialize the database schema: {0}")]
    SchemaError(rusqlite::Error),

    /// The caller provided input that failed validation.
    ///
    /// Validation happens before anything is written to the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An empty string was used to create a user name.
    #[error("User name cannot be empty")]
    EmptyUserName,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The specified user name already exists in the database.
    #[error("the user \"{0}\" already exists")]
    DuplicateUserName(String),

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// An expense was given an empty title.
    #[error("Expense title cannot be empty")]
    EmptyTitle,

    /// An expense was given an amount that is zero, negative or not a number.
    #[error("Expense amount must be positive, got {0}")]
    InvalidAmount(f64),

    /// The category ID or user ID of an expense did not refer to an existing
    /// row.
    ///
    /// This is reported by SQLite's foreign key enforcement, so it is only
    /// detected when the insert is attempted.
    #[error("invalid category ID {0} or user ID {1}")]
    InvalidReference(CategoryId, UserId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Whether the error came from checking the caller's input before any
    /// write was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::EmptyUserName
                | Error::EmptyCategoryName
                | Error::EmptyTitle
                | Error::InvalidAmount(_)
        )
    }

    /// Whether the error is a constraint violation reported by SQLite after a
    /// write was attempted.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            Error::DuplicateUserName(_)
                | Error::DuplicateCategoryName(_)
                | Error::InvalidReference(_, _)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

/// Whether `error` is a SQLite UNIQUE constraint failure.
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        )
    )
}

/// Whether `error` is a SQLite FOREIGN KEY constraint failure.
pub(crate) fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        )
    )
}
