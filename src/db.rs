//! The database handle and schema bootstrap.
//!
//! [Database] owns the single SQLite connection used by the application. The
//! connection is released when [Database::close] is called or when the handle
//! is dropped, whichever happens first.

use std::path::Path;

use rusqlite::Connection;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error, category::create_category_table, category::seed_default_categories,
    expense::create_expense_table, user::create_user_table,
};

/// The categories every new database starts with.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Other",
];

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A handle that owns the connection to the expense database.
#[derive(Debug)]
pub struct Database {
    connection: Option<Connection>,
}

impl Database {
    /// Open the database at `path`, creating the file if it does not exist.
    ///
    /// Foreign key enforcement is switched on for the connection.
    ///
    /// # Errors
    ///
    /// Returns an [Error::ConnectionError] if SQLite cannot open the file,
    /// e.g. because the directory does not exist or is not writable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let connection = Connection::open(path)
            .and_then(enable_foreign_keys)
            .map_err(|error| {
                Error::ConnectionError(path.display().to_string(), error.to_string())
            })?;

        tracing::info!("Opened database at {}", path.display());

        Ok(Self {
            connection: Some(connection),
        })
    }

    /// Open a database that lives in memory and disappears when closed.
    ///
    /// # Errors
    ///
    /// Returns an [Error::ConnectionError] if SQLite cannot allocate the
    /// database.
    pub fn open_in_memory() -> Result<Self, Error> {
        let connection = Connection::open_in_memory()
            .and_then(enable_foreign_keys)
            .map_err(|error| Error::ConnectionError(":memory:".to_owned(), error.to_string()))?;

        Ok(Self {
            connection: Some(connection),
        })
    }

    /// Create the tables and seed the default categories.
    ///
    /// Safe to call on a database that has already been initialized.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SchemaError] if any statement fails, or an
    /// [Error::ConnectionClosed] if the handle has been closed.
    pub fn initialize(&self) -> Result<(), Error> {
        initialize(self.connection()?)
    }

    /// Borrow the open connection.
    ///
    /// # Errors
    ///
    /// Returns an [Error::ConnectionClosed] after [Database::close] has been
    /// called.
    pub fn connection(&self) -> Result<&Connection, Error> {
        self.connection.as_ref().ok_or(Error::ConnectionClosed)
    }

    /// Whether the connection is still open.
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Close the connection.
    ///
    /// Calling this on a closed handle does nothing.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SqlError] if SQLite fails to close the connection.
    /// The handle counts as closed either way.
    pub fn close(&mut self) -> Result<(), Error> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };

        connection.close().map_err(|(_, error)| Error::from(error))?;
        tracing::debug!("Closed database connection");

        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            tracing::error!("Could not close the database connection: {error}");
        }
    }
}

fn enable_foreign_keys(connection: Connection) -> Result<Connection, rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    Ok(connection)
}

/// Create the tables for the domain models and seed the default categories.
///
/// The statements are not wrapped in a transaction, so a failure part way
/// through can leave some tables created.
///
/// # Errors
///
/// Returns an [Error::SchemaError] if any statement fails.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_user_table(connection).map_err(Error::SchemaError)?;
    create_category_table(connection).map_err(Error::SchemaError)?;
    create_expense_table(connection).map_err(Error::SchemaError)?;
    seed_default_categories(connection).map_err(Error::SchemaError)?;

    Ok(())
}

/// The current local time formatted as `YYYY-MM-DD HH:MM:SS`.
///
/// Falls back to UTC if the local UTC offset cannot be determined.
pub fn current_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|error| {
        tracing::warn!("Could not get the local time, using UTC instead: {error}");
        OffsetDateTime::now_utc()
    });

    format_timestamp(now)
}

fn format_timestamp(date_time: OffsetDateTime) -> String {
    // Only numeric components, so formatting cannot fail.
    date_time
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| date_time.to_string())
}
