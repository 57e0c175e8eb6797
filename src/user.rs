//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use crate::{Error, database_id::UserId, is_unique_violation};

/// A validated, non-empty user name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserName(String);

impl UserName {
    /// Create a user name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyUserName] if `name` is empty
    /// after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyUserName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a user name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Someone who records expenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's unique name.
    pub name: UserName,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS Users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// This function will return a:
/// - [Error::DuplicateUserName] if a user with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(name: UserName, connection: &Connection) -> Result<User, Error> {
    connection
        .execute("INSERT INTO Users (name) VALUES (?1)", (name.as_ref(),))
        .map_err(|error| {
            if is_unique_violation(&error) {
                Error::DuplicateUserName(name.to_string())
            } else {
                error.into()
            }
        })?;

    let id = connection.last_insert_rowid();

    Ok(User { id, name })
}

/// Get the user whose name is exactly `name`.
///
/// Returns `Ok(None)` if there is no such user.
///
/// # Errors
///
/// Returns an [Error::SqlError] if there was an SQL error.
pub fn get_user_by_name(name: &str, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare("SELECT id, name FROM Users WHERE name = :name")?
        .query_row(&[(":name", name.trim())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all users ordered alphabetically by name.
///
/// # Errors
///
/// Returns an [Error::SqlError] if there was an SQL error.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare("SELECT id, name FROM Users ORDER BY name ASC")?
        .query_map([], map_row)?
        .map(|maybe_user| maybe_user.map_err(|error| error.into()))
        .collect()
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM Users;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = UserName::new_unchecked(&raw_name);

    Ok(User { id, name })
}
