//! Defines the expense model and the queries that write expenses.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, ExpenseId, UserId},
    db::current_timestamp,
    is_foreign_key_violation,
};

// ============================================================================
// MODELS
// ============================================================================

/// Money spent by a user on a given day.
///
/// Expenses read from the database carry the names of their category and user
/// so they can be displayed without further queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The day the money was spent.
    pub date: Date,
    /// What the money was spent on.
    pub title: String,
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// When the expense was recorded, formatted as `YYYY-MM-DD HH:MM:SS`.
    pub created_at: String,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// The ID of the user who spent the money.
    pub user_id: UserId,
    /// The name of the category, joined in at read time.
    pub category_name: String,
    /// The name of the user, joined in at read time.
    pub user_name: String,
}

/// The fields needed to insert an expense.
///
/// The ID and `created_at` timestamp are assigned on insert, see
/// [insert_expense].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The day the money was spent.
    pub date: Date,
    /// The category the expense belongs to. Must refer to an existing row.
    pub category_id: CategoryId,
    /// What the money was spent on. Must not be blank.
    pub title: String,
    /// How much was spent. Must be greater than zero.
    pub amount: f64,
    /// The user who spent the money. Must refer to an existing row.
    pub user_id: UserId,
}

impl NewExpense {
    /// Collect the fields of a new expense.
    pub fn new(
        date: Date,
        category_id: CategoryId,
        title: &str,
        amount: f64,
        user_id: UserId,
    ) -> Self {
        Self {
            date,
            category_id,
            title: title.to_owned(),
            amount,
            user_id,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert an expense, stamping it with the current local time.
///
/// The title is trimmed before it is stored. The category and user IDs are
/// not checked up front; SQLite's foreign key enforcement rejects IDs that do
/// not exist.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyTitle] if the title is blank,
/// - [Error::InvalidAmount] if the amount is not greater than zero,
/// - [Error::InvalidReference] if the category or user ID does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_expense(expense: NewExpense, connection: &Connection) -> Result<ExpenseId, Error> {
    insert_expense_with_timestamp(expense, &current_timestamp(), connection)
}

pub(crate) fn insert_expense_with_timestamp(
    expense: NewExpense,
    created_at: &str,
    connection: &Connection,
) -> Result<ExpenseId, Error> {
    let title = expense.title.trim();

    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }

    if !(expense.amount.is_finite() && expense.amount > 0.0) {
        return Err(Error::InvalidAmount(expense.amount));
    }

    connection
        .execute(
            "INSERT INTO Expenses (date, category_id, title, amount, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                expense.date,
                expense.category_id,
                title,
                expense.amount,
                created_at,
                expense.user_id,
            ),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidReference(expense.category_id, expense.user_id)
            } else {
                error.into()
            }
        })?;

    Ok(connection.last_insert_rowid())
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_expenses(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM Expenses;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS Expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                created_at TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES Categories(id),
                FOREIGN KEY(user_id) REFERENCES Users(id)
                )",
        (),
    )?;

    // Listings are always sorted by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON Expenses(date, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a row from the joined expense query to an [Expense].
///
/// Expects the columns `id, date, title, amount, created_at, category_id,
/// user_id, category name, user name` in that order.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        created_at: row.get(4)?,
        category_id: row.get(5)?,
        user_id: row.get(6)?,
        category_name: row.get(7)?,
        user_name: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
