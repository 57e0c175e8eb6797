//! Helpers shared by the unit tests.

use rusqlite::Connection;
use time::Date;

use crate::{
    category::get_category_by_name,
    database_id::{CategoryId, ExpenseId, UserId},
    db::initialize,
    expense::{NewExpense, insert_expense_with_timestamp},
    user::{UserName, create_user},
};

/// An in-memory database with foreign keys enabled and the schema created.
pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", true).unwrap();
    initialize(&conn).unwrap();
    conn
}

pub(crate) fn create_test_user(name: &str, conn: &Connection) -> UserId {
    create_user(UserName::new_unchecked(name), conn)
        .expect("Could not create test user")
        .id
}

/// The ID of one of the seeded categories.
pub(crate) fn test_category_id(name: &str, conn: &Connection) -> CategoryId {
    get_category_by_name(name, conn)
        .unwrap()
        .unwrap_or_else(|| panic!("Category {name} is not seeded"))
        .id
}

pub(crate) fn insert_test_expense(
    date: Date,
    category_id: CategoryId,
    amount: f64,
    user_id: UserId,
    created_at: &str,
    conn: &Connection,
) -> ExpenseId {
    let title = format!("Expense of {amount}");

    insert_expense_with_timestamp(
        NewExpense::new(date, category_id, &title, amount, user_id),
        created_at,
        conn,
    )
    .expect("Could not insert test expense")
}
