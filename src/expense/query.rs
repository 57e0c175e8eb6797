//! The filtered expense query shared by every expense listing.

use rusqlite::{Connection, ToSql, params_from_iter};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, UserId},
};

use super::core::{Expense, map_expense_row};

/// Optional criteria for narrowing an expense query.
///
/// Every field is independent: `None` adds no condition, and all present
/// fields must hold for an expense to match. An empty `category_ids` list is
/// treated the same as `None`.
///
/// # Examples
///
/// ```
/// use expense_tracker::ExpenseFilter;
/// use time::macros::date;
///
/// let filter = ExpenseFilter::new()
///     .min_date(Some(date!(2025 - 10 - 01)))
///     .max_amount(Some(50.0))
///     .user_id(Some(1));
///
/// assert_eq!(filter.max_date, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Earliest date to include.
    pub min_date: Option<Date>,
    /// Latest date to include.
    pub max_date: Option<Date>,
    /// Smallest amount to include.
    pub min_amount: Option<f64>,
    /// Largest amount to include.
    pub max_amount: Option<f64>,
    /// Categories to include.
    pub category_ids: Option<Vec<CategoryId>>,
    /// The user whose expenses to include.
    pub user_id: Option<UserId>,
}

impl ExpenseFilter {
    /// A filter that matches every expense.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the earliest date (inclusive).
    pub fn min_date(mut self, min_date: Option<Date>) -> Self {
        self.min_date = min_date;
        self
    }

    /// Set the latest date (inclusive).
    pub fn max_date(mut self, max_date: Option<Date>) -> Self {
        self.max_date = max_date;
        self
    }

    /// Set the smallest amount (inclusive).
    pub fn min_amount(mut self, min_amount: Option<f64>) -> Self {
        self.min_amount = min_amount;
        self
    }

    /// Set the largest amount (inclusive).
    pub fn max_amount(mut self, max_amount: Option<f64>) -> Self {
        self.max_amount = max_amount;
        self
    }

    /// Set the categories to include.
    pub fn category_ids(mut self, category_ids: Option<Vec<CategoryId>>) -> Self {
        self.category_ids = category_ids;
        self
    }

    /// Set the user to include.
    pub fn user_id(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Build the `WHERE` clause and its parameters, in placeholder order.
    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(min_date) = self.min_date {
            conditions.push("e.date >= ?".to_owned());
            params.push(Box::new(min_date));
        }

        if let Some(max_date) = self.max_date {
            conditions.push("e.date <= ?".to_owned());
            params.push(Box::new(max_date));
        }

        if let Some(min_amount) = self.min_amount {
            conditions.push("e.amount >= ?".to_owned());
            params.push(Box::new(min_amount));
        }

        if let Some(max_amount) = self.max_amount {
            conditions.push("e.amount <= ?".to_owned());
            params.push(Box::new(max_amount));
        }

        if let Some(category_ids) = self.category_ids.as_ref().filter(|ids| !ids.is_empty()) {
            let placeholders = vec!["?"; category_ids.len()].join(", ");
            conditions.push(format!("e.category_id IN ({placeholders})"));
            params.extend(
                category_ids
                    .iter()
                    .map(|id| Box::new(*id) as Box<dyn ToSql>),
            );
        }

        if let Some(user_id) = self.user_id {
            conditions.push("e.user_id = ?".to_owned());
            params.push(Box::new(user_id));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// Get the expenses matching `filter`, newest first.
///
/// Expenses are sorted by date, then by when they were recorded, both
/// descending. Expenses recorded in the same second are sorted by ID so the
/// order is stable.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Expense row mapping fails
pub fn fetch_expenses_by_filters(
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let (where_clause, params) = filter.where_clause();

    let query = format!(
        "SELECT e.id, e.date, e.title, e.amount, e.created_at, e.category_id, e.user_id, \
        c.name, u.name FROM Expenses e \
        INNER JOIN Categories c ON e.category_id = c.id \
        INNER JOIN Users u ON e.user_id = u.id \
        {where_clause} \
        ORDER BY e.date DESC, e.created_at DESC, e.id DESC"
    );
    tracing::debug!("Fetching expenses with query: {query}");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}
