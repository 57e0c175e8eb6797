//! The business layer: validates input, resolves users and categories by name,
//! and builds the filtered views and summaries shown to the user.
//!
//! Every function here takes the connection by reference and returns a
//! `Result`. Input is validated before anything is written, so an
//! [Error::Validation] means the database was not touched.

use std::collections::HashMap;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    category::{CategoryName, create_category, get_all_categories, get_category_by_name},
    database_id::{CategoryId, ExpenseId, UserId},
    expense::{Expense, ExpenseFilter, NewExpense, fetch_expenses_by_filters, insert_expense},
    summary::ExpenseSummary,
    user::{UserName, create_user, get_user_by_name},
    validation::{
        ValidationError, validate_amount, validate_amount_range, validate_date,
        validate_date_range, validate_non_empty,
    },
};

/// Record an expense, creating the user and category if they do not exist.
///
/// `date` must be a `YYYY-MM-DD` string. Unknown user and category names are
/// never rejected: a new row is created and an info-level log event is
/// emitted. Existing rows are reused, so recording many expenses for the same
/// name creates exactly one user.
///
/// # Errors
///
/// This function will return a:
/// - [Error::Validation] naming the field if the date, amount, title, user
///   name or category is invalid,
/// - or any error from [insert_expense] and the user/category queries.
pub fn record_expense(
    date: &str,
    category: &str,
    title: &str,
    amount: f64,
    user_name: &str,
    connection: &Connection,
) -> Result<ExpenseId, Error> {
    let date = validate_date(date)?;
    let amount = validate_amount(amount)?;
    let title = validate_non_empty(title, "Title")?;
    let user_name = validate_non_empty(user_name, "User name")?;
    let category = validate_non_empty(category, "Category")?;

    let user_id = get_or_create_user(&user_name, connection)?;
    let category_id = get_or_create_category(&category, connection)?;

    let expense_id = insert_expense(
        NewExpense::new(date, category_id, &title, amount, user_id),
        connection,
    )?;
    tracing::info!("Expense recorded successfully with ID: {expense_id}");

    Ok(expense_id)
}

fn get_or_create_user(name: &str, connection: &Connection) -> Result<UserId, Error> {
    if let Some(user) = get_user_by_name(name, connection)? {
        return Ok(user.id);
    }

    let user = create_user(UserName::new(name)?, connection)?;
    tracing::info!("Created new user: {}", user.name);

    Ok(user.id)
}

fn get_or_create_category(name: &str, connection: &Connection) -> Result<CategoryId, Error> {
    if let Some(category) = get_category_by_name(name, connection)? {
        return Ok(category.id);
    }

    let category = create_category(CategoryName::new(name)?, connection)?;
    tracing::info!("Created new category: {}", category.name);

    Ok(category.id)
}

/// Get every expense, newest first.
pub fn view_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    fetch_expenses_by_filters(&ExpenseFilter::new(), connection)
}

/// Get the expenses dated between `min_date` and `max_date`, inclusive.
///
/// Pass `None` to omit a bound. An empty string is not treated as a missing
/// bound: it is rejected like any other malformed date, so callers reading
/// blank input should map it to `None` first.
///
/// # Errors
///
/// Returns an [Error::Validation] if a date is empty or malformed, or if the
/// start date is after the end date.
pub fn view_expenses_by_date(
    min_date: Option<&str>,
    max_date: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let min_date = min_date.map(validate_date).transpose()?;
    let max_date = max_date.map(validate_date).transpose()?;

    view_expenses_in_date_range(min_date, max_date, connection)
}

/// Same as [view_expenses_by_date] for dates that have already been parsed.
pub fn view_expenses_in_date_range(
    min_date: Option<Date>,
    max_date: Option<Date>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    validate_date_range(min_date, max_date)?;

    fetch_expenses_by_filters(
        &ExpenseFilter::new().min_date(min_date).max_date(max_date),
        connection,
    )
}

/// Get the expenses with an amount between `min_amount` and `max_amount`,
/// inclusive.
///
/// # Errors
///
/// Returns an [Error::Validation] if a bound is negative or the minimum is
/// greater than the maximum.
pub fn view_expenses_by_amount(
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    validate_amount_range(min_amount, max_amount)?;

    fetch_expenses_by_filters(
        &ExpenseFilter::new()
            .min_amount(min_amount)
            .max_amount(max_amount),
        connection,
    )
}

/// Get the expenses in any of the named categories.
///
/// Names are matched case-insensitively. Names that match no category are
/// skipped with a warning. If no names match, or `categories` is empty, the
/// result is empty rather than every expense.
pub fn view_expenses_by_category<S: AsRef<str>>(
    categories: &[S],
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let lookup: HashMap<String, CategoryId> = get_all_categories(connection)?
        .into_iter()
        .map(|category| (category.name.as_ref().to_lowercase(), category.id))
        .collect();

    let mut category_ids = Vec::new();
    let mut unknown = Vec::new();

    for name in categories {
        let name = name.as_ref();

        match lookup.get(&name.trim().to_lowercase()) {
            Some(id) if !category_ids.contains(id) => category_ids.push(*id),
            Some(_) => {}
            None => unknown.push(name),
        }
    }

    if !unknown.is_empty() {
        tracing::warn!("Categories not found: {}", unknown.join(", "));
    }

    if category_ids.is_empty() {
        tracing::info!("No valid categories found");
        return Ok(Vec::new());
    }

    fetch_expenses_by_filters(
        &ExpenseFilter::new().category_ids(Some(category_ids)),
        connection,
    )
}

/// Get the expenses recorded for the user with ID `user_id`.
///
/// # Errors
///
/// Returns an [Error::Validation] if `user_id` is not positive.
pub fn view_expenses_by_user(user_id: UserId, connection: &Connection) -> Result<Vec<Expense>, Error> {
    if user_id <= 0 {
        return Err(ValidationError::InvalidUserId(user_id).into());
    }

    fetch_expenses_by_filters(&ExpenseFilter::new().user_id(Some(user_id)), connection)
}

/// Summarise `expenses`, or every expense in the database if `None`.
pub fn calculate_summary(
    expenses: Option<&[Expense]>,
    connection: &Connection,
) -> Result<ExpenseSummary, Error> {
    match expenses {
        Some(expenses) => Ok(ExpenseSummary::from_expenses(expenses)),
        None => {
            let expenses = view_all_expenses(connection)?;
            Ok(ExpenseSummary::from_expenses(&expenses))
        }
    }
}

#[cfg(test)]
mod record_expense_tests {
    use time::macros::date;

    use crate::{
        Error, ValidationError,
        category::{count_categories, get_category_by_name},
        db::DEFAULT_CATEGORIES,
        expense::count_expenses,
        operations::{record_expense, view_all_expenses},
        test_utils::get_test_connection,
        user::{count_users, get_user_by_name},
    };

    #[test]
    fn records_expense_and_round_trips() {
        let conn = get_test_connection();

        let id = record_expense("2025-10-25", "Food", "Groceries", 54.3, "Alice", &conn)
            .expect("Could not record expense");

        assert!(id > 0);
        let expenses = view_all_expenses(&conn).unwrap();
        assert_eq!(expenses.len(), 1);
        let got = &expenses[0];
        assert_eq!(got.id, id);
        assert_eq!(got.date, date!(2025 - 10 - 25));
        assert_eq!(got.category_name, "Food");
        assert_eq!(got.title, "Groceries");
        assert_eq!(got.amount, 54.3);
        assert_eq!(got.user_name, "Alice");
    }

    #[test]
    fn unseen_user_is_created_once() {
        let conn = get_test_connection();

        record_expense("2025-10-25", "Food", "Lunch", 10.0, "Alice", &conn).unwrap();
        let user_id = get_user_by_name("Alice", &conn).unwrap().unwrap().id;
        record_expense("2025-10-26", "Food", "Dinner", 20.0, "Alice", &conn).unwrap();

        assert_eq!(count_users(&conn), Ok(1));
        let expenses = view_all_expenses(&conn).unwrap();
        assert!(expenses.iter().all(|expense| expense.user_id == user_id));
    }

    #[test]
    fn unseen_category_is_created_once() {
        let conn = get_test_connection();

        record_expense("2025-10-25", "Books", "Novel", 18.0, "Alice", &conn).unwrap();
        record_expense("2025-10-26", "Books", "Atlas", 30.0, "Bob", &conn).unwrap();

        assert_eq!(count_categories(&conn), Ok(DEFAULT_CATEGORIES.len() + 1));
        assert!(get_category_by_name("Books", &conn).unwrap().is_some());
    }

    #[test]
    fn names_are_trimmed_before_lookup() {
        let conn = get_test_connection();

        record_expense("2025-10-25", " Food ", "Lunch", 10.0, "Alice", &conn).unwrap();
        record_expense("2025-10-25", "Food", "Lunch", 10.0, "  Alice\t", &conn).unwrap();

        assert_eq!(count_users(&conn), Ok(1));
        assert_eq!(count_categories(&conn), Ok(DEFAULT_CATEGORIES.len()));
    }

    #[test]
    fn invalid_input_is_rejected_before_any_write() {
        let conn = get_test_connection();

        let cases = [
            (
                record_expense("2025-02-30", "Food", "Lunch", 10.0, "Alice", &conn),
                ValidationError::InvalidDate("2025-02-30".to_owned()),
            ),
            (
                record_expense("25/10/2025", "Food", "Lunch", 10.0, "Alice", &conn),
                ValidationError::InvalidDateFormat("25/10/2025".to_owned()),
            ),
            (
                record_expense("2025-10-25", "Food", "Lunch", 0.0, "Alice", &conn),
                ValidationError::NonPositiveAmount(0.0),
            ),
            (
                record_expense("2025-10-25", "Food", "  ", 10.0, "Alice", &conn),
                ValidationError::EmptyField("Title"),
            ),
            (
                record_expense("2025-10-25", "Food", "Lunch", 10.0, "", &conn),
                ValidationError::EmptyField("User name"),
            ),
            (
                record_expense("2025-10-25", "\t", "Lunch", 10.0, "Alice", &conn),
                ValidationError::EmptyField("Category"),
            ),
        ];

        for (got, want) in cases {
            assert_eq!(got, Err(Error::Validation(want)));
        }

        assert_eq!(count_expenses(&conn), Ok(0));
        assert_eq!(count_users(&conn), Ok(0));
        assert_eq!(count_categories(&conn), Ok(DEFAULT_CATEGORIES.len()));
    }
}

#[cfg(test)]
mod view_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, ValidationError,
        operations::{
            record_expense, view_all_expenses, view_expenses_by_amount, view_expenses_by_category,
            view_expenses_by_date, view_expenses_by_user,
        },
        test_utils::get_test_connection,
        user::get_user_by_name,
    };

    fn seeded_connection() -> Connection {
        let conn = get_test_connection();
        record_expense("2025-10-20", "Food", "Lunch", 10.0, "Alice", &conn).unwrap();
        record_expense("2025-10-25", "Utilities", "Power", 20.0, "Alice", &conn).unwrap();
        record_expense("2025-10-30", "Transportation", "Bus", 30.0, "Bob", &conn).unwrap();
        conn
    }

    #[test]
    fn date_range_returns_only_expenses_inside() {
        let conn = seeded_connection();

        let got = view_expenses_by_date(Some("2025-10-22"), Some("2025-10-28"), &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, date!(2025 - 10 - 25));
    }

    #[test]
    fn open_ended_date_range() {
        let conn = seeded_connection();

        let got = view_expenses_by_date(Some("2025-10-25"), None, &conn).unwrap();

        assert_eq!(got.len(), 2);
    }

    #[test]
    fn reversed_date_range_is_rejected() {
        let conn = seeded_connection();

        let got = view_expenses_by_date(Some("2025-10-28"), Some("2025-10-22"), &conn);

        assert_eq!(
            got,
            Err(Error::Validation(ValidationError::InvalidDateRange(
                date!(2025 - 10 - 28),
                date!(2025 - 10 - 22)
            )))
        );
    }

    #[test]
    fn malformed_date_bound_is_rejected() {
        let conn = seeded_connection();

        let got = view_expenses_by_date(Some("yesterday"), None, &conn);

        assert!(matches!(got, Err(Error::Validation(_))), "got {got:?}");
    }

    #[test]
    fn empty_date_bound_is_rejected_not_skipped() {
        let conn = seeded_connection();

        let got = view_expenses_by_date(Some(""), None, &conn);

        assert_eq!(got, Err(Error::Validation(ValidationError::EmptyField("Date"))));
    }

    #[test]
    fn amount_range() {
        let conn = seeded_connection();

        let got = view_expenses_by_amount(Some(15.0), Some(30.0), &conn).unwrap();

        let titles: Vec<&str> = got.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Bus", "Power"]);
    }

    #[test]
    fn invalid_amount_ranges_are_rejected() {
        let conn = seeded_connection();

        assert!(view_expenses_by_amount(Some(-1.0), None, &conn).is_err());
        assert!(view_expenses_by_amount(Some(40.0), Some(30.0), &conn).is_err());
    }

    #[test]
    fn nan_amount_bound_is_rejected_instead_of_matching_nothing() {
        let conn = seeded_connection();

        let result = view_expenses_by_amount(Some(f64::NAN), None, &conn);

        assert_eq!(
            result,
            Err(Error::Validation(ValidationError::NonFiniteAmountBound("Minimum")))
        );
    }

    #[test]
    fn category_names_are_case_insensitive() {
        let conn = seeded_connection();

        let got = view_expenses_by_category(&["food", "UTILITIES"], &conn).unwrap();

        let titles: Vec<&str> = got.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Power", "Lunch"]);
    }

    #[test]
    fn unknown_category_names_are_dropped() {
        let conn = seeded_connection();

        let got = view_expenses_by_category(&["Food", "Gardening"], &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Lunch");
    }

    #[test]
    fn no_matching_category_names_returns_nothing() {
        let conn = seeded_connection();

        let got = view_expenses_by_category(&["Gardening"], &conn).unwrap();
        let empty: [&str; 0] = [];
        let got_for_empty = view_expenses_by_category(&empty, &conn).unwrap();

        assert!(got.is_empty());
        assert!(got_for_empty.is_empty());
    }

    #[test]
    fn user_filter() {
        let conn = seeded_connection();
        let bob = get_user_by_name("Bob", &conn).unwrap().unwrap();

        let got = view_expenses_by_user(bob.id, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].user_name, "Bob");
    }

    #[test]
    fn non_positive_user_id_is_rejected() {
        let conn = seeded_connection();

        assert_eq!(
            view_expenses_by_user(0, &conn),
            Err(Error::Validation(ValidationError::InvalidUserId(0)))
        );
    }

    #[test]
    fn view_all_is_newest_first() {
        let conn = seeded_connection();

        let dates: Vec<_> = view_all_expenses(&conn)
            .unwrap()
            .into_iter()
            .map(|expense| expense.date)
            .collect();

        assert_eq!(
            dates,
            [date!(2025 - 10 - 30), date!(2025 - 10 - 25), date!(2025 - 10 - 20)]
        );
    }
}
