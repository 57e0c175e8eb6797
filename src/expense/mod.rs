//! Expense records: the model, the table, and the filtered query used by
//! every expense listing.

mod core;
mod query;

pub use self::core::{
    Expense, NewExpense, count_expenses, create_expense_table, insert_expense, map_expense_row,
};
pub use self::query::{ExpenseFilter, fetch_expenses_by_filters};

#[cfg(test)]
pub(crate) use self::core::insert_expense_with_timestamp;
