//! Totals and group-by aggregates over a list of expenses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::expense::Expense;

/// Totals for a set of expenses, broken down by category and by user.
///
/// A summary is computed on demand from a list of expenses and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseSummary {
    /// The sum of all expense amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
    /// The summed amount for each category name.
    pub by_category: BTreeMap<String, f64>,
    /// The summed amount for each user name.
    pub by_user: BTreeMap<String, f64>,
    /// Each user's expenses, in the order they were given.
    pub user_expenses: BTreeMap<String, Vec<Expense>>,
}

impl ExpenseSummary {
    /// Summarise `expenses` in a single pass.
    ///
    /// An empty slice gives a summary with a zero total and empty maps.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut summary = Self {
            count: expenses.len(),
            ..Default::default()
        };

        for expense in expenses {
            summary.total += expense.amount;

            *summary
                .by_category
                .entry(expense.category_name.clone())
                .or_insert(0.0) += expense.amount;

            *summary
                .by_user
                .entry(expense.user_name.clone())
                .or_insert(0.0) += expense.amount;

            summary
                .user_expenses
                .entry(expense.user_name.clone())
                .or_default()
                .push(expense.clone());
        }

        summary
    }

    /// The share of the total spent in each category, as a percentage.
    ///
    /// Sorted by amount, largest first. Empty when the total is zero.
    pub fn category_percentages(&self) -> Vec<(&str, f64, f64)> {
        if self.total <= 0.0 {
            return Vec::new();
        }

        let mut breakdown: Vec<(&str, f64, f64)> = self
            .by_category
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount, amount / self.total * 100.0))
            .collect();

        breakdown.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        breakdown
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::expense::Expense;

    use super::ExpenseSummary;

    fn expense(id: i64, date: Date, amount: f64, category: &str, user: &str) -> Expense {
        Expense {
            id,
            date,
            title: format!("expense #{id}"),
            amount,
            created_at: "2025-10-25 12:00:00".to_owned(),
            category_id: 1,
            user_id: 1,
            category_name: category.to_owned(),
            user_name: user.to_owned(),
        }
    }

    #[test]
    fn empty_input_gives_zero_summary() {
        let summary = ExpenseSummary::from_expenses(&[]);

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.count, 0);
        assert!(summary.by_category.is_empty());
        assert!(summary.by_user.is_empty());
        assert!(summary.user_expenses.is_empty());
        assert!(summary.category_percentages().is_empty());
    }

    #[test]
    fn groups_by_user() {
        let expenses = [
            expense(1, date!(2025 - 10 - 20), 25.0, "Food", "Alice"),
            expense(2, date!(2025 - 10 - 21), 15.0, "Food", "Bob"),
            expense(3, date!(2025 - 10 - 22), 40.0, "Shopping", "Alice"),
        ];

        let summary = ExpenseSummary::from_expenses(&expenses);

        assert_eq!(summary.total, 80.0);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.by_user["Alice"], 65.0);
        assert_eq!(summary.by_user["Bob"], 15.0);
        assert_eq!(summary.by_user.len(), 2);
        assert_eq!(summary.user_expenses["Alice"].len(), 2);
        assert_eq!(summary.user_expenses["Bob"].len(), 1);
    }

    #[test]
    fn user_expenses_keep_input_order() {
        let expenses = [
            expense(7, date!(2025 - 10 - 30), 1.0, "Food", "Alice"),
            expense(3, date!(2025 - 10 - 10), 2.0, "Food", "Bob"),
            expense(5, date!(2025 - 10 - 20), 3.0, "Food", "Alice"),
        ];

        let summary = ExpenseSummary::from_expenses(&expenses);

        let ids: Vec<i64> = summary.user_expenses["Alice"].iter().map(|e| e.id).collect();
        assert_eq!(ids, [7, 5]);
    }

    #[test]
    fn group_sums_partition_the_total() {
        let amounts = [12.5, 0.25, 99.99, 3.0, 41.1, 7.75];
        let users = ["Alice", "Bob", "Carol"];
        let categories = ["Food", "Other"];
        let expenses: Vec<Expense> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                expense(
                    i as i64,
                    date!(2025 - 01 - 01),
                    *amount,
                    categories[i % categories.len()],
                    users[i % users.len()],
                )
            })
            .collect();

        let summary = ExpenseSummary::from_expenses(&expenses);

        let want_total: f64 = amounts.iter().sum();
        let by_user_total: f64 = summary.by_user.values().sum();
        let by_category_total: f64 = summary.by_category.values().sum();
        assert!((summary.total - want_total).abs() < 1e-9);
        assert!((by_user_total - summary.total).abs() < 1e-9);
        assert!((by_category_total - summary.total).abs() < 1e-9);
        assert_eq!(summary.count, amounts.len());
    }

    #[test]
    fn category_percentages_are_sorted_by_amount() {
        let expenses = [
            expense(1, date!(2025 - 10 - 20), 25.0, "Food", "Alice"),
            expense(2, date!(2025 - 10 - 21), 75.0, "Shopping", "Bob"),
        ];

        let summary = ExpenseSummary::from_expenses(&expenses);

        assert_eq!(
            summary.category_percentages(),
            [("Shopping", 75.0, 75.0), ("Food", 25.0, 25.0)]
        );
    }

    #[test]
    fn serializes_totals_as_json() {
        let summary = ExpenseSummary::from_expenses(&[expense(
            1,
            date!(2025 - 10 - 20),
            25.0,
            "Food",
            "Alice",
        )]);

        let json = serde_json::to_value(&summary).expect("Could not serialize summary");

        assert_eq!(json["total"], 25.0);
        assert_eq!(json["count"], 1);
        assert_eq!(json["by_category"]["Food"], 25.0);
    }
}
