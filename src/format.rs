//! Plain-text rendering of amounts, expense tables and summaries for the
//! console.

use crate::{expense::Expense, summary::ExpenseSummary};

/// Format `amount` as dollars with two decimal places, e.g. `$50.00`.
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// A column of a text table: a header and a minimum width.
struct Column {
    header: &'static str,
    min_width: usize,
}

/// Lay out `rows` under `columns`, padding every cell to the widest value in
/// its column.
fn render_table(columns: &[Column], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain([column.header.len(), column.min_width])
                .max()
                .unwrap_or(column.min_width)
        })
        .collect();

    let header = render_row(columns.iter().map(|column| column.header), &widths);
    let separator = "-".repeat(header.chars().count());

    let mut lines = vec![header, separator];
    lines.extend(
        rows.iter()
            .map(|row| render_row(row.iter().map(String::as_str), &widths)),
    );

    lines
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_owned()
}

/// Render expenses as a table with the columns
/// `ID | Date | Title | Amount | Category | User`.
///
/// Returns `No expenses found.` if `expenses` is empty.
pub fn format_expense_table(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_owned();
    }

    let columns = [
        Column { header: "ID", min_width: 3 },
        Column { header: "Date", min_width: 10 },
        Column { header: "Title", min_width: 15 },
        Column { header: "Amount", min_width: 10 },
        Column { header: "Category", min_width: 10 },
        Column { header: "User", min_width: 10 },
    ];

    let rows: Vec<Vec<String>> = expenses
        .iter()
        .map(|expense| {
            vec![
                expense.id.to_string(),
                expense.date.to_string(),
                expense.title.clone(),
                format_currency(expense.amount),
                expense.category_name.clone(),
                expense.user_name.clone(),
            ]
        })
        .collect();

    render_table(&columns, &rows).join("\n")
}

/// Render a summary in three parts: a table of each user's expenses with
/// their total, the overall total and count, and the share of the total
/// spent in each category.
pub fn format_summary(summary: &ExpenseSummary) -> String {
    let rule = "=".repeat(80);
    let mut output = vec!["=== EXPENSE SUMMARY ===".to_owned(), String::new()];

    if !summary.user_expenses.is_empty() {
        output.push("EXPENSES BY USER:".to_owned());
        output.push(rule.clone());

        for (user, expenses) in &summary.user_expenses {
            output.push(String::new());
            output.push(format!("{user}'s Expenses:"));
            output.push("-".repeat(80));

            let columns = [
                Column { header: "Date", min_width: 10 },
                Column { header: "Title", min_width: 15 },
                Column { header: "Amount", min_width: 8 },
                Column { header: "Category", min_width: 10 },
            ];

            let mut rows: Vec<Vec<String>> = expenses
                .iter()
                .map(|expense| {
                    vec![
                        expense.date.to_string(),
                        expense.title.clone(),
                        format_currency(expense.amount),
                        expense.category_name.clone(),
                    ]
                })
                .collect();

            let user_total = summary.by_user.get(user).copied().unwrap_or_default();
            rows.push(vec![
                "TOTAL".to_owned(),
                String::new(),
                format_currency(user_total),
                format!("{} expense(s)", expenses.len()),
            ]);

            let mut table = render_table(&columns, &rows);
            // Rule off the total from the expenses above it.
            let separator = table[1].clone();
            table.insert(table.len() - 1, separator);
            output.extend(table);
        }

        output.push(String::new());
        output.push(rule);
        output.push(String::new());
    }

    output.push("OVERALL SUMMARY:".to_owned());
    output.push(format!("Total Expenses: {}", format_currency(summary.total)));
    output.push(format!("Number of Expenses: {}", summary.count));

    let breakdown = summary.category_percentages();
    if !breakdown.is_empty() {
        output.push(String::new());
        output.push("CATEGORY BREAKDOWN (with Percentages):".to_owned());

        for (category, amount, percentage) in breakdown {
            output.push(format!(
                "  {category}: {} ({percentage:.1}%)",
                format_currency(amount)
            ));
        }
    }

    output.join("\n")
}

#[cfg(test)]
mod currency_tests {
    use super::format_currency;

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_currency(50.0), "$50.00");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(1234.5), "$1234.50");
    }

    #[test]
    fn formats_zero_and_negative_amounts() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-4.5), "-$4.50");
    }
}
