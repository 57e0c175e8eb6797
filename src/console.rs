//! The interactive menu of the `tracker` binary.
//!
//! The console reads one line per prompt from any [BufRead] and writes to any
//! [Write], so a session can be scripted in tests. Errors from the database
//! and from validation are printed and the menu is shown again; only I/O
//! errors end the session early. Reaching the end of the input ends the
//! session as if `0. Exit` had been chosen.

use std::io::{self, BufRead, Write};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error, ValidationError,
    category::{Category, CategoryName, create_category, get_all_categories},
    expense::Expense,
    format::{format_currency, format_expense_table, format_summary},
    operations::{
        calculate_summary, record_expense, view_all_expenses, view_expenses_by_amount,
        view_expenses_by_category, view_expenses_by_date, view_expenses_by_user,
    },
    user::{UserName, create_user, get_all_users},
    validation::parse_amount,
};

const MAIN_MENU: [&str; 9] = [
    "Record New Expense",
    "View All Expenses",
    "Filter by Date Range",
    "Filter by Amount Range",
    "Filter by Category",
    "Filter by User",
    "View Expense Summary",
    "Manage Users",
    "Manage Categories",
];

/// An interactive session over a database connection.
pub struct Console<'a, R, W> {
    connection: &'a Connection,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    /// Create a session that reads from `input` and writes to `output`.
    pub fn new(connection: &'a Connection, input: R, output: W) -> Self {
        Self {
            connection,
            input,
            output,
        }
    }

    /// Show the main menu until the user exits or the input ends.
    ///
    /// # Errors
    /// Returns an [io::Error] if reading the input or writing the output
    /// fails.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to the Expense Tracking System!")?;

        loop {
            match self.main_menu() {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(error) => return Err(error),
            }
        }

        writeln!(
            self.output,
            "\nThank you for using the Expense Tracking System!"
        )?;
        self.output.flush()
    }

    /// Run one pass of the main menu. Returns `false` once the user exits.
    fn main_menu(&mut self) -> io::Result<bool> {
        self.print_menu("Expense Tracker", &MAIN_MENU, "Exit")?;

        match self.menu_choice(MAIN_MENU.len())? {
            0 => return Ok(false),
            1 => self.record_new_expense()?,
            2 => self.view_all_expenses()?,
            3 => self.filter_by_date_range()?,
            4 => self.filter_by_amount_range()?,
            5 => self.filter_by_category()?,
            6 => self.filter_by_user()?,
            7 => self.view_summary()?,
            8 => self.manage_users()?,
            9 => self.manage_categories()?,
            _ => {}
        }

        Ok(true)
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn record_new_expense(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Record New Expense ===")?;

        let date = self.prompt("Enter date (YYYY-MM-DD, leave empty for today): ")?;
        let date = if date.is_empty() { today() } else { date };
        let title = self.prompt("Enter expense title: ")?;

        let amount = self.prompt("Enter amount: ")?;
        let amount = match parse_amount(&amount) {
            Ok(amount) => amount,
            Err(error) => return self.print_error(&error.into()),
        };

        let user_name = self.prompt("Enter your name: ")?;
        let category = self.choose_category()?;

        match record_expense(&date, &category, &title, amount, &user_name, self.connection) {
            Ok(expense_id) => {
                writeln!(self.output, "\nExpense recorded successfully!")?;
                writeln!(self.output, "Expense ID: {expense_id}")?;
                writeln!(self.output, "Date: {date}")?;
                writeln!(self.output, "Title: {}", title.trim())?;
                writeln!(self.output, "Amount: {}", format_currency(amount))?;
                writeln!(self.output, "Category: {}", category.trim())?;
                writeln!(self.output, "User: {}", user_name.trim())
            }
            Err(error) => self.print_error(&error),
        }
    }

    /// Ask for a category by its number in the list, or by a new name.
    fn choose_category(&mut self) -> io::Result<String> {
        let categories = match get_all_categories(self.connection) {
            Ok(categories) => categories,
            Err(error) => {
                self.print_error(&error)?;
                Vec::new()
            }
        };

        writeln!(self.output, "\nAvailable categories:")?;
        self.print_numbered(categories.iter().map(|category| category.name.as_ref()))?;

        loop {
            let choice = self.prompt(&format!(
                "Enter category number (1-{}) or enter new category name: ",
                categories.len()
            ))?;

            match choice.parse::<usize>() {
                Ok(number) => match number_to_category(number, &categories) {
                    Some(category) => return Ok(category.name.to_string()),
                    None => writeln!(
                        self.output,
                        "Please enter a number between 1 and {}",
                        categories.len()
                    )?,
                },
                Err(_) => return Ok(choice),
            }
        }
    }

    fn view_all_expenses(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== All Expenses ===")?;
        let expenses = view_all_expenses(self.connection);
        self.print_expenses(expenses, "No expenses found.")
    }

    fn filter_by_date_range(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "\nEnter date range (YYYY-MM-DD format, leave empty to skip):"
        )?;
        let min_date = self.prompt("Start date (min): ")?;
        let max_date = self.prompt("End date (max): ")?;

        let expenses = view_expenses_by_date(
            non_empty(&min_date),
            non_empty(&max_date),
            self.connection,
        );
        self.print_expenses(expenses, "No expenses found for the specified date range.")
    }

    fn filter_by_amount_range(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nEnter amount range (leave empty to skip):")?;
        let min_amount = self.prompt("Minimum amount: ")?;
        let max_amount = self.prompt("Maximum amount: ")?;

        let bounds = parse_bound(&min_amount).and_then(|min| Ok((min, parse_bound(&max_amount)?)));
        let expenses = match bounds {
            Ok((min, max)) => view_expenses_by_amount(min, max, self.connection),
            Err(error) => Err(error.into()),
        };
        self.print_expenses(expenses, "No expenses found for the specified amount range.")
    }

    fn filter_by_category(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Filter Expenses by Category ===")?;

        let categories = match get_all_categories(self.connection) {
            Ok(categories) => categories,
            Err(error) => return self.print_error(&error),
        };

        writeln!(self.output, "Available categories:")?;
        self.print_numbered(categories.iter().map(|category| category.name.as_ref()))?;

        let choice = self.prompt("Enter category numbers or names, separated by commas: ")?;
        let names: Vec<String> = choice
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| match name.parse::<usize>() {
                Ok(number) => number_to_category(number, &categories)
                    .map(|category| category.name.to_string())
                    .unwrap_or_else(|| name.to_owned()),
                Err(_) => name.to_owned(),
            })
            .collect();

        let expenses = view_expenses_by_category(&names, self.connection);
        self.print_expenses(expenses, "No expenses found for the selected categories.")
    }

    fn filter_by_user(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Filter Expenses by User ===")?;

        let users = match get_all_users(self.connection) {
            Ok(users) => users,
            Err(error) => return self.print_error(&error),
        };

        if users.is_empty() {
            return writeln!(self.output, "No users available.");
        }

        writeln!(self.output, "Available users:")?;
        self.print_numbered(users.iter().map(|user| user.name.as_ref()))?;

        let user = loop {
            let choice = self.prompt(&format!("Enter user number (1-{}): ", users.len()))?;

            match choice.parse::<usize>() {
                Ok(number) if (1..=users.len()).contains(&number) => break &users[number - 1],
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}",
                    users.len()
                )?,
            }
        };

        let expenses = view_expenses_by_user(user.id, self.connection);
        self.print_expenses(expenses, "No expenses found for the selected user.")
    }

    fn view_summary(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Expense Summary ===")?;

        match calculate_summary(None, self.connection) {
            Ok(summary) => writeln!(self.output, "{}", format_summary(&summary)),
            Err(error) => self.print_error(&error),
        }
    }

    fn manage_users(&mut self) -> io::Result<()> {
        let options = ["View All Users", "Add New User"];

        loop {
            self.print_menu("User Management", &options, "Back to Main Menu")?;

            match self.menu_choice(options.len())? {
                1 => match get_all_users(self.connection) {
                    Ok(users) if users.is_empty() => writeln!(self.output, "No users found.")?,
                    Ok(users) => {
                        writeln!(self.output, "\nAll Users ({}):", users.len())?;
                        for user in users {
                            writeln!(self.output, "ID: {}, Name: {}", user.id, user.name)?;
                        }
                    }
                    Err(error) => self.print_error(&error)?,
                },
                2 => {
                    let name = self.prompt("Enter new user name: ")?;
                    let created =
                        UserName::new(&name).and_then(|name| create_user(name, self.connection));

                    match created {
                        Ok(user) => writeln!(
                            self.output,
                            "User '{}' created successfully with ID: {}",
                            user.name, user.id
                        )?,
                        Err(error) => self.print_error(&error)?,
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn manage_categories(&mut self) -> io::Result<()> {
        let options = ["View All Categories", "Add New Category"];

        loop {
            self.print_menu("Category Management", &options, "Back to Main Menu")?;

            match self.menu_choice(options.len())? {
                1 => match get_all_categories(self.connection) {
                    Ok(categories) if categories.is_empty() => {
                        writeln!(self.output, "No categories found.")?
                    }
                    Ok(categories) => {
                        writeln!(self.output, "\nAll Categories ({}):", categories.len())?;
                        for category in categories {
                            writeln!(self.output, "ID: {}, Name: {}", category.id, category.name)?;
                        }
                    }
                    Err(error) => self.print_error(&error)?,
                },
                2 => {
                    let name = self.prompt("Enter new category name: ")?;
                    let created = CategoryName::new(&name)
                        .and_then(|name| create_category(name, self.connection));

                    match created {
                        Ok(category) => writeln!(
                            self.output,
                            "Category '{}' created successfully with ID: {}",
                            category.name, category.id
                        )?,
                        Err(error) => self.print_error(&error)?,
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // ========================================================================
    // INPUT AND OUTPUT
    // ========================================================================

    /// Print `prompt` and read one trimmed line.
    ///
    /// Returns an [io::ErrorKind::UnexpectedEof] error when the input has
    /// ended.
    fn prompt(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        // Bytes that are not UTF-8 become U+FFFD instead of ending the session.
        Ok(String::from_utf8_lossy(&line).trim().to_owned())
    }

    /// Read menu choices until one between 0 and `max` is entered.
    fn menu_choice(&mut self, max: usize) -> io::Result<usize> {
        loop {
            let choice = self.prompt(&format!("\nEnter your choice (0-{max}): "))?;

            match choice.parse::<usize>() {
                Ok(choice) if choice <= max => return Ok(choice),
                _ => writeln!(self.output, "Please enter a number between 0 and {max}")?,
            }
        }
    }

    fn print_menu(&mut self, title: &str, options: &[&str], zero_option: &str) -> io::Result<()> {
        writeln!(self.output, "\n=== {title} ===")?;
        self.print_numbered(options.iter().copied())?;
        writeln!(self.output, "0. {zero_option}")
    }

    fn print_numbered<'b>(&mut self, items: impl Iterator<Item = &'b str>) -> io::Result<()> {
        for (i, item) in items.enumerate() {
            writeln!(self.output, "{}. {item}", i + 1)?;
        }

        Ok(())
    }

    fn print_expenses(
        &mut self,
        expenses: Result<Vec<Expense>, Error>,
        empty_message: &str,
    ) -> io::Result<()> {
        match expenses {
            Ok(expenses) if expenses.is_empty() => writeln!(self.output, "{empty_message}"),
            Ok(expenses) => {
                writeln!(self.output, "\nFound {} expense(s):", expenses.len())?;
                writeln!(self.output, "{}", format_expense_table(&expenses))
            }
            Err(error) => self.print_error(&error),
        }
    }

    fn print_error(&mut self, error: &Error) -> io::Result<()> {
        writeln!(self.output, "Error: {error}")
    }
}

/// The category shown as `number` in a one-based list.
fn number_to_category(number: usize, categories: &[Category]) -> Option<&Category> {
    number.checked_sub(1).and_then(|index| categories.get(index))
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Parse an optional bound of an amount range. Zero is allowed.
fn parse_bound(value: &str) -> Result<Option<f64>, ValidationError> {
    non_empty(value)
        .map(|value| {
            value
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidAmount(value.to_owned()))
        })
        .transpose()
}

fn today() -> String {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .to_string()
}
