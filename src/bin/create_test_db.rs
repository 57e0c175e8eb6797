use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;

use expense_tracker::{Database, operations::record_expense};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Date, category, title, amount, user.
const SAMPLE_EXPENSES: [(&str, &str, &str, f64, &str); 8] = [
    ("2025-10-01", "Utilities", "Electricity bill", 120.45, "Alice"),
    ("2025-10-03", "Food", "Weekly groceries", 86.20, "Alice"),
    ("2025-10-04", "Transportation", "Bus pass", 45.00, "Bob"),
    ("2025-10-10", "Entertainment", "Cinema tickets", 32.00, "Bob"),
    ("2025-10-12", "Food", "Dinner out", 58.75, "Bob"),
    ("2025-10-18", "Healthcare", "Pharmacy", 14.99, "Alice"),
    ("2025-10-22", "Shopping", "Running shoes", 129.00, "Alice"),
    ("2025-10-25", "Books", "Rust programming book", 49.95, "Bob"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut database = Database::open(output_path)?;
    database.initialize()?;

    println!("Creating test expenses...");

    let connection = database.connection()?;
    for (date, category, title, amount, user) in SAMPLE_EXPENSES {
        record_expense(date, category, title, amount, user, connection)?;
    }

    database.close()?;

    println!("Success!");

    Ok(())
}
