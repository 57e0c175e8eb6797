use std::{io, path::PathBuf, process::exit};

use clap::Parser;

use expense_tracker::{Database, console::Console, logging::setup_logging};

/// An interactive console for recording and reviewing personal expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long, default_value = "expenses.db")]
    db_path: PathBuf,

    /// File path to append debug logs to.
    #[arg(long, default_value = "expense_tracker.log")]
    log_path: PathBuf,
}

fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        print_error(format!(
            "Could not open the log file at {:#?}: {error}",
            args.log_path
        ));
        exit(1);
    }

    println!("Initializing database...");

    let mut database = match Database::open(&args.db_path) {
        Ok(database) => database,
        Err(error) => {
            print_error(format!("Failed to open database: {error}"));
            exit(1);
        }
    };

    if let Err(error) = database.initialize() {
        print_error(format!("Failed to initialize database: {error}"));
        // `exit` skips destructors.
        drop(database);
        exit(1);
    }

    println!("Database initialized successfully!");

    let result = database.connection().map_err(io::Error::other).and_then(|connection| {
        Console::new(connection, io::stdin().lock(), io::stdout()).run()
    });

    if let Err(error) = result {
        tracing::error!("The console session ended with an error: {error}");
        print_error(format!("Unexpected error: {error}"));
    }

    if let Err(error) = database.close() {
        tracing::error!("Could not close the database: {error}");
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string());
}
