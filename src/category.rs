//! Database operations for expense categories.
//!
//! New databases are seeded with [DEFAULT_CATEGORIES](crate::DEFAULT_CATEGORIES),
//! and further categories are created on demand when an expense names one
//! that does not exist yet.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use crate::{Error, database_id::CategoryId, db::DEFAULT_CATEGORIES, is_unique_violation};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label for grouping expenses (e.g., 'Food', 'Utilities').
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique name of the category.
    pub name: CategoryName,
}

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns an [Error::DuplicateCategoryName] if the name is taken.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO Categories (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| {
            if is_unique_violation(&error) {
                Error::DuplicateCategoryName(name.to_string())
            } else {
                error.into()
            }
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a category by its exact name, or `None` if there is no match.
pub fn get_category_by_name(name: &str, connection: &Connection) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM Categories WHERE name = :name;")?
        .query_row(&[(":name", name.trim())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM Categories ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Get the number of categories in the database.
pub fn count_categories(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM Categories;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS Categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert each of the default categories unless it already exists.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare("INSERT OR IGNORE INTO Categories (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute([name])?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}


#[cfg(test)]
mod category_query_tests {
    use crate::{
        Error,
        category::{
            CategoryName, count_categories, create_category, get_all_categories,
            get_category_by_name,
        },
        db::DEFAULT_CATEGORIES,
        test_utils::get_test_connection,
    };

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let name = CategoryName::new("Travel").unwrap();

        let category = create_category(name.clone(), &connection).expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(count_categories(&connection), Ok(DEFAULT_CATEGORIES.len() + 1));
    }

    #[test]
    fn create_category_fails_on_seeded_name() {
        let connection = get_test_connection();

        let result = create_category(CategoryName::new_unchecked("Food"), &connection);

        assert_eq!(result, Err(Error::DuplicateCategoryName("Food".to_owned())));
    }

    #[test]
    fn get_category_by_name_finds_seeded_category() {
        let connection = get_test_connection();

        let got = get_category_by_name("Utilities", &connection)
            .unwrap()
            .expect("Utilities should be seeded");

        assert_eq!(got.name.as_ref(), "Utilities");
    }

    #[test]
    fn get_category_by_name_is_case_sensitive() {
        let connection = get_test_connection();

        assert_eq!(get_category_by_name("food", &connection), Ok(None));
    }

    #[test]
    fn get_all_categories_orders_by_name() {
        let connection = get_test_connection();
        create_category(CategoryName::new_unchecked("Books"), &connection).unwrap();

        let got: Vec<String> = get_all_categories(&connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(
            got,
            [
                "Books",
                "Entertainment",
                "Food",
                "Healthcare",
                "Other",
                "Shopping",
                "Transportation",
                "Utilities",
            ]
        );
    }
}
