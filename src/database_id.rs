//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a row in the `Users` table.
pub type UserId = DatabaseId;
/// The ID of a row in the `Categories` table.
pub type CategoryId = DatabaseId;
/// The ID of a row in the `Expenses` table.
pub type ExpenseId = DatabaseId;
