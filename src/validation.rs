//! Validation of user input: dates, amounts and required text fields.
//!
//! All checks here run before anything touches the database, so a
//! [ValidationError] always means nothing was written.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The format used for expense dates, e.g. `2025-10-25`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Input that was rejected before any write was attempted.
///
/// Each variant names the field that failed, see [ValidationError::field].
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// A required text field was empty or only whitespace.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// The date string did not have the shape `YYYY-MM-DD`.
    #[error("Date must be in YYYY-MM-DD format, got \"{0}\"")]
    InvalidDateFormat(String),

    /// The date string had the right shape but is not a calendar date, e.g.
    /// `2025-02-30`.
    #[error("Invalid date: \"{0}\" is not a real calendar date")]
    InvalidDate(String),

    /// The amount string could not be parsed as a number.
    #[error("Amount must be a valid number, got \"{0}\"")]
    InvalidAmount(String),

    /// The amount was zero, negative or not finite.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    /// The start of a date range was after its end.
    #[error("Start date {0} cannot be after end date {1}")]
    InvalidDateRange(Date, Date),

    /// One of the bounds of an amount range was negative.
    #[error("{0} amount cannot be negative")]
    NegativeAmountBound(&'static str),

    /// One of the bounds of an amount range was NaN or infinite.
    #[error("{0} amount must be a finite number")]
    NonFiniteAmountBound(&'static str),

    /// The minimum of an amount range was greater than its maximum.
    #[error("Minimum amount {0} cannot be greater than maximum amount {1}")]
    InvalidAmountRange(f64, f64),

    /// A user ID that cannot exist in the database, i.e. zero or negative.
    #[error("User ID must be positive, got {0}")]
    InvalidUserId(i64),
}

impl ValidationError {
    /// The name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyField(field) => field,
            ValidationError::InvalidDateFormat(_) | ValidationError::InvalidDate(_) => "Date",
            ValidationError::InvalidAmount(_) | ValidationError::NonPositiveAmount(_) => "Amount",
            ValidationError::InvalidDateRange(_, _) => "Date range",
            ValidationError::NegativeAmountBound(_)
            | ValidationError::NonFiniteAmountBound(_)
            | ValidationError::InvalidAmountRange(_, _) => "Amount range",
            ValidationError::InvalidUserId(_) => "User ID",
        }
    }
}

/// Parse and validate a `YYYY-MM-DD` date string.
///
/// Surrounding whitespace is ignored. The string must be exactly four digits,
/// a dash, two digits, a dash and two digits, and it must name a real day
/// (so `2024-02-29` is accepted and `2025-02-30` is not).
///
/// # Errors
///
/// Returns a [ValidationError::EmptyField], [ValidationError::InvalidDateFormat]
/// or [ValidationError::InvalidDate].
pub fn validate_date(date: &str) -> Result<Date, ValidationError> {
    let date = date.trim();

    if date.is_empty() {
        return Err(ValidationError::EmptyField("Date"));
    }

    if !has_date_shape(date) {
        return Err(ValidationError::InvalidDateFormat(date.to_owned()));
    }

    Date::parse(date, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(date.to_owned()))
}

fn has_date_shape(date: &str) -> bool {
    let bytes = date.as_bytes();

    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, byte)| match i {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Check that an expense amount is a finite number greater than zero.
///
/// # Errors
///
/// Returns a [ValidationError::NonPositiveAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

/// Parse an amount typed by the user, e.g. `" 12.50 "`, and validate it.
///
/// # Errors
///
/// Returns a [ValidationError::EmptyField] for blank input, a
/// [ValidationError::InvalidAmount] if the text is not a number, or a
/// [ValidationError::NonPositiveAmount] if the number is not positive.
pub fn parse_amount(amount: &str) -> Result<f64, ValidationError> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(ValidationError::EmptyField("Amount"));
    }

    let parsed = amount
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidAmount(amount.to_owned()))?;

    validate_amount(parsed)
}

/// Check that a required text field is not blank and return it trimmed.
///
/// `field` is used in the error message, e.g. `"Title"`.
///
/// # Errors
///
/// Returns a [ValidationError::EmptyField] if `value` is empty after
/// trimming.
pub fn validate_non_empty(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Check that an optional date range is ordered, i.e. `start <= end` when
/// both are given.
///
/// # Errors
///
/// Returns a [ValidationError::InvalidDateRange] if `start` is after `end`.
pub fn validate_date_range(start: Option<Date>, end: Option<Date>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            Err(ValidationError::InvalidDateRange(start, end))
        }
        _ => Ok(()),
    }
}

/// Check that the bounds of an optional amount range are finite,
/// non-negative and ordered.
///
/// # Errors
///
/// Returns a [ValidationError::NonFiniteAmountBound],
/// [ValidationError::NegativeAmountBound] or
/// [ValidationError::InvalidAmountRange].
pub fn validate_amount_range(min: Option<f64>, max: Option<f64>) -> Result<(), ValidationError> {
    // NaN would be bound as NULL and silently match nothing.
    if min.is_some_and(|min| !min.is_finite()) {
        return Err(ValidationError::NonFiniteAmountBound("Minimum"));
    }

    if max.is_some_and(|max| !max.is_finite()) {
        return Err(ValidationError::NonFiniteAmountBound("Maximum"));
    }

    if min.is_some_and(|min| min < 0.0) {
        return Err(ValidationError::NegativeAmountBound("Minimum"));
    }

    if max.is_some_and(|max| max < 0.0) {
        return Err(ValidationError::NegativeAmountBound("Maximum"));
    }

    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::InvalidAmountRange(min, max)),
        _ => Ok(()),
    }
}
