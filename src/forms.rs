//! Field validation for the registration, log-in, and expense entry forms.
//!
//! Each form declares an ordered list of pure predicate+message pairs per
//! field. Rules are evaluated in order and the first failing rule produces
//! that field's [FieldError]; validation never raises, it returns the full
//! list of violations so handlers can re-render the form with messages next
//! to each offending field.

use std::str::FromStr;

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    email::Email,
    expense::{Category, NewExpense},
};

/// The date format used by `<input type="date">` fields, e.g. "2025-10-05".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A violation of a single field's validation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The form field the rule belongs to.
    pub field: &'static str,
    /// The message to display next to the field.
    pub message: &'static str,
}

/// Evaluate `rules` in order against `value` and return the first violation.
fn first_violation<T: ?Sized>(
    field: &'static str,
    value: &T,
    rules: &[(&dyn Fn(&T) -> bool, &'static str)],
) -> Option<FieldError> {
    rules
        .iter()
        .find(|(predicate, _)| !predicate(value))
        .map(|(_, message)| FieldError { field, message })
}

/// Look up the message for `field` in a list of violations.
pub fn error_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|error| error.field == field)
        .map(|error| error.message)
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterFormData {
    /// The name to display on the dashboard.
    pub username: String,
    /// The email address to log in with.
    pub email: String,
    /// The password to log in with.
    pub password: String,
    /// A repeat of the password to catch typos.
    pub confirm_password: String,
}

/// A registration submission that has passed every field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    /// The name to display on the dashboard.
    pub username: String,
    /// The validated email address.
    pub email: Email,
    /// The raw password, ready for hashing.
    pub password: String,
}

/// The minimum number of characters in a username.
pub const USERNAME_MIN_LENGTH: usize = 3;
/// The maximum number of characters in a username.
pub const USERNAME_MAX_LENGTH: usize = 150;
/// The minimum number of characters in a password.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Check a registration submission against the registration rules.
///
/// # Errors
///
/// Returns one [FieldError] per offending field; evaluation is pure and
/// nothing is persisted.
pub fn validate_registration(
    form: &RegisterFormData,
) -> Result<ValidRegistration, Vec<FieldError>> {
    let mut errors = Vec::new();

    errors.extend(first_violation(
        "username",
        form.username.as_str(),
        &[
            (&|username: &str| !username.is_empty(), "Username is required"),
            (
                &|username: &str| {
                    (USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH)
                        .contains(&username.chars().count())
                },
                "Username must be between 3 and 150 characters",
            ),
        ],
    ));

    errors.extend(first_violation(
        "email",
        form.email.as_str(),
        &[
            (&|email: &str| !email.is_empty(), "Email is required"),
            (
                &|email: &str| Email::new(email).is_ok(),
                "Enter a valid email address",
            ),
        ],
    ));

    errors.extend(first_violation(
        "password",
        form.password.as_str(),
        &[
            (&|password: &str| !password.is_empty(), "Password is required"),
            (
                &|password: &str| password.chars().count() >= PASSWORD_MIN_LENGTH,
                "Password must be at least 6 characters",
            ),
        ],
    ));

    errors.extend(first_violation(
        "confirm_password",
        form,
        &[
            (
                &|form: &RegisterFormData| !form.confirm_password.is_empty(),
                "Please confirm your password",
            ),
            (
                &|form: &RegisterFormData| form.confirm_password == form.password,
                "Passwords do not match",
            ),
        ],
    ));

    if !errors.is_empty() {
        return Err(errors);
    }

    let email = Email::new(&form.email).map_err(|_| {
        vec![FieldError {
            field: "email",
            message: "Enter a valid email address",
        }]
    })?;

    Ok(ValidRegistration {
        username: form.username.clone(),
        email,
        password: form.password.clone(),
    })
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Default, Deserialize)]
pub struct LogInFormData {
    /// The email address entered during log-in.
    pub email: String,
    /// The password entered during log-in.
    ///
    /// No length rule applies here since the password is only compared
    /// against the stored hash.
    pub password: String,
    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

/// Check a log-in submission against the log-in rules.
///
/// # Errors
///
/// Returns one [FieldError] per offending field.
pub fn validate_log_in(form: &LogInFormData) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    errors.extend(first_violation(
        "email",
        form.email.as_str(),
        &[
            (&|email: &str| !email.is_empty(), "Email is required"),
            (
                &|email: &str| Email::new(email).is_ok(),
                "Enter a valid email address",
            ),
        ],
    ));

    errors.extend(first_violation(
        "password",
        form.password.as_str(),
        &[(
            &|password: &str| !password.is_empty(),
            "Password is required",
        )],
    ));

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// The raw data entered by the user in the expense form.
#[derive(Clone, Default, Deserialize)]
pub struct ExpenseFormData {
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent, as typed.
    pub amount: String,
    /// The selected category.
    pub category: String,
    /// The expense date, as submitted by the date input.
    pub date: String,
    /// Optional free text with extra detail.
    #[serde(default)]
    pub notes: String,
}

/// Check an expense submission against the expense entry rules.
///
/// # Errors
///
/// Returns one [FieldError] per offending field; nothing is persisted on
/// failure.
pub fn validate_expense(form: &ExpenseFormData) -> Result<NewExpense, Vec<FieldError>> {
    let mut errors = Vec::new();

    errors.extend(first_violation(
        "title",
        form.title.as_str(),
        &[(
            &|title: &str| !title.trim().is_empty(),
            "Title is required",
        )],
    ));

    errors.extend(first_violation(
        "amount",
        form.amount.as_str(),
        &[
            (&|amount: &str| !amount.trim().is_empty(), "Amount is required"),
            (
                &|amount: &str| {
                    amount
                        .trim()
                        .parse::<f64>()
                        .is_ok_and(|amount| amount.is_finite())
                },
                "Amount must be a number",
            ),
        ],
    ));

    errors.extend(first_violation(
        "category",
        form.category.as_str(),
        &[
            (
                &|category: &str| !category.is_empty(),
                "Category is required",
            ),
            (
                &|category: &str| Category::from_str(category).is_ok(),
                "Choose a category from the list",
            ),
        ],
    ));

    errors.extend(first_violation(
        "date",
        form.date.as_str(),
        &[
            (&|date: &str| !date.is_empty(), "Date is required"),
            (
                &|date: &str| Date::parse(date, DATE_FORMAT).is_ok(),
                "Enter a valid date",
            ),
        ],
    ));

    if !errors.is_empty() {
        return Err(errors);
    }

    // The rules above guarantee these parses succeed; the map_errs keep the
    // failure path structured instead of panicking.
    let amount = form.amount.trim().parse::<f64>().map_err(|_| {
        vec![FieldError {
            field: "amount",
            message: "Amount must be a number",
        }]
    })?;
    let category = Category::from_str(&form.category).map_err(|_| {
        vec![FieldError {
            field: "category",
            message: "Choose a category from the list",
        }]
    })?;
    let date = Date::parse(&form.date, DATE_FORMAT).map_err(|_| {
        vec![FieldError {
            field: "date",
            message: "Enter a valid date",
        }]
    })?;

    Ok(NewExpense {
        title: form.title.trim().to_owned(),
        amount,
        category,
        date,
        notes: form.notes.clone(),
    })
}
