//! Defines the core data models and database queries for expenses.

use std::fmt::Display;
use std::str::FromStr;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, user::UserID};

/// The fixed set of categories an expense can be filed under.
///
/// The expense form constrains input to this set. Storage and aggregation
/// treat the category as a literal string, so rows written by other means
/// are still listed and charted under whatever string they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, restaurants, takeaways.
    Food,
    /// Transport, flights, accommodation.
    Travel,
    /// General retail purchases.
    Shopping,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// Every category, in the order the expense form lists them.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    /// The category name as it is stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

/// A single expense record owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense in the application database.
    pub id: i64,
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: String,
    /// When the expense happened.
    pub date: Date,
    /// Optional free text with extra detail.
    pub notes: String,
    /// The ID of the user that owns this expense.
    pub user_id: UserID,
}

/// A validated expense that has not been persisted yet.
///
/// Produced by the expense form validation; see [crate::forms].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: Category,
    /// When the expense happened.
    pub date: Date,
    /// Optional free text with extra detail.
    pub notes: String,
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Index used by every dashboard render.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user ON expense(user_id);",
        (),
    )?;

    Ok(())
}

/// Create a new expense in the database, owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error,
/// including when `user_id` does not refer to a registered user.
pub fn create_expense(
    new_expense: NewExpense,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (title, amount, category, date, notes, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, title, amount, category, date, notes, user_id",
        )?
        .query_row(
            (
                new_expense.title,
                new_expense.amount,
                new_expense.category.as_str(),
                new_expense.date,
                new_expense.notes,
                user_id.as_i64(),
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve all expenses owned by `user_id`, in insertion order.
///
/// Ownership is enforced here: every expense query filters on the
/// authenticated user's ID.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, category, date, notes, user_id FROM expense \
             WHERE user_id = :user_id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Map a database row to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;
    let notes = row.get(5)?;
    let raw_user_id = row.get(6)?;

    Ok(Expense {
        id,
        title,
        amount,
        category,
        date,
        notes,
        user_id: UserID::new(raw_user_id),
    })
}
