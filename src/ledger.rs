//! The per-user income and expense ledgers.
//!
//! Income and expense entries live in separate tables with separate id
//! spaces, and every operation here is scoped to the owning user: listing,
//! inserting and deleting all filter on the username, so one user can never
//! observe or remove another user's entries. The running total is recomputed
//! from the stored rows on every call rather than maintained incrementally,
//! which keeps it honest after concurrent inserts and deletes.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Amount, Error, validation::validate_entry};

/// A newtype wrapper for integer entry IDs.
///
/// Income and expense entries are numbered independently, so an `EntryId`
/// only identifies a row together with the ledger it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(i64);

impl EntryId {
    /// Create a new entry ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the entry ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single named income or expense record owned by one user.
///
/// Whether it counts toward or against the total depends on which ledger it
/// was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The entry's ID within its ledger.
    pub id: EntryId,
    /// The username of the owning user.
    pub username: String,
    /// What the money was for, e.g. "Rent" or "Salary".
    pub name: String,
    /// The two-decimal amount of money.
    pub amount: Amount,
}

/// Selects which of the two entry tables an operation runs against.
#[derive(Clone, Copy, Debug)]
enum Ledger {
    Income,
    Expense,
}

impl Ledger {
    fn table(self) -> &'static str {
        match self {
            Ledger::Income => "income_entry",
            Ledger::Expense => "expense_entry",
        }
    }
}

/// Create the income entry table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_entry_table(Ledger::Income, connection)
}

/// Create the expense entry table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_entry_table(Ledger::Expense, connection)
}

fn create_entry_table(ledger: Ledger, connection: &Connection) -> Result<(), rusqlite::Error> {
    // `ledger.table()` is one of two compile-time constants, not user input.
    connection.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL
                )",
            ledger.table()
        ),
        (),
    )?;

    Ok(())
}

fn map_entry_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    Ok(Entry {
        id: EntryId::new(row.get(0)?),
        username: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
    })
}

/// List a user's income entries in insertion order.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the query failed.
pub fn income_entries(username: &str, connection: &Connection) -> Result<Vec<Entry>, Error> {
    entries(Ledger::Income, username, connection)
}

/// List a user's expense entries in insertion order.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the query failed.
pub fn expense_entries(username: &str, connection: &Connection) -> Result<Vec<Entry>, Error> {
    entries(Ledger::Expense, username, connection)
}

fn entries(ledger: Ledger, username: &str, connection: &Connection) -> Result<Vec<Entry>, Error> {
    let entries = connection
        .prepare(&format!(
            "SELECT id, username, name, amount FROM {}
             WHERE username = :username
             ORDER BY id ASC",
            ledger.table()
        ))?
        .query_map(&[(":username", username)], |row| map_entry_row(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

/// Insert a new income entry for `username` and return it with its fresh ID.
///
/// The `name` and `amount` are expected to have come through
/// [crate::validation]; use [add_income] to validate and insert in one step.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the insert failed.
pub fn create_income(
    username: &str,
    name: &str,
    amount: Amount,
    connection: &Connection,
) -> Result<Entry, Error> {
    create_entry(Ledger::Income, username, name, amount, connection)
}

/// Insert a new expense entry for `username` and return it with its fresh ID.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the insert failed.
pub fn create_expense(
    username: &str,
    name: &str,
    amount: Amount,
    connection: &Connection,
) -> Result<Entry, Error> {
    create_entry(Ledger::Expense, username, name, amount, connection)
}

fn create_entry(
    ledger: Ledger,
    username: &str,
    name: &str,
    amount: Amount,
    connection: &Connection,
) -> Result<Entry, Error> {
    let entry = connection
        .prepare(&format!(
            "INSERT INTO {} (username, name, amount)
             VALUES (?1, ?2, ?3)
             RETURNING id, username, name, amount",
            ledger.table()
        ))?
        .query_row((username, name, amount), |row| map_entry_row(row))?;

    Ok(entry)
}

/// Validate a raw submission and insert it as an income entry.
///
/// # Errors
///
/// Returns [Error::InvalidEntry] carrying every validation failure if the
/// submission is bad (nothing is persisted), or [Error::SqlError] if the
/// insert failed.
pub fn add_income(
    username: &str,
    raw_name: &str,
    raw_amount: &str,
    connection: &Connection,
) -> Result<Entry, Error> {
    let (name, amount) = validate_entry(raw_name, raw_amount)?;

    create_income(username, &name, amount, connection)
}

/// Validate a raw submission and insert it as an expense entry.
///
/// # Errors
///
/// Returns [Error::InvalidEntry] carrying every validation failure if the
/// submission is bad (nothing is persisted), or [Error::SqlError] if the
/// insert failed.
pub fn add_expense(
    username: &str,
    raw_name: &str,
    raw_amount: &str,
    connection: &Connection,
) -> Result<Entry, Error> {
    let (name, amount) = validate_entry(raw_name, raw_amount)?;

    create_expense(username, &name, amount, connection)
}

/// Delete the income entry with the given `id`, if it belongs to `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no such entry exists for that user (including
/// when the entry exists but belongs to someone else), or [Error::SqlError]
/// if the delete failed.
pub fn delete_income(username: &str, id: EntryId, connection: &Connection) -> Result<(), Error> {
    delete_entry(Ledger::Income, username, id, connection)
}

/// Delete the expense entry with the given `id`, if it belongs to `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no such entry exists for that user (including
/// when the entry exists but belongs to someone else), or [Error::SqlError]
/// if the delete failed.
pub fn delete_expense(username: &str, id: EntryId, connection: &Connection) -> Result<(), Error> {
    delete_entry(Ledger::Expense, username, id, connection)
}

fn delete_entry(
    ledger: Ledger,
    username: &str,
    id: EntryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_deleted = connection.execute(
        &format!(
            "DELETE FROM {} WHERE id = ?1 AND username = ?2",
            ledger.table()
        ),
        (id.as_i64(), username),
    )?;

    if rows_deleted == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Compute a user's running total: income minus expenses.
///
/// The total is recomputed from the stored entries on every call, so it
/// always reflects the latest committed state. Calling it twice without
/// intervening writes returns the same value.
///
/// # Errors
///
/// Returns an [Error::SqlError] if either ledger could not be read.
pub fn total(username: &str, connection: &Connection) -> Result<Amount, Error> {
    let income: i64 = income_entries(username, connection)?
        .iter()
        .map(|entry| entry.amount.as_cents())
        .sum();
    let expenses: i64 = expense_entries(username, connection)?
        .iter()
        .map(|entry| entry.amount.as_cents())
        .sum();

    Ok(Amount::from_cents(income - expenses))
}

#[cfg(test)]
mod ledger_tests {
    use rusqlite::Connection;

    use crate::{
        Amount, Error,
        ledger::{
            EntryId, create_expense, create_income, delete_expense, delete_income,
            expense_entries, income_entries, total,
        },
    };

    fn get_db_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        crate::db::initialize(&connection).expect("Could not initialize database");

        connection
    }

    fn amount(text: &str) -> Amount {
        text.parse().expect("Could not parse test amount")
    }

    #[test]
    fn create_income_assigns_fresh_ids_and_returns_the_entry() {
        let connection = get_db_connection();

        let first = create_income("alice", "Salary", amount("1250.00"), &connection).unwrap();
        let second = create_income("alice", "Tips", amount("20.00"), &connection).unwrap();

        assert_eq!(first.username, "alice");
        assert_eq!(first.name, "Salary");
        assert_eq!(first.amount, amount("1250.00"));
        assert!(second.id.as_i64() > first.id.as_i64());
    }

    #[test]
    fn entries_are_listed_in_insertion_order() {
        let connection = get_db_connection();
        let first = create_expense("alice", "Rent", amount("800.00"), &connection).unwrap();
        let second = create_expense("alice", "Power", amount("120.00"), &connection).unwrap();

        let entries = expense_entries("alice", &connection).unwrap();

        assert_eq!(entries, vec![first, second]);
    }

    #[test]
    fn users_never_see_each_others_entries() {
        let connection = get_db_connection();
        let alices = create_income("alice", "Salary", amount("100.00"), &connection).unwrap();
        let bobs = create_income("bob", "Salary", amount("200.00"), &connection).unwrap();

        assert_eq!(income_entries("alice", &connection).unwrap(), vec![alices]);
        assert_eq!(income_entries("bob", &connection).unwrap(), vec![bobs]);
    }

    #[test]
    fn delete_income_removes_the_entry() {
        let connection = get_db_connection();
        let entry = create_income("alice", "Tips", amount("20.00"), &connection).unwrap();

        delete_income("alice", entry.id, &connection).unwrap();

        assert_eq!(income_entries("alice", &connection).unwrap(), vec![]);
    }

    #[test]
    fn delete_missing_entry_fails_and_leaves_ledgers_unchanged() {
        let connection = get_db_connection();
        let entry = create_income("alice", "Tips", amount("20.00"), &connection).unwrap();

        let result = delete_income("alice", EntryId::new(999), &connection);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(income_entries("alice", &connection).unwrap(), vec![entry]);
    }

    #[test]
    fn delete_is_scoped_to_the_owner() {
        let connection = get_db_connection();
        let entry = create_income("alice", "Salary", amount("100.00"), &connection).unwrap();

        let result = delete_income("bob", entry.id, &connection);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(income_entries("alice", &connection).unwrap(), vec![entry]);
    }

    #[test]
    fn expense_delete_is_scoped_to_the_owner() {
        let connection = get_db_connection();
        let entry = create_expense("alice", "Rent", amount("800.00"), &connection).unwrap();

        let result = delete_expense("bob", entry.id, &connection);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(expense_entries("alice", &connection).unwrap(), vec![entry]);
    }

    #[test]
    fn income_and_expense_ids_are_independent() {
        let connection = get_db_connection();
        let income = create_income("alice", "Salary", amount("100.00"), &connection).unwrap();
        let expense = create_expense("alice", "Rent", amount("80.00"), &connection).unwrap();
        assert_eq!(income.id, expense.id, "Want matching fresh ids in both tables");

        delete_income("alice", income.id, &connection).unwrap();

        assert_eq!(
            expense_entries("alice", &connection).unwrap(),
            vec![expense],
            "Deleting an income entry must not touch the expense ledger"
        );
    }

    #[test]
    fn total_is_income_minus_expenses() {
        let connection = get_db_connection();
        create_income("alice", "Salary", amount("50.00"), &connection).unwrap();
        create_income("alice", "Tips", amount("20.00"), &connection).unwrap();
        create_expense("alice", "Power", amount("30.00"), &connection).unwrap();

        let result = total("alice", &connection).unwrap();

        assert_eq!(result, amount("40.00"));
    }

    #[test]
    fn total_is_stable_without_intervening_writes() {
        let connection = get_db_connection();
        create_income("alice", "Salary", amount("12.34"), &connection).unwrap();

        let first = total("alice", &connection).unwrap();
        let second = total("alice", &connection).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn total_for_user_with_no_entries_is_zero() {
        let connection = get_db_connection();

        assert_eq!(total("alice", &connection).unwrap(), Amount::ZERO);
    }

    #[test]
    fn total_can_go_negative() {
        let connection = get_db_connection();
        create_expense("alice", "Rent", amount("800.00"), &connection).unwrap();

        let result = total("alice", &connection).unwrap();

        assert_eq!(result.to_string(), "-800.00");
    }
}
