//! Database schema setup.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, ledger, user};

/// Create the application tables if they do not already exist.
///
/// All tables are created within a single exclusive SQL transaction so a
/// crash mid-setup cannot leave a partial schema behind. Safe to call on an
/// already-initialized database.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the table creation queries failed.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    user::create_user_table(&transaction)?;
    ledger::create_income_table(&transaction)?;
    ledger::create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let table_count: i64 = connection
            .query_row(
                "SELECT COUNT(name) FROM sqlite_schema
                 WHERE type = 'table' AND name IN ('users', 'income_entry', 'expense_entry')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 3);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Second initialization should succeed");
    }
}
