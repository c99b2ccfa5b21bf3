//! Storage for user accounts.
//!
//! Accounts are provisioned out-of-band with the `add_user` tool; the rest
//! of the crate only ever reads them to verify credentials and to scope
//! ledger queries.

use rusqlite::Connection;

use crate::{Error, PasswordHash};

/// A registered account holder.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The unique name the user signs in with.
    pub username: String,
    /// The bcrypt hash of the user's password.
    pub password_hash: PasswordHash,
}

/// Create the users table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if `username` is already taken, or
/// [Error::SqlError] if some other SQL error occurred.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            (username, password_hash.as_ref()),
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed and code 1555
            // when the failed constraint is the primary key.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if matches!(sql_error.extended_code, 1555 | 2067)
                    && desc.contains("users.username") =>
            {
                Error::DuplicateUsername(username.to_owned())
            }
            error => error.into(),
        })?;

    Ok(User {
        username: username.to_owned(),
        password_hash,
    })
}

/// Get the user with the given `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - no user with that name is registered,
/// - or there was an error trying to access the store.
pub fn get_user(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT username, password FROM users WHERE username = :username")?
        .query_row(&[(":username", username)], |row| {
            let username: String = row.get(0)?;
            let raw_password_hash: String = row.get(1)?;

            Ok(User {
                username,
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            })
        })
        .map_err(|error| error.into())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(username) FROM users", [], |row| {
            Ok(row.get::<_, i64>(0)? as usize)
        })
        .map_err(|error| error.into())
}
