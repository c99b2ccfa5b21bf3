//! Ledgerly is the validated ledger core of a small personal budget tracker.
//!
//! Users record named income and expense entries with two-decimal amounts,
//! view a running total, and delete entries. Every ledger operation is scoped
//! to the owning user, entries are validated before they reach storage, and
//! sign-in credentials are checked against bcrypt hashes.
//!
//! This library owns validation, persistence, aggregation and
//! authentication. Presentation concerns (routing, views, sessions) live in
//! whatever layer consumes it.

#![warn(missing_docs)]

mod amount;
mod auth;
mod db;
mod ledger;
mod password;
mod user;
pub mod validation;

pub use amount::{Amount, ParseAmountError};
pub use auth::{authenticate, verify_credentials};
pub use db::initialize as initialize_db;
pub use ledger::{
    Entry, EntryId, add_expense, add_income, create_expense, create_income, delete_expense,
    delete_income, expense_entries, income_entries, total,
};
pub use password::{PasswordHash, ValidatedPassword};
pub use user::{User, count_users, create_user, get_user};

use validation::ValidationError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A submitted entry failed one or more validation checks.
    ///
    /// Carries every failure from the submission, not just the first, so a
    /// caller can report all problems at once.
    #[error("the submitted entry failed validation")]
    InvalidEntry(Vec<ValidationError>),

    /// The username and password did not match a registered account.
    ///
    /// Deliberately does not say which of the two was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows, e.g.
    /// deleting an entry that another request already removed.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The username chosen for a new account is already taken.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// not shown to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The database could not be reached or an unexpected SQL error occurred.
    ///
    /// Callers should assume the operation made no partial writes.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::InvalidEntry(errors)
    }
}
