//! Credential verification against stored password hashes.
//!
//! The presented password is always run through bcrypt, never compared as
//! plaintext, and an unknown username is indistinguishable from a wrong
//! password in the result.

use rusqlite::Connection;

use crate::{Error, password::PasswordHash, user::get_user};

/// A well-formed bcrypt hash that no account uses. When a username lookup
/// misses we verify against this instead of returning early, so unknown
/// usernames take about as long to reject as wrong passwords.
const UNUSED_HASH: &str = "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm";

/// Check `password` against the stored hash for `username`.
///
/// Returns `Ok(false)` both when the username is unknown and when the
/// password does not match, so the result never reveals whether an account
/// exists.
///
/// # Errors
///
/// Returns [Error::SqlError] if the user lookup failed, or
/// [Error::HashingError] if bcrypt could not process the stored hash.
pub fn authenticate(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<bool, Error> {
    let user = match get_user(username, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            // Burn the same hashing time as a real verification.
            let _ = PasswordHash::new_unchecked(UNUSED_HASH).verify(password);

            return Ok(false);
        }
        Err(error) => return Err(error),
    };

    user.password_hash.verify(password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        Error::HashingError(error.to_string())
    })
}

/// Like [authenticate], but surfaces any credential failure as
/// [Error::InvalidCredentials] so callers can use `?`.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] for an unknown username or a wrong
/// password, otherwise the errors of [authenticate].
pub fn verify_credentials(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<(), Error> {
    match authenticate(username, password, connection)? {
        true => Ok(()),
        false => Err(Error::InvalidCredentials),
    }
}
