//! Out-of-band account provisioning for the budget tracker.
//!
//! The library deliberately has no self-service registration, so accounts
//! are created with this tool by whoever operates the server.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use ledgerly::{Error, PasswordHash, ValidatedPassword, count_users, create_user, initialize_db};

#[derive(Parser)]
#[command(about = "Create a user account for the budget tracker")]
struct Args {
    /// Path to the SQLite database file, created if it does not exist.
    #[arg(long, default_value = "budget.db")]
    db_path: PathBuf,

    /// The username for the new account.
    username: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let username = args.username.trim();

    if username.is_empty() {
        return Err("the username must not be empty".into());
    }

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let password = rpassword::prompt_password("Password: ")?;
    let confirmed_password = rpassword::prompt_password("Confirm password: ")?;

    if password != confirmed_password {
        return Err("the passwords do not match".into());
    }

    let validated_password = ValidatedPassword::new(&password).map_err(|error| match error {
        Error::TooWeak(feedback) => format!("the password is too weak: {feedback}"),
        error => error.to_string(),
    })?;
    let password_hash = PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST)?;

    let user = create_user(username, password_hash, &connection)?;
    tracing::info!(
        "Created user \"{}\", the database now holds {} user(s).",
        user.username,
        count_users(&connection)?
    );

    Ok(())
}
