//! Pure validation rules for candidate ledger entries.
//!
//! Each rule either transforms the raw input (trimming, rounding) or rejects
//! it with a [ValidationError]. Rules never touch the database, and a whole
//! submission is checked with [validate_entry] so the caller can report every
//! problem at once rather than only the first.

use crate::Amount;

/// The maximum number of characters allowed in an entry name.
pub const NAME_MAX_LENGTH: usize = 25;

/// The smallest amount an entry may carry.
const AMOUNT_MINIMUM: Amount = Amount::from_cents(1);

/// The reasons a candidate entry can be rejected.
///
/// The display strings are written for end users, so a caller can surface
/// them directly as form feedback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The name was empty after trimming surrounding whitespace.
    #[error("a name is required")]
    EmptyName,

    /// The trimmed name was longer than [NAME_MAX_LENGTH] characters.
    #[error("the name is too long, the maximum length is {NAME_MAX_LENGTH} characters")]
    NameTooLong,

    /// The name contained something other than letters and spaces.
    #[error("the name may only contain alphabetic characters and spaces")]
    InvalidNameChars,

    /// The amount was not a plain decimal number.
    #[error("please enter a number without commas")]
    NotANumber,

    /// The amount was below one cent.
    #[error("please enter an amount of at least 0.01")]
    AmountTooSmall,
}

/// Check a candidate entry name and return the trimmed form.
///
/// An empty name fails immediately with only [ValidationError::EmptyName];
/// the length and character checks run on non-empty names and their failures
/// are both reported when both apply.
///
/// # Errors
///
/// Returns every [ValidationError] the name triggered.
pub fn validate_entry_name(raw: &str) -> Result<String, Vec<ValidationError>> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(vec![ValidationError::EmptyName]);
    }

    let mut errors = Vec::new();

    if trimmed.chars().count() > NAME_MAX_LENGTH {
        errors.push(ValidationError::NameTooLong);
    }

    if !trimmed
        .chars()
        .all(|character| character.is_ascii_alphabetic() || character.is_whitespace())
    {
        errors.push(ValidationError::InvalidNameChars);
    }

    if errors.is_empty() {
        Ok(trimmed.to_owned())
    } else {
        Err(errors)
    }
}

/// Check a candidate amount string and return it as a fixed-point [Amount].
///
/// # Errors
///
/// Returns [ValidationError::NotANumber] if the string is not a plain
/// decimal, or [ValidationError::AmountTooSmall] if it is below 0.01.
pub fn validate_amount(raw: &str) -> Result<Amount, ValidationError> {
    let amount: Amount = raw.parse().map_err(|_| ValidationError::NotANumber)?;

    if amount < AMOUNT_MINIMUM {
        return Err(ValidationError::AmountTooSmall);
    }

    Ok(amount)
}

/// Check a whole candidate entry, collecting the failures from both fields.
///
/// # Errors
///
/// Returns the combined [ValidationError]s from the name and amount checks.
/// No partial result is returned: either both fields are good or the caller
/// gets the full list of problems.
pub fn validate_entry(
    raw_name: &str,
    raw_amount: &str,
) -> Result<(String, Amount), Vec<ValidationError>> {
    let name = validate_entry_name(raw_name);
    let amount = validate_amount(raw_amount);

    match (name, amount) {
        (Ok(name), Ok(amount)) => Ok((name, amount)),
        (name, amount) => {
            let mut errors = Vec::new();

            if let Err(mut name_errors) = name {
                errors.append(&mut name_errors);
            }

            if let Err(amount_error) = amount {
                errors.push(amount_error);
            }

            Err(errors)
        }
    }
}

#[cfg(test)]
mod entry_name_tests {
    use crate::validation::{ValidationError, validate_entry_name};

    #[test]
    fn accepts_alphabetic_name_and_trims_it() {
        let result = validate_entry_name("  Rent payment  ");

        assert_eq!(result, Ok("Rent payment".to_owned()));
    }

    #[test]
    fn accepts_name_at_maximum_length() {
        let name = "a".repeat(25);

        assert_eq!(validate_entry_name(&name), Ok(name.clone()));
    }

    #[test]
    fn rejects_empty_name_without_running_other_checks() {
        let result = validate_entry_name("   ");

        assert_eq!(result, Err(vec![ValidationError::EmptyName]));
    }

    #[test]
    fn rejects_name_over_maximum_length() {
        let name = "a".repeat(26);

        assert_eq!(
            validate_entry_name(&name),
            Err(vec![ValidationError::NameTooLong])
        );
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        assert_eq!(
            validate_entry_name("rent 2026"),
            Err(vec![ValidationError::InvalidNameChars])
        );
        assert_eq!(
            validate_entry_name("co-pay"),
            Err(vec![ValidationError::InvalidNameChars])
        );
    }

    #[test]
    fn reports_length_and_character_failures_together() {
        let name = "1".repeat(30);

        assert_eq!(
            validate_entry_name(&name),
            Err(vec![
                ValidationError::NameTooLong,
                ValidationError::InvalidNameChars
            ])
        );
    }
}
