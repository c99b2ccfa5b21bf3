//! A fixed-point money type.
//!
//! Amounts are stored as a whole number of cents so that totals never drift
//! the way repeated floating-point sums can, and so the database always holds
//! a numeric column rather than a formatted string.

use std::fmt::Display;
use std::str::FromStr;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A monetary amount with exactly two fraction digits, held as cents.
///
/// Construct an `Amount` by parsing a decimal string (`"12.34".parse()`) or
/// from a known cent count with [Amount::from_cents]. Parsing rounds anything
/// past the second fraction digit half-up, so `"9.999"` becomes `10.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// An amount of zero dollars and zero cents.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a whole number of cents.
    pub fn as_cents(&self) -> i64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// The error returned when a string cannot be parsed as a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError;

impl Display for ParseAmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a plain decimal number")
    }
}

impl std::error::Error for ParseAmountError {}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parse a plain decimal string such as `50`, `-3.1` or `.55`.
    ///
    /// Grouping separators, exponents and currency symbols are rejected. The
    /// third fraction digit, when present, rounds the cent count half-up.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseAmountError);
        }

        if !whole.bytes().all(|byte| byte.is_ascii_digit())
            || !fraction.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(ParseAmountError);
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseAmountError)?
        };

        let mut fraction_digits = fraction.bytes().map(|byte| i64::from(byte - b'0'));
        let tens = fraction_digits.next().unwrap_or(0);
        let units = fraction_digits.next().unwrap_or(0);
        let round_up = fraction_digits.next().is_some_and(|digit| digit >= 5);

        let mut cents = dollars
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(tens * 10 + units))
            .ok_or(ParseAmountError)?;

        if round_up {
            cents += 1;
        }

        Ok(Amount(if negative { -cents } else { cents }))
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}

impl Serialize for Amount {
    /// Serializes as the canonical `D.DD` string so the two-decimal form
    /// survives the trip through any presentation layer.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        text.parse().map_err(de::Error::custom)
    }
}
