use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Money is represented as integer cents to avoid floating-point precision
/// issues. A transaction amount is a signed delta: positive credits the
/// wallet, negative debits it.
pub type Cents = i64;

/// A three-letter ISO-style currency code, normalized to lowercase.
/// Immutable once attached to a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parse and normalize a currency code. Accepts any casing
    /// ("USD", "jPy"), stores lowercase. Anything that is not exactly
    /// three ASCII letters is rejected.
    pub fn parse(input: &str) -> Result<Self, ParseCurrencyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseCurrencyError::Empty);
        }
        if input.len() != 3 || !input.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ParseCurrencyError::InvalidCode(input.to_string()));
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCurrencyError {
    #[error("currency can't be empty")]
    Empty,
    #[error("invalid currency code: {0:?} (expected three letters)")]
    InvalidCode(String),
}

/// Format cents as a decimal string. Example: 5000 -> "50.00", -1 -> "-0.01"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a signed decimal string into cents.
/// Example: "50.00" -> 5000, "-12.3" -> -1230, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((u, d)) => (u, d),
        None => (digits, ""),
    };
    // Only bare digits past this point; a signed parse would let a stray
    // sign inside the number through (e.g. "1.-5").
    if (units_str.is_empty() && decimal_str.is_empty())
        || decimal_str.len() > 2
        || !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };
    let decimal: i64 = match decimal_str.len() {
        0 => 0,
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => decimal_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units * 100 + decimal;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalizes_case() {
        assert_eq!(Currency::parse("usd").unwrap().as_str(), "usd");
        assert_eq!(Currency::parse("EUR").unwrap().as_str(), "eur");
        assert_eq!(Currency::parse("jPy").unwrap().as_str(), "jpy");
    }

    #[test]
    fn test_currency_rejects_empty() {
        assert_eq!(Currency::parse(""), Err(ParseCurrencyError::Empty));
        assert_eq!(Currency::parse("   "), Err(ParseCurrencyError::Empty));
    }

    #[test]
    fn test_currency_rejects_bad_codes() {
        for bad in ["test", "us", "u$d", "12x", "usdd"] {
            assert!(Currency::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-30"), Ok(-3000));
        assert_eq!(parse_cents("-0.01"), Ok(-1));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert!(parse_cents("1.999").is_err());
    }

    #[test]
    fn test_parse_cents_rejects_interior_signs() {
        assert!(parse_cents("1.-5").is_err());
        assert!(parse_cents("--5").is_err());
        assert!(parse_cents("1.+5").is_err());
        assert!(parse_cents("-").is_err());
        assert!(parse_cents("").is_err());
    }
}
