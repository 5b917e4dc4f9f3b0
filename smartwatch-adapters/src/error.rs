//! Error types for the dialect parsers.
//!
//! None of these escape [`parse_section`](crate::parse_section): a fault is
//! local to the attribute or line it occurred in, gets logged, and the
//! attribute is recorded as zero (or the line dropped when no attribute
//! name can be derived from it).

use thiserror::Error;
use tracing::debug;

/// Errors raised while decoding a single field or line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A value could not be converted to an integer.
    #[error("invalid integer for {field}: {value:?}")]
    InvalidInteger { field: String, value: String },

    /// A hexadecimal value could not be converted.
    #[error("invalid hexadecimal value for {field}: {value:?}")]
    InvalidHex { field: String, value: String },

    /// A key/value line without the `:` separator.
    #[error("missing ':' separator in {0:?}")]
    MissingSeparator(String),
}

/// Convert a decimal value.
pub fn parse_int(field: &str, value: &str) -> Result<i64, ParseError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidInteger {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Convert a hexadecimal value, with or without a `0x` prefix.
pub fn parse_hex(field: &str, value: &str) -> Result<i64, ParseError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    i64::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidHex {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Collapse a conversion fault to zero.
pub fn or_zero(result: Result<i64, ParseError>) -> i64 {
    result.unwrap_or_else(|err| {
        debug!(%err, "recording attribute as 0");
        0
    })
}

/// Convert a decimal value, falling back to zero.
pub fn int_or_zero(field: &str, value: &str) -> i64 {
    or_zero(parse_int(field, value))
}
