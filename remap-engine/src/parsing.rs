//! Utility functions and errors for parsing input.

use std::str::FromStr;

use thiserror::Error;

use crate::{DynamicError, DynamicResult};

/// A value parsing error carrying the string that failed to parse.
#[derive(Error, Debug)]
#[error("failed to parse value: {value:?}")]
pub struct ParseValueError<E>
where
    E: std::error::Error,
{
    /// The string that was being parsed.
    value: String,
    source: E,
}

/// Parse a string slice into another type.
///
/// This wraps [`str::parse`], keeping the offending string as context when
/// parsing fails.
///
/// # Errors
///
/// Returns a [`ParseValueError`] holding the given string and
/// [`F::Err`][FromStr::Err] as the source if the string cannot be parsed
/// into the desired type.
pub fn parse_value<F>(string: &str) -> Result<F, ParseValueError<F::Err>>
where
    F: FromStr,
    F::Err: std::error::Error,
{
    string.parse::<F>().map_err(|source| ParseValueError {
        value: string.to_string(),
        source,
    })
}

/// A line in an input string caused a parsing error.
#[derive(Error, Debug)]
#[error("invalid input on line {}", .line_index.saturating_add(1))]
pub struct LineError {
    /// The line index, zero based.
    /// This will be formatted to a one-based number for display.
    line_index: usize,
    source: DynamicError,
}

/// Parse every line of the input with a closure, wrapping any line's error
/// with a [`LineError`] naming the line.
///
/// Lines are trimmed of surrounding whitespace before the closure sees them,
/// so blank lines arrive as empty strings and the closure decides what to do
/// with them.
///
/// # Returns
///
/// An iterable of parsing results, one per input line.
pub fn parse_lines<T, F>(input: &str, mut parser: F) -> impl Iterator<Item = Result<T, LineError>>
where
    F: FnMut(&str) -> DynamicResult<T>,
{
    input.lines().enumerate().map(move |(index, line)| {
        parser(line.trim()).map_err(|source| LineError {
            line_index: index,
            source,
        })
    })
}
