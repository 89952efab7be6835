// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for recurrence rule parsing and expansion.
//!
//! Three kinds of failure exist, raised at the point of detection and never
//! recovered internally:
//!
//! - [`ParseError`]: the raw string is malformed at the token level.
//! - [`ValidationError`]: the string tokenizes but a parameter is semantically
//!   invalid. Always carries the parameter name and the offending raw value.
//! - [`GenerateError`]: a valid rule cannot produce a next occurrence for a
//!   given period at generation time.

use std::fmt;

/// Token-level failure of the RRULE grammar. Unrecoverable; aborts the parse.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty or contained only whitespace and separators.
    #[error("recurrence rule string is empty")]
    Empty,

    /// A segment did not have the `PARAM=VALUE` shape.
    #[error("malformed segment '{segment}': expected PARAM=VALUE")]
    MalformedSegment {
        /// The offending raw segment.
        segment: String,
    },

    /// The same parameter name appeared more than once.
    #[error("duplicate parameter '{name}'")]
    DuplicateParameter {
        /// The duplicated parameter name, uppercased.
        name: String,
    },
}

/// Semantic failure of an otherwise well-formed rule string.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No FREQ parameter was present.
    #[error("FREQ parameter is required")]
    MissingFrequency,

    /// COUNT and UNTIL were both present.
    #[error("COUNT and UNTIL are mutually exclusive")]
    CountUntilExclusive,

    /// BYSETPOS was present without any BY* parameter to select from.
    #[error("BYSETPOS requires at least one of BYDAY, BYMONTHDAY, BYMONTH or BYWEEKNO")]
    SetPosWithoutDependency,

    /// The parameter name is not part of the supported grammar.
    #[error("unsupported parameter '{name}'")]
    UnsupportedParameter {
        /// The unknown parameter name, uppercased.
        name: String,
    },

    /// A parameter value failed its own validation.
    #[error("invalid value '{value}' for {parameter}: {kind}")]
    InvalidValue {
        /// Name of the parameter whose value was rejected.
        parameter: &'static str,
        /// The offending raw value.
        value: String,
        /// What exactly was wrong with the value.
        kind: InvalidValueKind,
    },
}

/// The specific way a parameter value was invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidValueKind {
    /// The value, or one of its list elements, was empty.
    Empty,

    /// The value was not a plain integer.
    NotAnInteger,

    /// Zero is not permitted for this parameter.
    Zero,

    /// The value fell outside the permitted range.
    OutOfRange {
        /// Smallest permitted magnitude or value.
        min: i32,
        /// Largest permitted magnitude or value.
        max: i32,
    },

    /// The value was not one of the permitted choices.
    UnknownChoice,

    /// The value did not match the `YYYYMMDDTHHMMSSZ` date-time shape.
    MalformedDateTime,
}

impl fmt::Display for InvalidValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "value must not be empty"),
            Self::NotAnInteger => write!(f, "value must be an integer"),
            Self::Zero => write!(f, "zero is not permitted"),
            Self::OutOfRange { min, max } => write!(f, "value must be in [{min}, {max}]"),
            Self::UnknownChoice => write!(f, "not a permitted choice"),
            Self::MalformedDateTime => write!(f, "expected YYYYMMDDTHHMMSSZ (UTC)"),
        }
    }
}

/// Any failure of [`parse`](crate::parse).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Malformed token syntax.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Semantically invalid input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Generation-time failure: a valid rule with no next occurrence for a
/// target period. Surfaces through the occurrence iterator; no period is
/// ever skipped silently.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The BYMONTHDAY set resolves to no valid day in the target month.
    #[error("no valid BYMONTHDAY day in {year:04}-{month:02}")]
    NoValidDay {
        /// Target year.
        year: i16,
        /// Target month.
        month: i8,
    },

    /// The bounded forward scan found no matching date.
    #[error("no matching date within {periods} periods")]
    ScanExhausted {
        /// How many periods were scanned before giving up.
        periods: u32,
    },

    /// No year containing the requested ISO week was found.
    #[error("no year with ISO week {week} within {tried} year steps")]
    NoWeek53Year {
        /// The requested week number.
        week: i8,
        /// How many interval years were tried.
        tried: u32,
    },

    /// A period roll produced a date that does not exist on the calendar.
    #[error("rolled to invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Target year.
        year: i16,
        /// Target month.
        month: i8,
        /// Preserved day-of-month that does not exist in the target month.
        day: i8,
    },

    /// Date arithmetic left the supported calendar range.
    #[error("date arithmetic overflowed the supported calendar range")]
    Overflow,
}
