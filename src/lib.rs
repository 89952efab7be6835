// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Parse RFC 5545 recurrence rules and expand them into occurrence sequences.
//!
//! The crate is split along the RRULE pipeline: a tokenizer turns the raw
//! `PARAM=VALUE;...` string into named tokens, each token is validated in
//! isolation into a parameter node, and the parser assembles the nodes into an
//! immutable [`RecurrenceRule`]. From a rule and a start date-time, the
//! occurrence engine produces a lazy, strictly increasing sequence of
//! [`jiff::civil::DateTime`] occurrences.
//!
//! # Example
//!
//! ```
//! use jiff::civil::date;
//!
//! let rule = rrulekit::parse("FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=3")?;
//! let start = date(2024, 1, 1).at(9, 0, 0, 0);
//! let occurrences: Vec<_> = rule
//!     .occurrences(start)
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(occurrences[2], date(2024, 1, 5).at(9, 0, 0, 0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else, clippy::match_bool)]

pub mod calendar;
mod engine;
mod error;
pub mod keyword;
mod param;
mod parser;
mod rule;
mod tokenizer;
mod validator;

pub use crate::engine::Occurrences;
pub use crate::error::{
    GenerateError, InvalidValueKind, ParseError, RuleError, ValidationError,
};
pub use crate::parser::parse;
pub use crate::rule::{ByDay, Frequency, RecurrenceRule, Weekday};
