// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Membership testing: is a given date-time one of a rule's occurrences?
//!
//! Implemented by scanning the generated sequence rather than inverting the
//! stepping math, so the validator can never disagree with the engine.

use jiff::civil::DateTime;

use crate::error::GenerateError;
use crate::rule::RecurrenceRule;

/// Returns true if `candidate` is exactly one of the occurrences `rule`
/// produces from `start`.
///
/// Cheap rejections run first: anything before `start` or past UNTIL is not
/// an occurrence. Otherwise the sequence is scanned until it reaches or
/// passes `candidate`, so COUNT caps apply and a generation error before
/// that point propagates.
pub(crate) fn is_occurrence(
    rule: &RecurrenceRule,
    start: DateTime,
    candidate: DateTime,
) -> Result<bool, GenerateError> {
    if candidate < start {
        return Ok(false);
    }
    if let Some(until) = rule.until() {
        if candidate > until {
            return Ok(false);
        }
    }

    for item in rule.occurrences(start) {
        let occurrence = item?;
        if occurrence == candidate {
            return Ok(true);
        }
        if occurrence > candidate {
            return Ok(false);
        }
    }
    Ok(false)
}
