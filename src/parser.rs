// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Top-level RRULE parser: tokenize, validate, assemble.

use tracing::trace;

use crate::error::{RuleError, ValidationError};
use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO,
    KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_UNTIL,
};
use crate::param::ParamNode;
use crate::rule::RecurrenceRule;
use crate::tokenizer::tokenize;

/// Parses an RFC 5545 RRULE string into a [`RecurrenceRule`].
///
/// Validation runs in a fixed order so error messages are reproducible:
/// token syntax, required FREQ, COUNT/UNTIL exclusivity, the BYSETPOS
/// dependency, then each parameter value in input order.
///
/// # Example
///
/// ```
/// let rule = rrulekit::parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR;COUNT=10")?;
/// assert_eq!(rule.interval(), 2);
/// assert_eq!(rule.count(), Some(10));
/// # Ok::<(), rrulekit::RuleError>(())
/// ```
///
/// # Errors
///
/// [`RuleError::Parse`] for malformed token syntax, [`RuleError::Validation`]
/// for semantically invalid parameters.
pub fn parse(src: &str) -> Result<RecurrenceRule, RuleError> {
    let tokens = tokenize(src)?;

    let has = |name: &str| tokens.iter().any(|(n, _)| n == name);
    if !has(KW_RRULE_FREQ) {
        return Err(ValidationError::MissingFrequency.into());
    }
    if has(KW_RRULE_COUNT) && has(KW_RRULE_UNTIL) {
        return Err(ValidationError::CountUntilExclusive.into());
    }
    if has(KW_RRULE_BYSETPOS)
        && !(has(KW_RRULE_BYDAY)
            || has(KW_RRULE_BYMONTHDAY)
            || has(KW_RRULE_BYMONTH)
            || has(KW_RRULE_BYWEEKNO))
    {
        return Err(ValidationError::SetPosWithoutDependency.into());
    }

    let mut frequency = None;
    let mut interval = None;
    let mut count = None;
    let mut until = None;
    let mut by_day = None;
    let mut by_month_day = None;
    let mut by_month = None;
    let mut by_week_no = None;
    let mut by_set_pos = None;
    let mut week_start = None;

    // Duplicates were already rejected by the tokenizer, so plain
    // assignment is safe here.
    for (name, raw) in &tokens {
        match ParamNode::parse(name, raw)? {
            ParamNode::Frequency(value) => frequency = Some(value),
            ParamNode::Interval(value) => interval = Some(value),
            ParamNode::Count(value) => count = Some(value),
            ParamNode::Until(value) => until = Some(value),
            ParamNode::ByDay(value) => by_day = Some(value),
            ParamNode::ByMonthDay(value) => by_month_day = Some(value),
            ParamNode::ByMonth(value) => by_month = Some(value),
            ParamNode::ByWeekNo(value) => by_week_no = Some(value),
            ParamNode::BySetPos(value) => by_set_pos = Some(value),
            ParamNode::WeekStart(value) => week_start = Some(value),
        }
    }

    // FREQ presence was checked on the token list above.
    let frequency = frequency.ok_or(ValidationError::MissingFrequency)?;

    let rule = RecurrenceRule {
        frequency,
        interval: interval.unwrap_or(1),
        count,
        until,
        by_day,
        by_month_day,
        by_month,
        by_week_no,
        by_set_pos,
        week_start,
    };
    trace!(rule = %rule, "parsed recurrence rule");
    Ok(rule)
}
