// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The validated, immutable recurrence rule value object.

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::civil::DateTime;

use crate::engine::Occurrences;
use crate::error::{GenerateError, RuleError};
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_COUNT,
    KW_RRULE_FREQ, KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_WEEKLY,
    KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::validator;

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(missing_docs)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parses an uppercase frequency keyword.
    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            KW_RRULE_FREQ_DAILY => Some(Self::Daily),
            KW_RRULE_FREQ_WEEKLY => Some(Self::Weekly),
            KW_RRULE_FREQ_MONTHLY => Some(Self::Monthly),
            KW_RRULE_FREQ_YEARLY => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            Self::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            Self::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            Self::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(missing_docs)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Parses a two-letter RFC 5545 weekday code.
    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            KW_DAY_MO => Some(Self::Monday),
            KW_DAY_TU => Some(Self::Tuesday),
            KW_DAY_WE => Some(Self::Wednesday),
            KW_DAY_TH => Some(Self::Thursday),
            KW_DAY_FR => Some(Self::Friday),
            KW_DAY_SA => Some(Self::Saturday),
            KW_DAY_SU => Some(Self::Sunday),
            _ => None,
        }
    }

    /// Convert to `jiff::civil::Weekday`.
    #[must_use]
    pub fn to_civil(self) -> jiff::civil::Weekday {
        match self {
            Self::Monday => jiff::civil::Weekday::Monday,
            Self::Tuesday => jiff::civil::Weekday::Tuesday,
            Self::Wednesday => jiff::civil::Weekday::Wednesday,
            Self::Thursday => jiff::civil::Weekday::Thursday,
            Self::Friday => jiff::civil::Weekday::Friday,
            Self::Saturday => jiff::civil::Weekday::Saturday,
            Self::Sunday => jiff::civil::Weekday::Sunday,
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monday => write!(f, "{KW_DAY_MO}"),
            Self::Tuesday => write!(f, "{KW_DAY_TU}"),
            Self::Wednesday => write!(f, "{KW_DAY_WE}"),
            Self::Thursday => write!(f, "{KW_DAY_TH}"),
            Self::Friday => write!(f, "{KW_DAY_FR}"),
            Self::Saturday => write!(f, "{KW_DAY_SA}"),
            Self::Sunday => write!(f, "{KW_DAY_SU}"),
        }
    }
}

/// One BYDAY spec: a weekday with an optional ordinal position within the
/// month (positive from the start, negative from the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByDay {
    /// Nth occurrence within the period, `[-53, -1] ∪ [1, 53]`; `None` means
    /// every such weekday.
    pub ordinal: Option<i8>,

    /// Day of the week.
    pub weekday: Weekday,
}

impl Display for ByDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{n}{}", self.weekday),
            None => write!(f, "{}", self.weekday),
        }
    }
}

/// A validated RFC 5545 recurrence rule.
///
/// Produced once by [`parse`](crate::parse) and never mutated afterwards; it
/// can be freely shared across concurrent readers. Construction is
/// fail-fast: a partially valid rule never exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub(crate) frequency: Frequency,
    pub(crate) interval: u32,
    pub(crate) count: Option<u32>,
    pub(crate) until: Option<DateTime>,
    pub(crate) by_day: Option<Vec<ByDay>>,
    pub(crate) by_month_day: Option<Vec<i8>>,
    pub(crate) by_month: Option<Vec<i8>>,
    pub(crate) by_week_no: Option<Vec<i8>>,
    pub(crate) by_set_pos: Option<Vec<i16>>,
    pub(crate) week_start: Option<Weekday>,
}

impl RecurrenceRule {
    /// Base recurrence frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Repeat interval in frequency units, always at least 1.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Occurrence cap, if one was given. `Some(0)` is a valid degenerate
    /// rule that yields nothing.
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Whether COUNT was given.
    #[must_use]
    pub fn has_count(&self) -> bool {
        self.count.is_some()
    }

    /// End-date cap (inclusive, UTC), if one was given.
    #[must_use]
    pub fn until(&self) -> Option<DateTime> {
        self.until
    }

    /// Whether UNTIL was given.
    #[must_use]
    pub fn has_until(&self) -> bool {
        self.until.is_some()
    }

    /// BYDAY specs in input order; empty when BYDAY was absent.
    #[must_use]
    pub fn by_day(&self) -> &[ByDay] {
        self.by_day.as_deref().unwrap_or_default()
    }

    /// Whether BYDAY was given.
    #[must_use]
    pub fn has_by_day(&self) -> bool {
        self.by_day.is_some()
    }

    /// BYMONTHDAY values in input order; empty when absent.
    #[must_use]
    pub fn by_month_day(&self) -> &[i8] {
        self.by_month_day.as_deref().unwrap_or_default()
    }

    /// Whether BYMONTHDAY was given.
    #[must_use]
    pub fn has_by_month_day(&self) -> bool {
        self.by_month_day.is_some()
    }

    /// BYMONTH values in input order; empty when absent.
    #[must_use]
    pub fn by_month(&self) -> &[i8] {
        self.by_month.as_deref().unwrap_or_default()
    }

    /// Whether BYMONTH was given.
    #[must_use]
    pub fn has_by_month(&self) -> bool {
        self.by_month.is_some()
    }

    /// BYWEEKNO values in input order; empty when absent.
    #[must_use]
    pub fn by_week_no(&self) -> &[i8] {
        self.by_week_no.as_deref().unwrap_or_default()
    }

    /// Whether BYWEEKNO was given.
    #[must_use]
    pub fn has_by_week_no(&self) -> bool {
        self.by_week_no.is_some()
    }

    /// BYSETPOS values in input order; empty when absent.
    #[must_use]
    pub fn by_set_pos(&self) -> &[i16] {
        self.by_set_pos.as_deref().unwrap_or_default()
    }

    /// Whether BYSETPOS was given.
    #[must_use]
    pub fn has_by_set_pos(&self) -> bool {
        self.by_set_pos.is_some()
    }

    /// Effective start of week: the explicit WKST value, or Monday.
    #[must_use]
    pub fn week_start(&self) -> Weekday {
        self.week_start.unwrap_or(Weekday::Monday)
    }

    /// Whether WKST was given explicitly.
    #[must_use]
    pub fn has_week_start(&self) -> bool {
        self.week_start.is_some()
    }

    /// Lazily expands this rule from `start` into a strictly increasing
    /// sequence of occurrences. `start` itself is the first occurrence
    /// unless BY* constraints push it forward.
    #[must_use]
    pub fn occurrences(&self, start: DateTime) -> Occurrences<'_> {
        Occurrences::new(self, start, None)
    }

    /// Like [`occurrences`](Self::occurrences), but caps the sequence at
    /// `limit` occurrences regardless of COUNT.
    #[must_use]
    pub fn occurrences_with_limit(&self, start: DateTime, limit: u32) -> Occurrences<'_> {
        Occurrences::new(self, start, Some(limit))
    }

    /// Occurrences falling within `[range_start, range_end]` (inclusive).
    /// Stops pulling from the underlying sequence once past `range_end`.
    pub fn occurrences_between(
        &self,
        start: DateTime,
        range_start: DateTime,
        range_end: DateTime,
    ) -> impl Iterator<Item = Result<DateTime, GenerateError>> + '_ {
        self.occurrences(start)
            .take_while(move |item| match item {
                Ok(occurrence) => *occurrence <= range_end,
                Err(_) => true,
            })
            .filter(move |item| match item {
                Ok(occurrence) => *occurrence >= range_start,
                Err(_) => true,
            })
    }

    /// Returns true if `candidate` is exactly one of the occurrences this
    /// rule produces from `start`.
    ///
    /// This scans the generated sequence up to `candidate`; no index is
    /// maintained.
    ///
    /// # Errors
    ///
    /// Propagates a [`GenerateError`] if the scan hits an unsatisfiable
    /// period before reaching `candidate`.
    pub fn is_occurrence(
        &self,
        start: DateTime,
        candidate: DateTime,
    ) -> Result<bool, GenerateError> {
        validator::is_occurrence(self, start, candidate)
    }
}

/// Canonical serialization: `FREQ` always, `INTERVAL` only when it differs
/// from the default 1, `COUNT`/`UNTIL` when set, each BY* as a comma-joined
/// list, and `WKST` only when it was explicitly given.
impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KW_RRULE_FREQ}={}", self.frequency)?;
        if self.interval != 1 {
            write!(f, ";{KW_RRULE_INTERVAL}={}", self.interval)?;
        }
        if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }
        if let Some(until) = self.until {
            write!(
                f,
                ";{KW_RRULE_UNTIL}={:04}{:02}{:02}T{:02}{:02}{:02}Z",
                until.year(),
                until.month(),
                until.day(),
                until.hour(),
                until.minute(),
                until.second(),
            )?;
        }
        if let Some(by_day) = &self.by_day {
            write_list(f, KW_RRULE_BYDAY, by_day)?;
        }
        if let Some(by_month_day) = &self.by_month_day {
            write_list(f, KW_RRULE_BYMONTHDAY, by_month_day)?;
        }
        if let Some(by_month) = &self.by_month {
            write_list(f, KW_RRULE_BYMONTH, by_month)?;
        }
        if let Some(by_week_no) = &self.by_week_no {
            write_list(f, KW_RRULE_BYWEEKNO, by_week_no)?;
        }
        if let Some(by_set_pos) = &self.by_set_pos {
            write_list(f, KW_RRULE_BYSETPOS, by_set_pos)?;
        }
        if let Some(week_start) = self.week_start {
            write!(f, ";{KW_RRULE_WKST}={week_start}")?;
        }
        Ok(())
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, name: &str, items: &[T]) -> fmt::Result {
    write!(f, ";{name}=")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_canonically() {
        let rule: RecurrenceRule = "freq=daily;interval=1".parse().unwrap();
        assert_eq!(rule.to_string(), "FREQ=DAILY");

        let rule: RecurrenceRule = "FREQ=WEEKLY;COUNT=10;BYDAY=MO,WE,FR;INTERVAL=2"
            .parse()
            .unwrap();
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;INTERVAL=2;COUNT=10;BYDAY=MO,WE,FR");

        let rule: RecurrenceRule = "FREQ=DAILY;UNTIL=20251231T235959Z".parse().unwrap();
        assert_eq!(rule.to_string(), "FREQ=DAILY;UNTIL=20251231T235959Z");
    }

    #[test]
    fn wkst_is_emitted_only_when_explicit() {
        let rule: RecurrenceRule = "FREQ=WEEKLY".parse().unwrap();
        assert_eq!(rule.week_start(), Weekday::Monday);
        assert!(!rule.has_week_start());
        assert!(!rule.to_string().contains("WKST"));

        let rule: RecurrenceRule = "FREQ=WEEKLY;WKST=MO".parse().unwrap();
        assert_eq!(rule.week_start(), Weekday::Monday);
        assert!(rule.has_week_start());
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;WKST=MO");
    }

    #[test]
    fn accessors_report_presence() {
        let rule: RecurrenceRule = "FREQ=MONTHLY;BYMONTHDAY=1,15,-1;BYSETPOS=1"
            .parse()
            .unwrap();
        assert!(rule.has_by_month_day());
        assert!(rule.has_by_set_pos());
        assert!(!rule.has_by_day());
        assert!(!rule.has_count());
        assert_eq!(rule.by_month_day(), &[1, 15, -1]);
        assert_eq!(rule.by_set_pos(), &[1]);
        assert_eq!(rule.by_day(), &[]);
        assert_eq!(rule.interval(), 1);
    }

    #[test]
    fn by_day_display_includes_ordinal() {
        let spec = ByDay {
            ordinal: Some(-1),
            weekday: Weekday::Friday,
        };
        assert_eq!(spec.to_string(), "-1FR");
        let spec = ByDay {
            ordinal: None,
            weekday: Weekday::Sunday,
        };
        assert_eq!(spec.to_string(), "SU");
    }
}
