// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Occurrence generation: expands a [`RecurrenceRule`] from a start instant
//! into a lazy, strictly increasing sequence of date-times.
//!
//! The engine is stateless across calls; all cursor state lives in the
//! [`Occurrences`] iterator. Exactly one BY* family drives stepping when
//! several are present, at fixed precedence BYDAY > BYMONTHDAY > BYMONTH >
//! BYWEEKNO. Every forward scan is bounded, so an unsatisfiable constraint
//! surfaces as a [`GenerateError`] instead of spinning.

use jiff::Span;
use jiff::civil::{Date, DateTime, Time};
use tracing::trace;

use crate::calendar;
use crate::error::GenerateError;
use crate::rule::{Frequency, RecurrenceRule};

/// How many interval periods (months or years) a positional BYDAY scan rolls
/// through before concluding the rule is unsatisfiable.
const MAX_SCAN_PERIODS: u32 = 48;

/// How many interval years the BYWEEKNO=53 search tries. The Gregorian
/// week-53 pattern repeats every 400 years, so a miss at this bound means no
/// eligible year exists on the cycle.
const MAX_WEEK53_YEAR_STEPS: u32 = 400;

/// Upper bound on the day-by-day weekday scan. A non-empty weekday set
/// matches within two scanned weeks, interval jumps included.
const MAX_WEEKDAY_SCAN_DAYS: u32 = 28;

/// Lazy iterator over the occurrences of a rule from a start instant.
///
/// Yields `Result` items: an unsatisfiable period surfaces as one `Err`,
/// after which the iterator is fused. The next cursor is only computed when
/// the consumer pulls again, so a consumer that stops early never observes an
/// error past the occurrences it asked for.
#[derive(Debug)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    start: DateTime,
    limit: Option<u32>,
    last: Option<DateTime>,
    emitted: u32,
    done: bool,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(rule: &'a RecurrenceRule, start: DateTime, limit: Option<u32>) -> Self {
        Self {
            rule,
            start,
            limit,
            last: None,
            emitted: 0,
            done: false,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Result<DateTime, GenerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // Explicit limit takes precedence over the rule's COUNT; zero means
        // a degenerate empty sequence, checked before the first emit.
        let limit = self.limit.or(self.rule.count());
        if limit == Some(0) {
            self.done = true;
            return None;
        }

        let stepped = match self.last {
            None => first_occurrence(self.rule, self.start),
            Some(prev) => advance(self.rule, self.start, prev, self.emitted),
        };
        let candidate = match stepped {
            Ok(candidate) => candidate,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        if let Some(until) = self.rule.until() {
            if candidate > until {
                self.done = true;
                return None;
            }
        }

        self.last = Some(candidate);
        self.emitted += 1;
        if limit.is_some_and(|n| self.emitted >= n) {
            self.done = true;
        }
        Some(Ok(candidate))
    }
}

/// Which BY* family drives stepping for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Driver {
    ByDay,
    ByMonthDay,
    ByMonth,
    ByWeekNo,
}

fn driver(rule: &RecurrenceRule) -> Option<Driver> {
    if rule.has_by_day() {
        Some(Driver::ByDay)
    } else if rule.has_by_month_day() {
        Some(Driver::ByMonthDay)
    } else if rule.has_by_month() {
        Some(Driver::ByMonth)
    } else if rule.has_by_week_no() {
        Some(Driver::ByWeekNo)
    } else {
        None
    }
}

/// Seek-forward: the first occurrence is `start` itself unless a BY* family
/// is present, in which case it is the first date at or after `start` that
/// satisfies the driving constraint.
fn first_occurrence(rule: &RecurrenceRule, start: DateTime) -> Result<DateTime, GenerateError> {
    match driver(rule) {
        None => Ok(start),
        Some(driver) => {
            if matches(rule, driver, start.date()) {
                Ok(start)
            } else {
                step(rule, driver, start)
            }
        }
    }
}

fn advance(
    rule: &RecurrenceRule,
    start: DateTime,
    prev: DateTime,
    emitted: u32,
) -> Result<DateTime, GenerateError> {
    match driver(rule) {
        Some(driver) => step(rule, driver, prev),
        None => {
            // Plain stepping is anchored on `start` so day-of-month is
            // preserved across short months instead of drifting.
            let n = i64::from(emitted)
                .checked_mul(i64::from(rule.interval()))
                .ok_or(GenerateError::Overflow)?;
            let span = match rule.frequency() {
                Frequency::Daily => Span::new().try_days(n),
                Frequency::Weekly => Span::new().try_weeks(n),
                Frequency::Monthly => Span::new().try_months(n),
                Frequency::Yearly => Span::new().try_years(n),
            }
            .map_err(|_| GenerateError::Overflow)?;
            start.checked_add(span).map_err(|_| GenerateError::Overflow)
        }
    }
}

/// The matching predicate shared by seek-forward and step-forward.
fn matches(rule: &RecurrenceRule, driver: Driver, date: Date) -> bool {
    match driver {
        Driver::ByDay => match rule.frequency() {
            Frequency::Daily | Frequency::Weekly => weekday_in_set(rule, date),
            Frequency::Monthly | Frequency::Yearly => positional_match(rule, date),
        },
        Driver::ByMonthDay => {
            calendar::valid_days_for_month(rule.by_month_day(), date.year(), date.month())
                .contains(&date.day())
        }
        Driver::ByMonth => rule.by_month().contains(&date.month()),
        Driver::ByWeekNo => rule.by_week_no().contains(&calendar::iso_week_number(date)),
    }
}

fn step(rule: &RecurrenceRule, driver: Driver, prev: DateTime) -> Result<DateTime, GenerateError> {
    match driver {
        Driver::ByDay => match rule.frequency() {
            Frequency::Daily | Frequency::Weekly => step_weekday_scan(rule, prev),
            Frequency::Monthly | Frequency::Yearly => step_positional(rule, prev),
        },
        Driver::ByMonthDay => step_by_month_day(rule, prev),
        Driver::ByMonth => step_by_month(rule, prev),
        Driver::ByWeekNo => step_by_week_no(rule, prev),
    }
}

fn weekday_in_set(rule: &RecurrenceRule, date: Date) -> bool {
    rule.by_day()
        .iter()
        .any(|spec| spec.weekday.to_civil() == date.weekday())
}

/// True if `date` matches some BYDAY spec positionally: the weekday matches
/// and, when an ordinal is given, the date is exactly the Nth (or Nth from
/// the end) such weekday within its month.
fn positional_match(rule: &RecurrenceRule, date: Date) -> bool {
    rule.by_day().iter().any(|spec| {
        if spec.weekday.to_civil() != date.weekday() {
            return false;
        }
        match spec.ordinal {
            None => true,
            Some(n) if n > 0 => (date.day() - 1) / 7 + 1 == n,
            Some(n) => {
                let dim = calendar::days_in_month(date.year(), date.month());
                (dim - date.day()) / 7 + 1 == -n
            }
        }
    })
}

/// DAILY/WEEKLY BYDAY: scan day by day for the next date in the weekday set,
/// wrapping to the next interval-sized week at the WKST boundary.
fn step_weekday_scan(rule: &RecurrenceRule, prev: DateTime) -> Result<DateTime, GenerateError> {
    let wkst = rule.week_start().to_civil();
    let interval = i64::from(rule.interval());
    let mut date = prev.date();
    for _ in 0..MAX_WEEKDAY_SCAN_DAYS {
        date = add_days(date, 1)?;
        if interval > 1 && calendar::weekday_offset(date.weekday(), wkst) == 0 {
            date = add_weeks(date, interval - 1)?;
        }
        if weekday_in_set(rule, date) {
            return Ok(DateTime::from_parts(date, prev.time()));
        }
    }
    Err(GenerateError::ScanExhausted {
        periods: MAX_WEEKDAY_SCAN_DAYS,
    })
}

/// MONTHLY/YEARLY BYDAY: scan the rest of the current period day by day,
/// then roll interval periods forward, scanning each whole period.
fn step_positional(rule: &RecurrenceRule, prev: DateTime) -> Result<DateTime, GenerateError> {
    let monthly = rule.frequency() == Frequency::Monthly;
    let prev_date = prev.date();
    let same_period = |d: Date| {
        if monthly {
            d.year() == prev_date.year() && d.month() == prev_date.month()
        } else {
            d.year() == prev_date.year()
        }
    };

    let mut date = add_days(prev_date, 1)?;
    while same_period(date) {
        if positional_match(rule, date) {
            return Ok(DateTime::from_parts(date, prev.time()));
        }
        date = add_days(date, 1)?;
    }

    let base = if monthly {
        prev_date.first_of_month()
    } else {
        jiff::civil::date(prev_date.year(), 1, 1)
    };
    for k in 1..=MAX_SCAN_PERIODS {
        let offset = i64::from(k)
            .checked_mul(i64::from(rule.interval()))
            .ok_or(GenerateError::Overflow)?;
        let period_start = if monthly {
            add_months(base, offset)?
        } else {
            add_years(base, offset)?
        };
        let period_end = if monthly {
            period_start.last_of_month()
        } else {
            jiff::civil::date(period_start.year(), 12, 31)
        };
        trace!(period = %period_start, "no BYDAY match, rolling to next period");

        let mut d = period_start;
        while d <= period_end {
            if positional_match(rule, d) {
                return Ok(DateTime::from_parts(d, prev.time()));
            }
            d = add_days(d, 1)?;
        }
    }
    Err(GenerateError::ScanExhausted {
        periods: MAX_SCAN_PERIODS,
    })
}

/// BYMONTHDAY: next valid resolved day in the current month, else the first
/// valid day of the next interval month (or interval year for YEARLY, which
/// keeps the month). A target month with no valid day is an error, not a
/// skip.
fn step_by_month_day(rule: &RecurrenceRule, prev: DateTime) -> Result<DateTime, GenerateError> {
    let prev_date = prev.date();
    let (year, month) = (prev_date.year(), prev_date.month());

    let valid = calendar::valid_days_for_month(rule.by_month_day(), year, month);
    if let Some(&day) = valid.iter().find(|&&d| d > prev_date.day()) {
        return make_datetime(year, month, day, prev.time());
    }

    let interval = i64::from(rule.interval());
    let (target_year, target_month) = match rule.frequency() {
        Frequency::Yearly => (i64::from(year) + interval, i64::from(month)),
        _ => {
            let total = i64::from(year) * 12 + i64::from(month) - 1 + interval;
            (total.div_euclid(12), total.rem_euclid(12) + 1)
        }
    };
    let target_year = i16::try_from(target_year).map_err(|_| GenerateError::Overflow)?;
    let target_month = i8::try_from(target_month).map_err(|_| GenerateError::Overflow)?;
    trace!(year = target_year, month = target_month, "rolling BYMONTHDAY to next period");

    let valid = calendar::valid_days_for_month(rule.by_month_day(), target_year, target_month);
    match valid.first() {
        Some(&day) => make_datetime(target_year, target_month, day, prev.time()),
        None => Err(GenerateError::NoValidDay {
            year: target_year,
            month: target_month,
        }),
    }
}

/// BYMONTH: next month in the sorted set within the same year, preserving
/// day-of-month, else the first set month of the next interval year.
fn step_by_month(rule: &RecurrenceRule, prev: DateTime) -> Result<DateTime, GenerateError> {
    let mut months: Vec<i8> = rule.by_month().to_vec();
    months.sort_unstable();
    months.dedup();

    let prev_date = prev.date();
    if let Some(&month) = months.iter().find(|&&m| m > prev_date.month()) {
        return make_datetime(prev_date.year(), month, prev_date.day(), prev.time());
    }

    let target_year = i64::from(prev_date.year()) + i64::from(rule.interval());
    let target_year = i16::try_from(target_year).map_err(|_| GenerateError::Overflow)?;
    // Non-empty by construction; validated at parse time.
    let first = months.first().copied().ok_or(GenerateError::Overflow)?;
    make_datetime(target_year, first, prev_date.day(), prev.time())
}

/// BYWEEKNO: next ISO week in the sorted set, keeping the day-of-week offset
/// from the week's Monday. The search runs in ISO-year space: near the year
/// boundary the cursor's ISO year differs from its calendar year, and week 1
/// of an ISO year can start in the preceding December. Weeks of the cursor's
/// ISO year are tried first, then interval ISO years forward; a candidate
/// counts only if it lands strictly after the cursor. Years without a week
/// 53 are skipped when 53 is the target, up to a fixed bound.
fn step_by_week_no(rule: &RecurrenceRule, prev: DateTime) -> Result<DateTime, GenerateError> {
    let mut weeks: Vec<i8> = rule.by_week_no().to_vec();
    weeks.sort_unstable();
    weeks.dedup();

    let prev_date = prev.date();
    let iso_year = prev_date.iso_week_date().year();
    let offset = i64::from(prev_date.weekday().to_monday_zero_offset());

    let candidate = |year: i16, week: i8| -> Result<Option<Date>, GenerateError> {
        if week == 53 && !calendar::year_has_week53(year) {
            return Ok(None);
        }
        let monday = calendar::first_date_of_week(year, week).ok_or(GenerateError::Overflow)?;
        let date = add_days(monday, offset)?;
        Ok((date > prev_date).then_some(date))
    };

    for &week in &weeks {
        if let Some(date) = candidate(iso_year, week)? {
            return Ok(DateTime::from_parts(date, prev.time()));
        }
    }

    // Only a set of exactly {53} can keep rolling past eligible years, so
    // hitting the bound means no week-53 year exists on the interval cycle.
    let interval = i64::from(rule.interval());
    let mut tried: u32 = 0;
    loop {
        tried += 1;
        if tried > MAX_WEEK53_YEAR_STEPS {
            return Err(GenerateError::NoWeek53Year {
                week: 53,
                tried: MAX_WEEK53_YEAR_STEPS,
            });
        }
        let target_year = i64::from(iso_year) + i64::from(tried) * interval;
        let target_year = i16::try_from(target_year).map_err(|_| GenerateError::Overflow)?;
        for &week in &weeks {
            if let Some(date) = candidate(target_year, week)? {
                trace!(year = target_year, week, "rolling BYWEEKNO to next year");
                return Ok(DateTime::from_parts(date, prev.time()));
            }
        }
    }
}

fn make_datetime(year: i16, month: i8, day: i8, time: Time) -> Result<DateTime, GenerateError> {
    Date::new(year, month, day)
        .map(|date| DateTime::from_parts(date, time))
        .map_err(|_| GenerateError::InvalidDate { year, month, day })
}

fn add_days(date: Date, days: i64) -> Result<Date, GenerateError> {
    let span = Span::new().try_days(days).map_err(|_| GenerateError::Overflow)?;
    date.checked_add(span).map_err(|_| GenerateError::Overflow)
}

fn add_weeks(date: Date, weeks: i64) -> Result<Date, GenerateError> {
    let span = Span::new().try_weeks(weeks).map_err(|_| GenerateError::Overflow)?;
    date.checked_add(span).map_err(|_| GenerateError::Overflow)
}

fn add_months(date: Date, months: i64) -> Result<Date, GenerateError> {
    let span = Span::new().try_months(months).map_err(|_| GenerateError::Overflow)?;
    date.checked_add(span).map_err(|_| GenerateError::Overflow)
}

fn add_years(date: Date, years: i64) -> Result<Date, GenerateError> {
    let span = Span::new().try_years(years).map_err(|_| GenerateError::Overflow)?;
    date.checked_add(span).map_err(|_| GenerateError::Overflow)
}
