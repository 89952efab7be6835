// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Pure calendar arithmetic backing the occurrence engine.
//!
//! Everything here is referentially transparent: leap years, month lengths,
//! negative day-of-month resolution, ISO-8601 week numbering, and the
//! WKST-aware week helpers that generalize week arithmetic to an arbitrary
//! configured start of week.

use jiff::civil::{Date, Weekday};

/// Returns true if `year` is a Gregorian leap year.
#[must_use]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month, or 0 if `month` is outside `1..=12`.
#[must_use]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Resolves a negative day-of-month (`-1` = last day) to its positive
/// calendar day in the given month.
///
/// Returns `None` if `day` is not negative or if its magnitude exceeds the
/// month's length (e.g. `-31` in April).
#[must_use]
pub fn resolve_negative_day(day: i8, year: i16, month: i8) -> Option<i8> {
    if day >= 0 {
        return None;
    }
    let dim = days_in_month(year, month);
    let resolved = dim + day + 1;
    (resolved >= 1).then_some(resolved)
}

/// Returns true if the year/month/day triple names a real calendar date.
#[must_use]
pub fn is_valid_date(year: i16, month: i8, day: i8) -> bool {
    Date::new(year, month, day).is_ok()
}

/// Resolves a BYMONTHDAY set against a specific month: negative entries are
/// resolved from the end, entries that do not exist in the month are dropped,
/// and the result is sorted and de-duplicated.
#[must_use]
pub fn valid_days_for_month(days: &[i8], year: i16, month: i8) -> Vec<i8> {
    let dim = days_in_month(year, month);
    let mut resolved: Vec<i8> = days
        .iter()
        .filter_map(|&d| {
            if d > 0 {
                (d <= dim).then_some(d)
            } else {
                resolve_negative_day(d, year, month)
            }
        })
        .collect();
    resolved.sort_unstable();
    resolved.dedup();
    resolved
}

/// ISO-8601 week number of the given date (week 1 contains the year's first
/// Thursday; the week may belong to the previous or next ISO year).
#[must_use]
pub fn iso_week_number(date: Date) -> i8 {
    date.iso_week_date().week()
}

/// Monday of the given ISO week, anchored on January 4th (which is always in
/// week 1).
///
/// Returns `None` if `week` is outside `1..=53` or the date falls outside the
/// supported calendar range. Week 53 of a year without one resolves to week 1
/// of the following ISO year; callers gate on [`year_has_week53`].
#[must_use]
pub fn first_date_of_week(year: i16, week: i8) -> Option<Date> {
    if !(1..=53).contains(&week) {
        return None;
    }
    let jan4 = Date::new(year, 1, 4).ok()?;
    let to_monday = i64::from(jan4.weekday().to_monday_zero_offset());
    let week1_monday = jan4
        .checked_sub(jiff::Span::new().try_days(to_monday).ok()?)
        .ok()?;
    let days = i64::from(week - 1) * 7;
    week1_monday
        .checked_add(jiff::Span::new().try_days(days).ok()?)
        .ok()
}

/// Returns true if the year has an ISO week 53: January 1st falls on a
/// Thursday, or on a Wednesday in a leap year.
#[must_use]
pub fn year_has_week53(year: i16) -> bool {
    match Date::new(year, 1, 1) {
        Ok(jan1) => match jan1.weekday() {
            Weekday::Thursday => true,
            Weekday::Wednesday => is_leap_year(year),
            _ => false,
        },
        Err(_) => false,
    }
}

/// Offset in days (`0..=6`) of `weekday` from the configured start of week.
#[must_use]
pub fn weekday_offset(weekday: Weekday, week_start: Weekday) -> i8 {
    (7 + weekday.to_monday_zero_offset() - week_start.to_monday_zero_offset()) % 7
}

/// First and last date of the week containing `date`, where weeks begin on
/// `week_start`.
///
/// Returns `None` only at the edges of the supported calendar range.
#[must_use]
pub fn week_boundaries(date: Date, week_start: Weekday) -> Option<(Date, Date)> {
    let offset = i64::from(weekday_offset(date.weekday(), week_start));
    let first = date
        .checked_sub(jiff::Span::new().try_days(offset).ok()?)
        .ok()?;
    let last = first
        .checked_add(jiff::Span::new().try_days(6).ok()?)
        .ok()?;
    Some((first, last))
}
