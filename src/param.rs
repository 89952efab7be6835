// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! One validated node per RRULE parameter.
//!
//! Each variant owns the construction-time validation for exactly one
//! parameter and never escapes in a partially validated state. The
//! name-to-node mapping is a single exhaustive match over the keyword
//! constants, so an unsupported parameter is caught at the dispatch point.

use jiff::civil::{Date, DateTime, Time};

use crate::error::{InvalidValueKind, ValidationError};
use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO,
    KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::rule::{ByDay, Frequency, Weekday};

/// A single parsed and validated RRULE parameter.
#[derive(Debug, Clone)]
pub(crate) enum ParamNode {
    Frequency(Frequency),
    Interval(u32),
    Count(u32),
    Until(DateTime),
    ByDay(Vec<ByDay>),
    ByMonthDay(Vec<i8>),
    ByMonth(Vec<i8>),
    ByWeekNo(Vec<i8>),
    BySetPos(Vec<i16>),
    WeekStart(Weekday),
}

impl ParamNode {
    /// Dispatches an uppercased parameter name to its validating
    /// constructor.
    pub(crate) fn parse(name: &str, raw: &str) -> Result<Self, ValidationError> {
        match name {
            KW_RRULE_FREQ => frequency(raw).map(Self::Frequency),
            KW_RRULE_INTERVAL => interval(raw).map(Self::Interval),
            KW_RRULE_COUNT => count(raw).map(Self::Count),
            KW_RRULE_UNTIL => until(raw).map(Self::Until),
            KW_RRULE_BYDAY => by_day(raw).map(Self::ByDay),
            KW_RRULE_BYMONTHDAY => by_month_day(raw).map(Self::ByMonthDay),
            KW_RRULE_BYMONTH => by_month(raw).map(Self::ByMonth),
            KW_RRULE_BYWEEKNO => by_week_no(raw).map(Self::ByWeekNo),
            KW_RRULE_BYSETPOS => by_set_pos(raw).map(Self::BySetPos),
            KW_RRULE_WKST => week_start(raw).map(Self::WeekStart),
            _ => Err(ValidationError::UnsupportedParameter {
                name: name.to_owned(),
            }),
        }
    }
}

fn invalid(parameter: &'static str, value: &str, kind: InvalidValueKind) -> ValidationError {
    ValidationError::InvalidValue {
        parameter,
        value: value.to_owned(),
        kind,
    }
}

/// Parses an integer after an optional explicit `+` sign. Rejects anything
/// that is not a plain integer (decimal points included).
fn parse_integer<T: lexical::FromLexical>(
    parameter: &'static str,
    raw: &str,
) -> Result<T, ValidationError> {
    if raw.is_empty() {
        return Err(invalid(parameter, raw, InvalidValueKind::Empty));
    }
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if digits.is_empty() {
        return Err(invalid(parameter, raw, InvalidValueKind::NotAnInteger));
    }
    lexical::parse(digits).map_err(|_| invalid(parameter, raw, InvalidValueKind::NotAnInteger))
}

/// Splits a comma-separated list and validates each trimmed element.
fn parse_list<T>(
    parameter: &'static str,
    raw: &str,
    element: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    if raw.trim().is_empty() {
        return Err(invalid(parameter, raw, InvalidValueKind::Empty));
    }
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Err(invalid(parameter, raw, InvalidValueKind::Empty))
            } else {
                element(item)
            }
        })
        .collect()
}

fn ranged_element(
    parameter: &'static str,
    min: i32,
    max: i32,
    allow_zero: bool,
) -> impl Fn(&str) -> Result<i32, ValidationError> {
    move |item| {
        let n: i32 = parse_integer(parameter, item)?;
        if n == 0 && !allow_zero {
            return Err(invalid(parameter, item, InvalidValueKind::Zero));
        }
        if n < min || n > max {
            return Err(invalid(parameter, item, InvalidValueKind::OutOfRange { min, max }));
        }
        Ok(n)
    }
}

/// Keyword values are case-insensitive, per RFC 5545.
fn frequency(raw: &str) -> Result<Frequency, ValidationError> {
    Frequency::from_code(&raw.to_ascii_uppercase())
        .ok_or_else(|| invalid(KW_RRULE_FREQ, raw, InvalidValueKind::UnknownChoice))
}

fn interval(raw: &str) -> Result<u32, ValidationError> {
    let value: u32 = parse_integer(KW_RRULE_INTERVAL, raw)?;
    if value == 0 {
        return Err(invalid(KW_RRULE_INTERVAL, raw, InvalidValueKind::Zero));
    }
    Ok(value)
}

/// COUNT=0 is accepted: it is a degenerate rule the engine expands to an
/// empty sequence.
fn count(raw: &str) -> Result<u32, ValidationError> {
    parse_integer(KW_RRULE_COUNT, raw)
}

/// Strict `YYYYMMDDTHHMMSSZ` (UTC only); any deviation is rejected with the
/// offending raw string.
fn until(raw: &str) -> Result<DateTime, ValidationError> {
    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 16
        && bytes.get(8) == Some(&b'T')
        && bytes.get(15) == Some(&b'Z')
        && bytes.iter().take(8).all(u8::is_ascii_digit)
        && bytes.iter().skip(9).take(6).all(u8::is_ascii_digit);
    if !shape_ok {
        return Err(invalid(KW_RRULE_UNTIL, raw, InvalidValueKind::MalformedDateTime));
    }

    let field = |start: usize, len: usize| -> Result<i16, ValidationError> {
        bytes
            .get(start..start + len)
            .and_then(|digits| lexical::parse::<i16, _>(digits).ok())
            .ok_or_else(|| invalid(KW_RRULE_UNTIL, raw, InvalidValueKind::MalformedDateTime))
    };

    let year = field(0, 4)?;
    let month = field(4, 2)? as i8;
    let day = field(6, 2)? as i8;
    let hour = field(9, 2)? as i8;
    let minute = field(11, 2)? as i8;
    let second = field(13, 2)? as i8;

    let date = Date::new(year, month, day)
        .map_err(|_| invalid(KW_RRULE_UNTIL, raw, InvalidValueKind::MalformedDateTime))?;
    let time = Time::new(hour, minute, second, 0)
        .map_err(|_| invalid(KW_RRULE_UNTIL, raw, InvalidValueKind::MalformedDateTime))?;
    Ok(DateTime::from_parts(date, time))
}

/// `[(+|-)?ordinal]weekday`, e.g. `MO`, `2TU`, `-1FR`.
fn by_day(raw: &str) -> Result<Vec<ByDay>, ValidationError> {
    parse_list(KW_RRULE_BYDAY, raw, |item| {
        if !item.is_ascii() || item.len() < 2 {
            return Err(invalid(KW_RRULE_BYDAY, item, InvalidValueKind::UnknownChoice));
        }
        let (ordinal_part, day_part) = item.split_at(item.len() - 2);
        let weekday = Weekday::from_code(&day_part.to_ascii_uppercase())
            .ok_or_else(|| invalid(KW_RRULE_BYDAY, item, InvalidValueKind::UnknownChoice))?;
        let ordinal = if ordinal_part.is_empty() {
            None
        } else {
            let n = ranged_element(KW_RRULE_BYDAY, -53, 53, false)(ordinal_part)?;
            Some(n as i8)
        };
        Ok(ByDay { ordinal, weekday })
    })
}

fn by_month_day(raw: &str) -> Result<Vec<i8>, ValidationError> {
    parse_list(KW_RRULE_BYMONTHDAY, raw, |item| {
        ranged_element(KW_RRULE_BYMONTHDAY, -31, 31, false)(item).map(|n| n as i8)
    })
}

/// RFC 5545 permits only positive month numbers.
fn by_month(raw: &str) -> Result<Vec<i8>, ValidationError> {
    parse_list(KW_RRULE_BYMONTH, raw, |item| {
        ranged_element(KW_RRULE_BYMONTH, 1, 12, false)(item).map(|n| n as i8)
    })
}

/// Positive week numbers only; the negative "from the end of the year" form
/// is deliberately not part of the validated grammar.
fn by_week_no(raw: &str) -> Result<Vec<i8>, ValidationError> {
    parse_list(KW_RRULE_BYWEEKNO, raw, |item| {
        ranged_element(KW_RRULE_BYWEEKNO, 1, 53, false)(item).map(|n| n as i8)
    })
}

fn by_set_pos(raw: &str) -> Result<Vec<i16>, ValidationError> {
    parse_list(KW_RRULE_BYSETPOS, raw, |item| {
        ranged_element(KW_RRULE_BYSETPOS, -366, 366, false)(item).map(|n| n as i16)
    })
}

fn week_start(raw: &str) -> Result<Weekday, ValidationError> {
    Weekday::from_code(&raw.to_ascii_uppercase())
        .ok_or_else(|| invalid(KW_RRULE_WKST, raw, InvalidValueKind::UnknownChoice))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(err: ValidationError) -> InvalidValueKind {
        match err {
            ValidationError::InvalidValue { kind, .. } => kind,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn parses_frequencies() {
        let cases = [
            ("DAILY", Frequency::Daily),
            ("WEEKLY", Frequency::Weekly),
            ("MONTHLY", Frequency::Monthly),
            ("YEARLY", Frequency::Yearly),
            // Values are case-insensitive
            ("daily", Frequency::Daily),
            ("Weekly", Frequency::Weekly),
        ];
        for (src, expected) in cases {
            match ParamNode::parse(KW_RRULE_FREQ, src).unwrap() {
                ParamNode::Frequency(freq) => assert_eq!(freq, expected, "for {src}"),
                other => panic!("unexpected node {other:?}"),
            }
        }
        let err = ParamNode::parse(KW_RRULE_FREQ, "HOURLY").unwrap_err();
        assert_eq!(kind_of(err), InvalidValueKind::UnknownChoice);
    }

    #[test]
    fn interval_must_be_positive_integer() {
        assert!(matches!(interval("1"), Ok(1)));
        assert!(matches!(interval("10"), Ok(10)));
        assert_eq!(kind_of(interval("0").unwrap_err()), InvalidValueKind::Zero);
        assert_eq!(
            kind_of(interval("2.5").unwrap_err()),
            InvalidValueKind::NotAnInteger
        );
        assert_eq!(
            kind_of(interval("-1").unwrap_err()),
            InvalidValueKind::NotAnInteger
        );
        assert_eq!(kind_of(interval("").unwrap_err()), InvalidValueKind::Empty);
    }

    #[test]
    fn count_zero_is_accepted() {
        assert!(matches!(count("0"), Ok(0)));
        assert!(matches!(count("10"), Ok(10)));
        assert_eq!(
            kind_of(count("ten").unwrap_err()),
            InvalidValueKind::NotAnInteger
        );
    }

    #[test]
    fn until_requires_strict_utc_shape() {
        let dt = until("20251231T235959Z").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 31);
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.second(), 59);

        let bad = [
            "20251231",            // date only
            "20251231T235959",     // missing Z
            "2025-12-31T23:59:59Z",
            "20251331T000000Z",    // month 13
            "20250230T000000Z",    // Feb 30
            "20251231T250000Z",    // hour 25
            "20251231t235959z",    // lowercase markers
        ];
        for src in bad {
            assert_eq!(
                kind_of(until(src).unwrap_err()),
                InvalidValueKind::MalformedDateTime,
                "should reject {src}"
            );
        }
    }

    #[test]
    fn by_day_specs() {
        let specs = by_day("MO,2TU,-1FR,+3SU").unwrap();
        assert_eq!(
            specs,
            vec![
                ByDay { ordinal: None, weekday: Weekday::Monday },
                ByDay { ordinal: Some(2), weekday: Weekday::Tuesday },
                ByDay { ordinal: Some(-1), weekday: Weekday::Friday },
                ByDay { ordinal: Some(3), weekday: Weekday::Sunday },
            ],
        );

        assert_eq!(kind_of(by_day("XX").unwrap_err()), InvalidValueKind::UnknownChoice);
        assert_eq!(kind_of(by_day("0MO").unwrap_err()), InvalidValueKind::Zero);
        assert_eq!(
            kind_of(by_day("54MO").unwrap_err()),
            InvalidValueKind::OutOfRange { min: -53, max: 53 }
        );
        assert_eq!(kind_of(by_day("MO,,FR").unwrap_err()), InvalidValueKind::Empty);
    }

    #[test]
    fn by_month_day_range() {
        assert_eq!(by_month_day("1,15,-1,+31").unwrap(), vec![1, 15, -1, 31]);
        assert_eq!(kind_of(by_month_day("0").unwrap_err()), InvalidValueKind::Zero);
        assert_eq!(
            kind_of(by_month_day("32").unwrap_err()),
            InvalidValueKind::OutOfRange { min: -31, max: 31 }
        );
        assert_eq!(
            kind_of(by_month_day("-32").unwrap_err()),
            InvalidValueKind::OutOfRange { min: -31, max: 31 }
        );
    }

    #[test]
    fn by_month_is_positive_only() {
        assert_eq!(by_month("1,6,12").unwrap(), vec![1, 6, 12]);
        assert_eq!(
            kind_of(by_month("-1").unwrap_err()),
            InvalidValueKind::OutOfRange { min: 1, max: 12 }
        );
        assert_eq!(
            kind_of(by_month("13").unwrap_err()),
            InvalidValueKind::OutOfRange { min: 1, max: 12 }
        );
    }

    #[test]
    fn by_week_no_rejects_negative_weeks() {
        assert_eq!(by_week_no("1,20,53").unwrap(), vec![1, 20, 53]);
        assert_eq!(
            kind_of(by_week_no("-1").unwrap_err()),
            InvalidValueKind::OutOfRange { min: 1, max: 53 }
        );
        assert_eq!(
            kind_of(by_week_no("54").unwrap_err()),
            InvalidValueKind::OutOfRange { min: 1, max: 53 }
        );
        assert_eq!(kind_of(by_week_no("0").unwrap_err()), InvalidValueKind::Zero);
    }

    #[test]
    fn by_set_pos_range() {
        assert_eq!(by_set_pos("1,-1,366,-366").unwrap(), vec![1, -1, 366, -366]);
        assert_eq!(kind_of(by_set_pos("0").unwrap_err()), InvalidValueKind::Zero);
        assert_eq!(
            kind_of(by_set_pos("367").unwrap_err()),
            InvalidValueKind::OutOfRange { min: -366, max: 366 }
        );
    }

    #[test]
    fn week_start_codes() {
        assert_eq!(week_start("SU").unwrap(), Weekday::Sunday);
        assert_eq!(week_start("SA").unwrap(), Weekday::Saturday);
        assert_eq!(week_start("su").unwrap(), Weekday::Sunday);
        assert_eq!(
            kind_of(week_start("MONDAY").unwrap_err()),
            InvalidValueKind::UnknownChoice
        );
    }

    #[test]
    fn unsupported_parameter_is_rejected() {
        let err = ParamNode::parse("BYHOUR", "9").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedParameter {
                name: "BYHOUR".to_owned()
            },
        );
    }
}
