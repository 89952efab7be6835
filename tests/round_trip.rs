// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

use rrulekit::{InvalidValueKind, ParseError, RecurrenceRule, RuleError, ValidationError, parse};

#[test]
fn serializes_to_canonical_form() {
    let cases = [
        ("FREQ=DAILY", "FREQ=DAILY"),
        ("FREQ=DAILY;INTERVAL=1", "FREQ=DAILY"),
        (
            "freq=weekly;interval=2;byday=mo,we,fr;count=10",
            "FREQ=WEEKLY;INTERVAL=2;COUNT=10;BYDAY=MO,WE,FR",
        ),
        (
            "FREQ=MONTHLY;BYMONTHDAY=1,15,-1",
            "FREQ=MONTHLY;BYMONTHDAY=1,15,-1",
        ),
        ("FREQ=MONTHLY;BYDAY=+3SU,-1FR", "FREQ=MONTHLY;BYDAY=3SU,-1FR"),
        (
            "FREQ=YEARLY;BYMONTH=3,6,9;BYSETPOS=1;WKST=SU",
            "FREQ=YEARLY;BYMONTH=3,6,9;BYSETPOS=1;WKST=SU",
        ),
        ("FREQ=YEARLY;BYWEEKNO=1,53", "FREQ=YEARLY;BYWEEKNO=1,53"),
        (
            "FREQ=DAILY;UNTIL=20251231T235959Z",
            "FREQ=DAILY;UNTIL=20251231T235959Z",
        ),
        (" FREQ=DAILY ; COUNT=3 ;", "FREQ=DAILY;COUNT=3"),
    ];
    for (src, canonical) in cases {
        let rule = parse(src).unwrap();
        assert_eq!(rule.to_string(), canonical, "for {src}");
    }
}

#[test]
fn canonical_form_reparses_to_the_same_rule() {
    let sources = [
        "FREQ=DAILY",
        "FREQ=WEEKLY;INTERVAL=2;COUNT=10;BYDAY=MO,WE,FR",
        "FREQ=MONTHLY;BYMONTHDAY=1,15,-1",
        "FREQ=MONTHLY;BYDAY=2TU,-1FR;BYSETPOS=1,-1",
        "FREQ=YEARLY;BYMONTH=3,6,9;WKST=SU",
        "FREQ=YEARLY;BYWEEKNO=1,53",
        "FREQ=DAILY;UNTIL=20251231T235959Z",
        "FREQ=DAILY;COUNT=0",
    ];
    for src in sources {
        let rule = parse(src).unwrap();
        let reparsed: RecurrenceRule = rule.to_string().parse().unwrap();
        assert_eq!(reparsed, rule, "for {src}");
    }
}

#[test]
fn rejects_malformed_strings() {
    let cases = [
        ("", RuleError::Parse(ParseError::Empty)),
        (" ; ", RuleError::Parse(ParseError::Empty)),
        (
            "FREQ",
            RuleError::Parse(ParseError::MalformedSegment {
                segment: "FREQ".to_owned(),
            }),
        ),
        (
            "FREQ=DAILY=WEEKLY",
            RuleError::Parse(ParseError::MalformedSegment {
                segment: "FREQ=DAILY=WEEKLY".to_owned(),
            }),
        ),
        (
            "FREQ=DAILY;freq=WEEKLY",
            RuleError::Parse(ParseError::DuplicateParameter {
                name: "FREQ".to_owned(),
            }),
        ),
    ];
    for (src, expected) in cases {
        assert_eq!(parse(src).unwrap_err(), expected, "for {src:?}");
    }
}

#[test]
fn rejects_semantically_invalid_rules() {
    let cases = [
        ("COUNT=3", ValidationError::MissingFrequency),
        (
            "FREQ=DAILY;COUNT=3;UNTIL=20251231T235959Z",
            ValidationError::CountUntilExclusive,
        ),
        (
            "FREQ=MONTHLY;BYSETPOS=-1",
            ValidationError::SetPosWithoutDependency,
        ),
        (
            "FREQ=DAILY;BYMINUTE=5",
            ValidationError::UnsupportedParameter {
                name: "BYMINUTE".to_owned(),
            },
        ),
    ];
    for (src, expected) in cases {
        assert_eq!(
            parse(src).unwrap_err(),
            RuleError::Validation(expected),
            "for {src}"
        );
    }
}

#[test]
fn rejects_invalid_parameter_values() {
    // (source, parameter, kind)
    let cases = [
        ("FREQ=SECONDLY", "FREQ", InvalidValueKind::UnknownChoice),
        ("FREQ=DAILY;INTERVAL=0", "INTERVAL", InvalidValueKind::Zero),
        (
            "FREQ=DAILY;INTERVAL=two",
            "INTERVAL",
            InvalidValueKind::NotAnInteger,
        ),
        (
            "FREQ=MONTHLY;BYMONTHDAY=32",
            "BYMONTHDAY",
            InvalidValueKind::OutOfRange { min: -31, max: 31 },
        ),
        (
            "FREQ=YEARLY;BYMONTH=13",
            "BYMONTH",
            InvalidValueKind::OutOfRange { min: 1, max: 12 },
        ),
        (
            "FREQ=YEARLY;BYWEEKNO=-1",
            "BYWEEKNO",
            InvalidValueKind::OutOfRange { min: 1, max: 53 },
        ),
        (
            "FREQ=WEEKLY;BYDAY=XX",
            "BYDAY",
            InvalidValueKind::UnknownChoice,
        ),
        (
            "FREQ=WEEKLY;BYDAY=MO,,FR",
            "BYDAY",
            InvalidValueKind::Empty,
        ),
        (
            "FREQ=DAILY;UNTIL=2025-12-31T23:59:59Z",
            "UNTIL",
            InvalidValueKind::MalformedDateTime,
        ),
        (
            "FREQ=DAILY;UNTIL=20250230T000000Z",
            "UNTIL",
            InvalidValueKind::MalformedDateTime,
        ),
        ("FREQ=WEEKLY;WKST=XX", "WKST", InvalidValueKind::UnknownChoice),
    ];
    for (src, parameter, kind) in cases {
        match parse(src).unwrap_err() {
            RuleError::Validation(ValidationError::InvalidValue {
                parameter: got_parameter,
                kind: got_kind,
                ..
            }) => {
                assert_eq!(got_parameter, parameter, "for {src}");
                assert_eq!(got_kind, kind, "for {src}");
            }
            other => panic!("expected InvalidValue for {src}, got {other:?}"),
        }
    }
}
