// SPDX-FileCopyrightText: 2026 rrulekit contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer for the RRULE `PARAM=VALUE;...` grammar.
//!
//! Splits a raw rule string into an ordered list of uppercased parameter
//! names and their raw values. Order is preserved so that downstream
//! per-parameter validation runs in input order and error messages are
//! reproducible. Any malformation aborts the whole parse.

use crate::error::ParseError;

/// A parameter name paired with its raw, still-unvalidated value.
pub(crate) type RawToken = (String, String);

/// Tokenizes `src` into `(NAME, raw value)` pairs.
///
/// Whitespace around the input, segments, names and values is normalized
/// away; empty segments (e.g. a trailing `;`) are skipped. Names are
/// uppercased for case-insensitive lookup. Each segment must contain exactly
/// one `=` with a non-empty name and value, and no parameter may repeat.
pub(crate) fn tokenize(src: &str) -> Result<Vec<RawToken>, ParseError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut tokens: Vec<RawToken> = Vec::new();
    for segment in src.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let malformed = || ParseError::MalformedSegment {
            segment: segment.to_owned(),
        };

        let (name, value) = segment.split_once('=').ok_or_else(malformed)?;
        if value.contains('=') {
            return Err(malformed());
        }
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            return Err(malformed());
        }

        let name = name.to_ascii_uppercase();
        if tokens.iter().any(|(n, _)| *n == name) {
            return Err(ParseError::DuplicateParameter { name });
        }
        tokens.push((name, value.to_owned()));
    }

    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(tokens)
}
