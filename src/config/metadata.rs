//! Version and release date read from the bundled `application.properties`.

use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

const BUNDLED_PROPERTIES: &str = include_str!("../../resources/application.properties");

/// Format of `release.date`, e.g. `2013-05-12 14:30.07 (+0200)`.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M.%S (%z)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub version: String,
    /// `None` when the build left the placeholder in place.
    pub release_date: Option<DateTime<FixedOffset>>,
}

impl AppMetadata {
    pub fn bundled() -> Self {
        Self::from_properties(BUNDLED_PROPERTIES)
    }

    pub fn from_properties(text: &str) -> Self {
        let properties = parse_properties(text);
        let version = properties
            .get("version")
            .cloned()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        let release_date = properties
            .get("release.date")
            .and_then(|value| parse_release_date(value));

        Self {
            version,
            release_date,
        }
    }
}

/// Parses a release date, returning `None` for placeholders such as
/// `@RELEASE_DATE@` or any other malformed value.
pub fn parse_release_date(value: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_str(value.trim(), RELEASE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!("Unparseable release date {:?}: {}", value, e);
            None
        }
    }
}

/// Parses the subset of the Java properties format the resource uses:
/// `#`/`!` comments, `=`, `:` or whitespace separators, backslash escapes
/// and line continuations.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let mut logical = line.trim_start().to_string();
        if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
            continue;
        }
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        properties.insert(unescape(key), unescape(value));
    }

    properties
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix(|c| c == '=' || c == ':')
                    .unwrap_or(rest)
                    .trim_start();
                return (&line[..i], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
