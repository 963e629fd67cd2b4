//! Wall-clock time handling for event export.
//!
//! Events carry start/end as the literal strings the user supplied. Two
//! families of helpers live here and must not be mixed up:
//!
//! - **Instant conversion** ([`to_utc`], [`utc_stamp`]): used by the ICS
//!   encoder and the Google render link. The string is resolved to a real
//!   instant and re-expressed in UTC.
//! - **Wall-clock passthrough** ([`char_prefix`], [`naive_wall_clock`]): used by
//!   the provider mappers and the Outlook link. The digits are kept as typed
//!   and the timezone travels separately.
//!
//! # Naive strings
//!
//! A string without an offset (`2025-06-01T15:00:00`) is interpreted in the
//! event's IANA zone when that zone is known, otherwise as UTC. An ambiguous
//! local time (DST fold) resolves to the earlier instant; a nonexistent one
//! (DST gap) has no instant and callers fall back to a textual transform.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// `YYYYMMDDTHHMMSSZ`, the RFC 5545 UTC form.
pub const UTC_STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// `YYYY-MM-DDTHH:mm:ss` without an offset.
pub const NAIVE_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Naive layouts accepted, most specific first.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts with a numeric offset, most specific first.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

/// Returns the first `n` characters of `value` without splitting a character.
pub fn char_prefix(value: &str, n: usize) -> &str {
    match value.char_indices().nth(n) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Formats an instant as `YYYYMMDDTHHMMSSZ`.
pub fn format_utc_stamp(dt: DateTime<Utc>) -> String {
    dt.format(UTC_STAMP_FORMAT).to_string()
}

/// Parses a naive date-time in one of the accepted layouts.
///
/// A bare `YYYY-MM-DD` yields midnight.
fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Resolves a wall-clock string to a UTC instant.
///
/// Strings with an explicit offset (`Z`, `+02:00`) are converted directly.
/// Naive strings are placed in `timezone` when it names a known IANA zone,
/// otherwise they are taken as UTC.
///
/// Returns `None` when the string cannot be parsed or names a local time
/// that does not exist in the zone.
pub fn to_utc(value: &str, timezone: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(stem) = value.strip_suffix(['Z', 'z']) {
        return parse_naive(stem).map(|naive| Utc.from_utc_datetime(&naive));
    }

    let naive = parse_naive(value)?;
    match timezone.and_then(|tz| tz.trim().parse::<Tz>().ok()) {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}

/// Best-effort textual stand-in for an unparsable timed value.
///
/// Separators are stripped, fractional seconds and any offset dropped,
/// missing seconds padded and a trailing `Z` ensured, so
/// `2025-13-45T10:00:00.5` becomes `20251345T100000Z` and
/// `2025-13-45T10:00+02:00` becomes `20251345T100000Z`.
pub fn fallback_stamp(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 3);
    let mut in_fraction = false;
    let mut time_digits: Option<usize> = None;
    for c in value.trim().chars() {
        if in_fraction {
            if c.is_ascii_digit() {
                continue;
            }
            in_fraction = false;
        }
        match c {
            '+' | 'Z' => break,
            '-' if time_digits.is_some() => break,
            '-' | ':' | ' ' => {}
            '.' => in_fraction = true,
            'T' => {
                time_digits = Some(0);
                out.push('T');
            }
            _ => {
                if c.is_ascii_digit() {
                    time_digits = time_digits.map(|n| n + 1);
                }
                out.push(c);
            }
        }
    }
    if time_digits == Some(4) {
        out.push_str("00");
    }
    out.push('Z');
    out
}

/// Returns the UTC stamp for a timed value, falling back to [`fallback_stamp`].
pub fn utc_stamp(value: &str, timezone: Option<&str>) -> String {
    match to_utc(value, timezone) {
        Some(dt) => format_utc_stamp(dt),
        None => {
            warn!(value, "unparsable date-time, using textual fallback");
            fallback_stamp(value)
        }
    }
}

/// Returns the `YYYYMMDD` digits of an all-day value without conversion.
///
/// Only the first ten characters are considered, so a trailing time or
/// offset never shifts the date.
pub fn date_digits(value: &str) -> String {
    let value = value.trim();
    let digits: String = char_prefix(value, 10)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.len() == 8 {
        return digits;
    }

    warn!(value, "unparsable date, using textual fallback");
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, '-' | '/' | ':' | ' '))
        .collect();
    char_prefix(&stripped, 8).to_string()
}

/// Returns the wall-clock digits of a value as a naive date-time.
///
/// Any offset is ignored: `2025-06-01T15:00:00Z` and
/// `2025-06-01T15:00:00+09:00` both read as 15:00.
pub fn naive_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    [19, 16, 10]
        .into_iter()
        .find_map(|n| parse_naive(char_prefix(value, n)))
}

/// Formats the wall-clock digits of a value as `YYYY-MM-DDTHH:mm:ss`.
///
/// Falls back to the first 19 characters when the value cannot be parsed.
pub fn naive_local_string(value: &str) -> String {
    match naive_wall_clock(value) {
        Some(dt) => dt.format(NAIVE_LOCAL_FORMAT).to_string(),
        None => {
            warn!(value, "unparsable date-time, passing through");
            char_prefix(value.trim(), 19).to_string()
        }
    }
}
