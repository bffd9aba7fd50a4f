use std::fmt;

use chrono::{DateTime, Local, Locale, TimeZone};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Largest distance from the epoch a JavaScript `Date` can represent.
pub const MAX_TIMESTAMP_MS: i64 = 8_640_000_000_000_000;

/// Human-readable byte count using base-1024 units.
///
/// At most two decimals are kept and trailing zeros are dropped, so
/// `1536` becomes `"1.5 KB"`. Sizes past the gigabyte range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes / divisor >= 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / divisor as f64;
    format!("{} {}", trim_decimals(&format!("{:.2}", value)), SIZE_UNITS[unit])
}

fn trim_decimals(fixed: &str) -> &str {
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed
    }
}

/// Local date and time for a Unix timestamp in milliseconds, using the
/// date and time layouts of `locale`.
pub fn format_timestamp(millis: i64, locale: Locale) -> String {
    format_timestamp_in(millis, &Local, locale)
}

pub fn format_timestamp_in<Tz>(millis: i64, tz: &Tz, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if millis.unsigned_abs() > MAX_TIMESTAMP_MS.unsigned_abs() {
        return "Invalid Date".to_string();
    }
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc
            .with_timezone(tz)
            .format_localized("%x, %X", locale)
            .to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Map a BCP 47 language tag (`navigator.language`) to a formatting locale.
///
/// A bare language such as `de` picks its main region; anything unknown
/// falls back to POSIX.
pub fn locale_from_tag(tag: &str) -> Locale {
    let tag = tag.trim().replace('-', "_");
    if let Ok(locale) = Locale::try_from(tag.as_str()) {
        return locale;
    }
    let language = tag.split('_').next().unwrap_or_default().to_lowercase();
    let region = match language.as_str() {
        "en" => "US".to_string(),
        other => other.to_uppercase(),
    };
    Locale::try_from(format!("{}_{}", language, region).as_str()).unwrap_or(Locale::POSIX)
}
