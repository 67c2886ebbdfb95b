use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

use crate::errors::{ToolError, ValidationReason};

const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Converts a user supplied timestamp to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Timestamps without an offset are read as wall-clock time in `zone`. Inputs
/// that already carry an offset (`Z`, `+01:00`, `+0100`, `+01`) keep it.
pub fn normalize_to_utc(input: &str, zone: Tz) -> Result<String, ToolError> {
    let utc = parse_instant(input, zone)
        .ok_or_else(|| ToolError::Validation(ValidationReason::UnparseableDate))?;
    Ok(utc.format(UTC_FORMAT).to_string())
}

fn parse_instant(input: &str, zone: Tz) -> Option<DateTime<Utc>> {
    let s = canonicalize(input);

    // chrono reads second 60 as a leap second; the API only takes 00-59.
    if let Some(zoned) = parse_zoned(&s) {
        if zoned.nanosecond() >= 1_000_000_000 {
            return None;
        }
        return Some(zoned.with_timezone(&Utc));
    }

    let naive = parse_naive(&s)?;
    if naive.nanosecond() >= 1_000_000_000 {
        return None;
    }
    resolve_local(naive, zone)
}

/// Accepts a space as date/time separator, a trailing `Z` as UTC, an hour-only
/// time (`T10`) and an hour-only offset (`+01`).
fn canonicalize(input: &str) -> String {
    let mut s = input.trim().to_string();
    if s.len() > 10 && s.is_char_boundary(10) && s.is_char_boundary(11) && &s[10..11] == " " {
        s.replace_range(10..11, "T");
    }
    if let Some(stripped) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        s = format!("{stripped}+00:00");
    }

    let Some((date, rest)) = s.split_once('T') else {
        return s;
    };
    let (time, offset) = match rest.find(|c| c == '+' || c == '-') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };

    let all_digits = |v: &str| v.bytes().all(|b| b.is_ascii_digit());
    let time = if time.len() == 2 && all_digits(time) {
        format!("{time}:00")
    } else {
        time.to_string()
    };
    let offset = if offset.len() == 3 && all_digits(&offset[1..]) {
        format!("{offset}:00")
    } else {
        offset.to_string()
    };

    format!("{date}T{time}{offset}")
}

fn parse_zoned(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Ambiguous wall-clock times take the earlier instant. Times skipped by a
/// forward transition use the offset that was in force just before it.
fn resolve_local(naive: NaiveDateTime, zone: Tz) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let offset = (1..=48).find_map(|h| {
                zone.offset_from_local_datetime(&(naive - Duration::hours(h)))
                    .earliest()
            })?;
            let shift = Duration::seconds(i64::from(offset.fix().local_minus_utc()));
            Some(Utc.from_utc_datetime(&(naive - shift)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America, Europe};

    #[test]
    fn test_naive_input_in_winter() {
        let utc = normalize_to_utc("2025-12-01T10:00:00", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T09:00:00Z");
    }

    #[test]
    fn test_naive_input_in_summer() {
        let utc = normalize_to_utc("2025-07-15T10:00:00", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-07-15T08:00:00Z");
    }

    #[test]
    fn test_space_separator() {
        let utc = normalize_to_utc("2025-12-01 10:00:00", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T09:00:00Z");
    }

    #[test]
    fn test_without_seconds() {
        let utc = normalize_to_utc("2025-12-01T10:30", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T09:30:00Z");
    }

    #[test]
    fn test_fractional_seconds_truncated() {
        let utc = normalize_to_utc("2025-12-01T10:00:05.750", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T09:00:05Z");
    }

    #[test]
    fn test_date_only_is_local_midnight() {
        let utc = normalize_to_utc("2025-12-01", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-11-30T23:00:00Z");
    }

    #[test]
    fn test_explicit_offset_kept() {
        let utc = normalize_to_utc("2025-12-01T10:00:00-05:00", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T15:00:00Z");

        let utc = normalize_to_utc("2025-12-01T10:00:00+0530", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T04:30:00Z");
    }

    #[test]
    fn test_zulu_suffix_is_utc() {
        let utc = normalize_to_utc("2025-12-01T10:00:00Z", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T10:00:00Z");

        let utc = normalize_to_utc("2025-12-01 10:00Z", America::New_York).unwrap();
        assert_eq!(utc, "2025-12-01T10:00:00Z");
    }

    #[test]
    fn test_hour_only_time_and_offset() {
        let utc = normalize_to_utc("2025-12-01T10", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T09:00:00Z");

        let utc = normalize_to_utc("2025-12-01T10:00:00+01", America::New_York).unwrap();
        assert_eq!(utc, "2025-12-01T09:00:00Z");

        let utc = normalize_to_utc("2025-12-01 10-03", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-12-01T13:00:00Z");
    }

    #[test]
    fn test_reference_zone_matters() {
        let utc = normalize_to_utc("2025-12-01T10:00:00", America::New_York).unwrap();
        assert_eq!(utc, "2025-12-01T15:00:00Z");
    }

    #[test]
    fn test_ambiguous_time_takes_earlier_instant() {
        // Rome falls back from 03:00 CEST to 02:00 CET on 2025-10-26.
        let utc = normalize_to_utc("2025-10-26T02:30:00", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-10-26T00:30:00Z");
    }

    #[test]
    fn test_skipped_time_uses_previous_offset() {
        // Rome jumps from 02:00 CET to 03:00 CEST on 2025-03-30.
        let utc = normalize_to_utc("2025-03-30T02:30:00", Europe::Rome).unwrap();
        assert_eq!(utc, "2025-03-30T01:30:00Z");
    }

    #[test]
    fn test_unparseable_dates() {
        for input in [
            "",
            "tomorrow at 10",
            "2025-13-01T10:00:00",
            "2025-02-30",
            "01/12/2025 10:00",
            "2025-12-31T23:59:60",
            "2025-12-31T23:59:60+01:00",
            "2025-12-31T23:59:60Z",
        ] {
            let err = normalize_to_utc(input, Europe::Rome).unwrap_err();
            assert_eq!(err, ToolError::Validation(ValidationReason::UnparseableDate));
        }
    }
}
