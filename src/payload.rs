//! # Payload Encoding
//!
//! Builds the `*`-delimited payload string that ends up in the QR code:
//!
//! ```text
//! BON*OPERATOR*YYYY-MM-DD*HH:MM:SS*AMOUNT
//! 123*456*2024-01-06*00:03:00*12.50
//! ```
//!
//! The timestamp is the caller's "now" shifted by a minute offset and
//! formatted in the caller's time zone. Codes are embedded verbatim; a code
//! containing `*` produces extra fields.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone};
use std::fmt::Display;

/// Field delimiter.
pub const DELIMITER: &str = "*";

/// Encode a payload.
///
/// Pure: the same inputs always give the same string. Callers reject empty
/// `bon`/`operator` before getting here.
///
/// ```
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 5, 23, 58, 0).unwrap();
/// let payload = bonqr::payload::encode("123", "456", &now, 5, "12.5");
/// assert_eq!(payload, "123*456*2024-01-06*00:03:00*12.50");
/// ```
pub fn encode<Tz>(
    bon: &str,
    operator: &str,
    now: &DateTime<Tz>,
    offset_minutes: i32,
    amount_raw: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let at = shift(now, offset_minutes);
    [
        bon.to_string(),
        operator.to_string(),
        format_date(&at),
        format_time(&at),
        format_amount(amount_raw),
    ]
    .join(DELIMITER)
}

/// Years that still format as a four-digit `YYYY`.
const FORMATTABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Apply the minute offset.
///
/// An offset that would leave [`FORMATTABLE_YEARS`] is dropped and `now` is
/// used as is.
fn shift<Tz: TimeZone>(now: &DateTime<Tz>, offset_minutes: i32) -> DateTime<Tz> {
    now.clone()
        .checked_add_signed(TimeDelta::minutes(i64::from(offset_minutes)))
        .filter(|at| FORMATTABLE_YEARS.contains(&at.year()))
        .unwrap_or_else(|| now.clone())
}

/// `YYYY-MM-DD`
pub fn format_date<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%Y-%m-%d").to_string()
}

/// `HH:MM:SS`, 24-hour
pub fn format_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%H:%M:%S").to_string()
}

/// Two-decimal amount; anything unparsable, infinite or not positive is `0.00`.
pub fn format_amount(raw: &str) -> String {
    let value = parse_amount(raw);
    if value.is_finite() && value > 0.0 {
        format!("{:.2}", value)
    } else {
        "0.00".to_string()
    }
}

/// Lenient decimal parse: leading whitespace is skipped and the longest
/// numeric prefix is used (`"12.5 EUR"` → `12.5`). No numeric prefix → `0`.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(bytes, exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Lenient integer parse: the longest leading base-10 integer, saturated
/// to `i32`. No integer prefix → `0`.
pub fn parse_offset(raw: &str) -> i32 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = skip_digits(bytes, start);

    if end == start {
        return 0;
    }

    match s[..end].parse::<i64>() {
        Ok(v) => v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        Err(_) if negative => i32::MIN,
        Err(_) => i32::MAX,
    }
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn is_amount(field: &str) -> bool {
        let Some((int, frac)) = field.split_once('.') else {
            return false;
        };
        !int.is_empty()
            && int.bytes().all(|b| b.is_ascii_digit())
            && frac.len() == 2
            && frac.bytes().all(|b| b.is_ascii_digit())
    }

    #[test]
    fn test_encode_example() {
        let payload = encode("123", "456", &at(2024, 1, 5, 23, 58, 0), 5, "12.5");
        assert_eq!(payload, "123*456*2024-01-06*00:03:00*12.50");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let now = at(2025, 6, 30, 12, 0, 7);
        let a = encode("B", "O", &now, -90, "3");
        let b = encode("B", "O", &now, -90, "3");
        assert_eq!(a, b);
        assert_eq!(a, "B*O*2025-06-30*10:30:07*3.00");
    }

    #[test]
    fn test_offset_past_four_digit_years_is_dropped() {
        let now = at(2024, 1, 5, 23, 58, 0);
        assert_eq!(
            encode("a", "b", &now, i32::MIN, "1"),
            "a*b*2024-01-05*23:58:00*1.00"
        );
        assert_eq!(
            encode("a", "b", &now, i32::MAX, "1"),
            "a*b*2024-01-05*23:58:00*1.00"
        );
        assert_eq!(
            encode("a", "b", &now, -1_000_000_000, ""),
            "a*b*0122-09-09*13:18:00*0.00"
        );
    }

    #[test]
    fn test_negative_offset_crosses_month_and_year() {
        let payload = encode("1", "2", &at(2024, 1, 1, 0, 4, 0), -5, "");
        assert_eq!(payload, "1*2*2023-12-31*23:59:00*0.00");
    }

    #[test]
    fn test_offset_crosses_leap_day() {
        let payload = encode("1", "2", &at(2024, 2, 28, 23, 30, 0), 60, "1");
        assert_eq!(payload, "1*2*2024-02-29*00:30:00*1.00");
    }

    #[test]
    fn test_formats_in_callers_time_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = at(2024, 3, 9, 23, 0, 0).with_timezone(&tz);
        let payload = encode("1", "2", &now, 0, "1");
        assert_eq!(payload, "1*2*2024-03-10*01:00:00*1.00");
    }

    #[test]
    fn test_five_fields() {
        let now = at(2024, 5, 1, 8, 9, 10);
        for amount in ["", "abc", "1", "1e3", "-4", "0.005", "12.345"] {
            let payload = encode("BON", "OP", &now, 0, amount);
            let fields: Vec<_> = payload.split(DELIMITER).collect();
            assert_eq!(fields.len(), 5, "payload {payload}");
            assert!(is_amount(fields[4]), "amount field {}", fields[4]);
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("12.5"), "12.50");
        assert_eq!(format_amount("7"), "7.00");
        assert_eq!(format_amount(" 3.999"), "4.00");
        assert_eq!(format_amount("12.5 EUR"), "12.50");
        assert_eq!(format_amount(""), "0.00");
        assert_eq!(format_amount("NaN"), "0.00");
        assert_eq!(format_amount("Infinity"), "0.00");
        assert_eq!(format_amount("1e400"), "0.00");
        assert_eq!(format_amount("-2"), "0.00");
        assert_eq!(format_amount("-0"), "0.00");
        assert_eq!(format_amount(".5"), "0.50");
        assert_eq!(format_amount("2.5e1"), "25.00");
    }

    #[test]
    fn test_parse_amount_prefixes() {
        assert_eq!(parse_amount("5."), 5.0);
        assert_eq!(parse_amount("+1.5x"), 1.5);
        assert_eq!(parse_amount("1e"), 1.0);
        assert_eq!(parse_amount("1e+"), 1.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("15"), 15);
        assert_eq!(parse_offset(" -30"), -30);
        assert_eq!(parse_offset("+5min"), 5);
        assert_eq!(parse_offset("2.9"), 2);
        assert_eq!(parse_offset(""), 0);
        assert_eq!(parse_offset("abc"), 0);
        assert_eq!(parse_offset("99999999999"), i32::MAX);
        assert_eq!(parse_offset("-99999999999999999999999"), i32::MIN);
    }
}
