//! Coercion of raw front-matter values into typed field values.
//!
//! Every function returns the "expected X, found Y" message on failure; the
//! caller attaches it to the field name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_yaml::Value;
use url::Url;

use crate::frontmatter::describe;

/// Date-only layouts, read as midnight UTC.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d %Y", "%b %d, %Y", "%B %d %Y", "%B %d, %Y"];

/// Naive datetime layouts accepted after RFC 3339 and RFC 2822. Read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

type Coerced<T> = std::result::Result<T, String>;

/// Accept a string only.
pub fn coerce_string(value: &Value) -> Coerced<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("expected string, found {}", describe(other))),
    }
}

/// Accept a boolean only.
pub fn coerce_bool(value: &Value) -> Coerced<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(format!("expected boolean, found {}", describe(other))),
    }
}

/// Accept a sequence of strings.
pub fn coerce_string_list(value: &Value) -> Coerced<Vec<String>> {
    let Value::Sequence(items) = value else {
        return Err(format!("expected list of strings, found {}", describe(value)));
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(format!(
                "expected list of strings, found {} at index {idx}",
                describe(other)
            )),
        })
        .collect()
}

/// Coerce a string or number into a UTC date.
///
/// Numbers are Unix epoch milliseconds.
pub fn coerce_date(value: &Value) -> Coerced<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s).ok_or_else(|| format!("expected a date, found {s:?}")),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64));
            millis
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| format!("expected a date, found out-of-range timestamp {n}"))
        }
        other => Err(format!("expected a date, found {}", describe(other))),
    }
}

/// Accept a string that parses as an absolute URL. The original text is kept.
pub fn coerce_url(value: &Value) -> Coerced<String> {
    let s = coerce_string(value)?;
    match Url::parse(&s) {
        Ok(_) => Ok(s),
        Err(e) => Err(format!("expected a valid URL, found {s:?} ({e})")),
    }
}

/// Accept a local image path token; remote references are refused.
pub fn coerce_image_token(value: &Value) -> Coerced<String> {
    let token = coerce_string(value)?;
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err("expected an image path, found empty string".to_string());
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Err(format!(
            "expected a local image path, found remote reference {trimmed:?}"
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse a date string in one of the accepted layouts.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(date) = NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone, Timelike};

    use super::*;

    fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_plain_date_is_midnight_utc() {
        let date = coerce_date(&string("2024-03-15")).expect("date");
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_rfc3339_with_offset_normalizes_to_utc() {
        let date = coerce_date(&string("2024-03-15T10:30:00+02:00")).expect("date");
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 9, 5, 0).unwrap();
        assert_eq!(parse_date("2024-03-15T09:05:00"), Some(expected));
        assert_eq!(parse_date("2024-03-15 09:05"), Some(expected));
    }

    #[test]
    fn test_month_name_dates() {
        let expected = Utc.with_ymd_and_hms(2022, 7, 8, 0, 0, 0).unwrap();
        assert_eq!(parse_date("Jul 08 2022"), Some(expected));
        assert_eq!(parse_date("July 8, 2022"), Some(expected));
    }

    #[test]
    fn test_rfc2822_date() {
        let date = parse_date("Fri, 15 Mar 2024 12:00:00 +0000").expect("date");
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_unparsable_date_fails() {
        let err = coerce_date(&string("not-a-date")).expect_err("should fail");
        assert!(err.contains("not-a-date"));
    }

    #[test]
    fn test_impossible_calendar_date_fails() {
        assert!(coerce_date(&string("2024-02-30")).is_err());
    }

    #[test]
    fn test_number_is_epoch_millis() {
        let date = coerce_date(&Value::Number(1_710_460_800_000_i64.into())).expect("date");
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_boolean_is_not_a_date() {
        let err = coerce_date(&Value::Bool(true)).expect_err("should fail");
        assert_eq!(err, "expected a date, found boolean");
    }

    #[test]
    fn test_string_rejects_number() {
        let err = coerce_string(&Value::Number(42.into())).expect_err("should fail");
        assert_eq!(err, "expected string, found number");
    }

    #[test]
    fn test_bool_is_verbatim() {
        assert_eq!(coerce_bool(&Value::Bool(true)), Ok(true));
        assert_eq!(coerce_bool(&Value::Bool(false)), Ok(false));
        assert!(coerce_bool(&string("true")).is_err());
    }

    #[test]
    fn test_string_list() {
        let list = Value::Sequence(vec![string("rust"), string("web")]);
        assert_eq!(
            coerce_string_list(&list),
            Ok(vec!["rust".to_string(), "web".to_string()])
        );

        let mixed = Value::Sequence(vec![string("rust"), Value::Number(1.into())]);
        let err = coerce_string_list(&mixed).expect_err("should fail");
        assert!(err.contains("index 1"));
    }

    #[test]
    fn test_url_kept_verbatim() {
        assert_eq!(
            coerce_url(&string("https://example.com/x")),
            Ok("https://example.com/x".to_string())
        );
        let err = coerce_url(&string("not a url")).expect_err("should fail");
        assert!(err.contains("expected a valid URL"));
    }

    #[test]
    fn test_image_token_rejects_remote() {
        assert_eq!(
            coerce_image_token(&string(" ./hero.png ")),
            Ok("./hero.png".to_string())
        );
        assert!(coerce_image_token(&string("https://cdn.example.com/a.png")).is_err());
        assert!(coerce_image_token(&string("")).is_err());
    }
}
