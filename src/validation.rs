//! Input validation for request payloads.
//!
//! Every check is a pure function over `serde_json::Value` so that malformed
//! input is reported with the exact field, index or date at fault instead of
//! a generic deserialisation failure. Nothing here coerces or drops input.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::models::FeedbackItem;
use crate::errors::{DateError, ValidationError};

static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex compile"));

/// Length in characters, which is how every configured limit is expressed.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Checks a single free-text input against `max_length`.
///
/// Missing values, non-strings and whitespace-only strings are all
/// `EmptyInput`; anything longer than `max_length` characters is `TooLong`.
pub fn validate_text(value: Option<&Value>, max_length: usize) -> Result<&str, ValidationError> {
    let text = value
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::EmptyInput)?;

    if char_len(text) > max_length {
        return Err(ValidationError::TooLong { max: max_length });
    }

    Ok(text)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn validate_date(raw: &str) -> Result<NaiveDate, DateError> {
    if !DATE_SHAPE_RE.is_match(raw) {
        return Err(DateError::InvalidDateFormat(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DateError::InvalidDateFormat(raw.to_string()))
}

/// Checks a flat list of feedback strings, failing on the first offending
/// element.
pub fn validate_feedback_list(value: Option<&Value>) -> Result<Vec<&str>, ValidationError> {
    let items = value
        .and_then(Value::as_array)
        .ok_or(ValidationError::NotAList)?;

    if items.is_empty() {
        return Err(ValidationError::EmptyList);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str()
                .ok_or(ValidationError::ElementNotString { index })
        })
        .collect()
}

/// Collects every field problem of one dated feedback record. An empty
/// result means the record is valid.
#[must_use]
pub fn validate_feedback_item(index: usize, item: &Value) -> Vec<ValidationError> {
    let Some(fields) = item.as_object() else {
        return vec![ValidationError::ElementNotObject { index }];
    };

    let mut errors = Vec::new();

    match fields.get("text") {
        None => errors.push(ValidationError::ElementMissingField {
            index,
            field: "text",
        }),
        Some(text) if !text.as_str().is_some_and(|t| !t.trim().is_empty()) => {
            errors.push(ValidationError::ElementEmptyText { index });
        }
        Some(_) => {}
    }

    match fields.get("date") {
        None => errors.push(ValidationError::ElementMissingField {
            index,
            field: "date",
        }),
        Some(date) => {
            let valid = date.as_str().is_some_and(|d| validate_date(d).is_ok());
            if !valid {
                errors.push(ValidationError::ElementInvalidDate { index });
            }
        }
    }

    errors
}

/// Turns one dated record into a `FeedbackItem`, stopping at its first
/// problem. Checks run in the same order as `validate_feedback_item`, so the
/// error returned is the first one that function would collect.
pub fn parse_feedback_item(index: usize, item: &Value) -> Result<FeedbackItem, ValidationError> {
    let fields = item
        .as_object()
        .ok_or(ValidationError::ElementNotObject { index })?;

    let text = fields
        .get("text")
        .ok_or(ValidationError::ElementMissingField {
            index,
            field: "text",
        })?
        .as_str()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::ElementEmptyText { index })?;

    let date = fields
        .get("date")
        .ok_or(ValidationError::ElementMissingField {
            index,
            field: "date",
        })?
        .as_str()
        .and_then(|d| validate_date(d).ok())
        .ok_or(ValidationError::ElementInvalidDate { index })?;

    Ok(FeedbackItem {
        text: text.to_string(),
        date,
    })
}

/// Parses a whole list of dated records; the first invalid record fails the
/// request.
pub fn parse_feedback_records(value: Option<&Value>) -> Result<Vec<FeedbackItem>, ValidationError> {
    let items = value
        .and_then(Value::as_array)
        .ok_or(ValidationError::NotAList)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_feedback_item(index, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_text_accepts_text_within_limit() {
        let value = json!("works fine");
        assert_eq!(validate_text(Some(&value), 10), Ok("works fine"));
    }

    #[test]
    fn test_validate_text_rejects_empty_and_whitespace() {
        for value in [json!(""), json!("   \n\t"), json!(42), json!(null)] {
            assert_eq!(
                validate_text(Some(&value), 100),
                Err(ValidationError::EmptyInput)
            );
        }
        assert_eq!(validate_text(None, 100), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn test_validate_text_rejects_oversize() {
        let value = json!("a".repeat(11));
        assert_eq!(
            validate_text(Some(&value), 10),
            Err(ValidationError::TooLong { max: 10 })
        );
    }

    #[test]
    fn test_validate_text_counts_characters_not_bytes() {
        let value = json!("ééééé");
        assert!(validate_text(Some(&value), 5).is_ok());
    }

    #[test]
    fn test_validate_date_round_trips() {
        let date = validate_date("2024-02-29").unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-02-29");
    }

    #[test]
    fn test_validate_date_rejects_bad_shapes() {
        for raw in [
            "2024-13-01",
            "01-01-2024",
            "",
            "2024-1-05",
            "2023-02-29",
            " 2024-01-01",
            "2024-01-01T00:00:00",
            "+2024-01-01",
        ] {
            assert!(validate_date(raw).is_err(), "should reject {raw:?}");
        }
    }

    #[test]
    fn test_validate_feedback_list_reports_index() {
        let value = json!(["fine", "also fine", 3]);
        assert_eq!(
            validate_feedback_list(Some(&value)),
            Err(ValidationError::ElementNotString { index: 2 })
        );
    }

    #[test]
    fn test_validate_feedback_list_shapes() {
        assert_eq!(
            validate_feedback_list(Some(&json!("nope"))),
            Err(ValidationError::NotAList)
        );
        assert_eq!(
            validate_feedback_list(Some(&json!([]))),
            Err(ValidationError::EmptyList)
        );
        assert_eq!(
            validate_feedback_list(Some(&json!(["a", "b"]))),
            Ok(vec!["a", "b"])
        );
    }

    #[test]
    fn test_validate_feedback_item_collects_all_errors() {
        let errors = validate_feedback_item(4, &json!({ "text": "  ", "date": "yesterday" }));
        assert_eq!(
            errors,
            vec![
                ValidationError::ElementEmptyText { index: 4 },
                ValidationError::ElementInvalidDate { index: 4 },
            ]
        );

        let errors = validate_feedback_item(0, &json!({}));
        assert_eq!(errors.len(), 2);

        assert!(validate_feedback_item(0, &json!({ "text": "ok", "date": "2024-01-01" })).is_empty());
    }

    #[test]
    fn test_parse_feedback_item_fails_fast() {
        let err = parse_feedback_item(0, &json!({ "text": "ok" })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ElementMissingField {
                index: 0,
                field: "date"
            }
        );
        assert!(err.to_string().contains("index 0"));
        assert!(err.to_string().contains("'date'"));
    }

    #[test]
    fn test_parse_feedback_item_reports_first_collected_error() {
        let records = [
            json!(7),
            json!({}),
            json!({ "date": "2024-01-01" }),
            json!({ "text": "", "date": "bad" }),
            json!({ "text": "ok", "date": 20240101 }),
            json!({ "text": "ok", "date": "2024-02-30" }),
        ];

        for record in &records {
            let first = validate_feedback_item(5, record).into_iter().next();
            assert_eq!(parse_feedback_item(5, record).err(), first, "{record}");
        }

        let item = parse_feedback_item(5, &json!({ "text": "ok", "date": "2024-02-29" })).unwrap();
        assert_eq!(item.text, "ok");
        assert_eq!(item.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_feedback_records_stops_at_first_bad_record() {
        let value = json!([
            { "text": "good", "date": "2024-01-01" },
            "not a record",
            { "text": "never reached" }
        ]);
        assert_eq!(
            parse_feedback_records(Some(&value)),
            Err(ValidationError::ElementNotObject { index: 1 })
        );
    }
}
