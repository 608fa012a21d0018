//! Form validation and sanitization shared by all catalog forms.
//!
//! A submitted form goes through three steps:
//! 1. free-text fields are trimmed,
//! 2. the trimmed form is checked against its `validator` rules,
//! 3. the valid form is sanitized (HTML-escaped, dates and references coerced)
//!    into the model that gets persisted.
//!
//! When step 2 fails, callers keep the form exactly as submitted so it can be
//! redisplayed alongside the field errors.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// A submitted form that validates into a model
pub trait FormInput: Validate + Clone {
    type Output;

    /// Field names in display order, used to order reported errors
    const FIELDS: &'static [&'static str];

    /// Copy of the form with free-text fields trimmed
    fn trimmed(&self) -> Self;

    /// Escape and coerce an already-validated form into its model
    fn sanitize(self) -> Result<Self::Output, FieldError>;
}

/// Run the trim → validate → sanitize pipeline on a form.
pub fn check<F: FormInput>(input: &F) -> Result<F::Output, Vec<FieldError>> {
    let trimmed = input.trimmed();
    trimmed
        .validate()
        .map_err(|errors| field_errors(&errors, F::FIELDS))?;
    trimmed.sanitize().map_err(|error| vec![error])
}

/// Flatten `validator` errors into (field, message) pairs ordered by `fields`
pub fn field_errors(errors: &ValidationErrors, fields: &[&str]) -> Vec<FieldError> {
    let mut flat: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldError {
                field: field.clone(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
            })
        })
        .collect();
    flat.sort_by_key(|e| fields.iter().position(|f| *f == e.field).unwrap_or(usize::MAX));
    flat
}

/// HTML-escape a free-text value (`& < > " ' / \` and backtick)
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
    }
    out
}

const ENTITIES: [(&str, char); 8] = [
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&#x27;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&#x2F;", '/'),
    ("&#x5C;", '\\'),
    ("&#96;", '`'),
];

/// Reverse of [`escape`], for putting stored text back into a form
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Trim an optional field; blank values become `None`
pub fn trim_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an ISO-8601 date, either a calendar date or a full timestamp
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Parse a reference to another document
pub fn parse_reference(field: &str, value: &str) -> Result<Uuid, FieldError> {
    Uuid::parse_str(value).map_err(|_| FieldError::new(field, "Invalid reference"))
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_alphabetic(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(char::is_alphabetic) {
        Ok(())
    } else {
        Err(rule("alphabetic", "Must contain letters only."))
    }
}

pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_iso_date(value).is_some() {
        Ok(())
    } else {
        Err(rule("iso8601", "Please specify a valid date"))
    }
}

/// A reference may be blank (caught by the length rule) or a well-formed id
pub fn validate_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Uuid::parse_str(value).is_ok() {
        Ok(())
    } else {
        Err(rule("reference", "Invalid reference"))
    }
}

pub fn validate_references(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| validate_reference(v))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept a field sent as absent, `null`, a single string, or a list of strings
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

/// Trim and lowercase each id, drop blanks and duplicates, keep first-seen order
pub fn normalize_set(values: &[String]) -> Vec<String> {
    let mut set: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let value = value.to_ascii_lowercase();
        if !set.contains(&value) {
            set.push(value);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_replaces_html_sensitive_characters() {
        assert_eq!(escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;&#x2F;b&gt;");
        assert_eq!(escape("O'Brien"), "O&#x27;Brien");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn unescape_restores_escaped_text() {
        for text in ["Tom & Jerry", "<b>\"x\"</b> O'Brien \\ `tick`", "&amp; literal", "a & b &c"] {
            assert_eq!(unescape(&escape(text)), text);
        }
        assert_eq!(unescape("fish &chips"), "fish &chips");
    }

    #[test]
    fn iso_dates() {
        assert_eq!(parse_iso_date("2020-02-29"), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(
            parse_iso_date("2021-06-01T10:00:00Z"),
            NaiveDate::from_ymd_opt(2021, 6, 1)
        );
        assert!(parse_iso_date("2021-02-30").is_none());
        assert!(parse_iso_date("yesterday").is_none());
        assert!(validate_iso_date("").is_ok());
    }

    #[test]
    fn alphabetic_accepts_unicode_letters() {
        assert!(validate_alphabetic("Brontë").is_ok());
        assert!(validate_alphabetic("R2D2").is_err());
        assert!(validate_alphabetic("Le Guin").is_err());
    }

    #[test]
    fn one_or_many_normalizes_shapes() {
        #[derive(Deserialize)]
        struct Submitted {
            #[serde(default, deserialize_with = "one_or_many")]
            genre: Vec<String>,
        }
        let parse = |s: &str| serde_json::from_str::<Submitted>(s).unwrap().genre;
        assert!(parse("{}").is_empty());
        assert!(parse(r#"{"genre": null}"#).is_empty());
        assert_eq!(parse(r#"{"genre": "a"}"#), ["a"]);
        assert_eq!(parse(r#"{"genre": ["a", "b"]}"#), ["a", "b"]);
    }

    #[test]
    fn normalize_set_dedupes_in_order() {
        let values = vec![" b ".to_string(), "a".into(), "b".into(), "".into()];
        assert_eq!(normalize_set(&values), ["b", "a"]);
    }

    #[test]
    fn normalize_set_ignores_id_case() {
        let id = Uuid::new_v4().to_string();
        let values = vec![id.to_uppercase(), id.clone(), format!(" {} ", id)];
        assert_eq!(normalize_set(&values), [id]);
    }
}
