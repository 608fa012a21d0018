//! Book instance (physical copy) model and related types

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{book::Book, format_long_date, Document, Entity};
use crate::{
    repository::Collection,
    validation::{
        escape, parse_iso_date, parse_reference, trim_optional, validate_iso_date,
        validate_reference, FieldError, FormInput,
    },
};

/// Loan status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum InstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl InstanceStatus {
    pub const ALL: [InstanceStatus; 4] = [
        InstanceStatus::Available,
        InstanceStatus::Maintenance,
        InstanceStatus::Loaned,
        InstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
        }
    }
}

impl FromStr for InstanceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Book instance document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub book: Uuid,
    pub imprint: String,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default = "today")]
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn due_back_formatted(&self) -> String {
        format_long_date(self.due_back)
    }
}

impl Entity for BookInstance {
    const COLLECTION: Collection = Collection::BookInstances;
    const NAME: &'static str = "Book instance";
    const URL_PREFIX: &'static str = "/catalog/bookinstance";

    fn virtuals(&self) -> Map<String, Value> {
        let mut virtuals = Map::new();
        virtuals.insert("due_back_formatted".into(), Value::String(self.due_back_formatted()));
        virtuals
    }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<InstanceStatus>().is_ok() {
        return Ok(());
    }
    let mut error = ValidationError::new("status");
    error.message = Some("Status must be one of Available, Maintenance, Loaned, Reserved".into());
    Err(error)
}

/// Book instance create form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInstanceForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "validate_reference")
    )]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please specify an imprint"))]
    pub imprint: String,
    /// Defaults to `Maintenance`
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    /// ISO-8601 date; defaults to today
    #[validate(custom(function = "validate_iso_date"))]
    pub due_back: Option<String>,
}

impl FormInput for BookInstanceForm {
    type Output = BookInstance;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn trimmed(&self) -> Self {
        Self {
            book: self.book.trim().to_string(),
            imprint: self.imprint.trim().to_string(),
            status: trim_optional(&self.status),
            due_back: trim_optional(&self.due_back),
        }
    }

    fn sanitize(self) -> Result<BookInstance, FieldError> {
        let status = match self.status.as_deref() {
            Some(s) => s
                .parse()
                .map_err(|_| FieldError::new("status", "Invalid status"))?,
            None => InstanceStatus::default(),
        };
        let due_back = match self.due_back.as_deref() {
            Some(d) => parse_iso_date(d)
                .ok_or_else(|| FieldError::new("due_back", "Please specify a valid date"))?,
            None => today(),
        };
        Ok(BookInstance {
            book: parse_reference("book", &self.book)?,
            imprint: escape(&self.imprint),
            status,
            due_back,
        })
    }
}

/// Book instance with its book resolved
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedBookInstance {
    pub id: Uuid,
    pub url: String,
    /// `None` when the reference dangles
    pub book: Option<Document<Book>>,
    pub imprint: String,
    pub status: InstanceStatus,
    pub due_back: NaiveDate,
    pub due_back_formatted: String,
}

impl PopulatedBookInstance {
    pub fn new(instance: Document<BookInstance>, book: Option<Document<Book>>) -> Self {
        let due_back_formatted = instance.data.due_back_formatted();
        Self {
            id: instance.id,
            url: instance.url,
            book,
            imprint: instance.data.imprint,
            status: instance.data.status,
            due_back: instance.data.due_back,
            due_back_formatted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn form(book: &str, imprint: &str) -> BookInstanceForm {
        BookInstanceForm {
            book: book.into(),
            imprint: imprint.into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply_when_status_and_date_are_blank() {
        let book = Uuid::new_v4();
        let mut input = form(&book.to_string(), "Penguin, 2003");
        input.status = Some("".into());

        let instance = check(&input).unwrap();
        assert_eq!(instance.book, book);
        assert_eq!(instance.status, InstanceStatus::Maintenance);
        assert_eq!(instance.due_back, today());
        assert_eq!(instance.imprint, "Penguin, 2003");
    }

    #[test]
    fn explicit_status_and_due_date() {
        let mut input = form(&Uuid::new_v4().to_string(), "Penguin");
        input.status = Some("Loaned".into());
        input.due_back = Some("2030-01-15".into());

        let instance = check(&input).unwrap();
        assert_eq!(instance.status, InstanceStatus::Loaned);
        assert_eq!(instance.due_back_formatted(), "January 15th, 2030");
    }

    #[test]
    fn invalid_input_reports_each_field() {
        let mut input = form("", "");
        input.status = Some("Lost".into());
        input.due_back = Some("soon".into());
        let fields: Vec<String> = check(&input).unwrap_err().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["book", "imprint", "status", "due_back"]);
    }

    #[test]
    fn stored_document_defaults() {
        let book = Uuid::new_v4();
        let instance: BookInstance =
            serde_json::from_value(serde_json::json!({ "book": book, "imprint": "Vintage" })).unwrap();
        assert_eq!(instance.status, InstanceStatus::Maintenance);
        assert_eq!(instance.due_back, today());
    }
}
