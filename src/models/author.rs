//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use super::{format_long_date, Entity};
use crate::{
    repository::Collection,
    validation::{
        escape, parse_iso_date, trim_optional, validate_alphabetic, validate_iso_date, FieldError,
        FormInput,
    },
};

/// Author document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub first_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "family_name, first_name", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// "birth - death" with long-form dates; unknown ends are left blank
    pub fn lifespan(&self) -> String {
        let fmt = |d: Option<NaiveDate>| d.map(format_long_date).unwrap_or_default();
        format!("{} - {}", fmt(self.date_of_birth), fmt(self.date_of_death))
            .trim()
            .to_string()
    }
}

impl Entity for Author {
    const COLLECTION: Collection = Collection::Authors;
    const NAME: &'static str = "Author";
    const URL_PREFIX: &'static str = "/catalog/author";

    fn virtuals(&self) -> Map<String, Value> {
        let mut virtuals = Map::new();
        virtuals.insert("name".into(), Value::String(self.name()));
        virtuals.insert("lifespan".into(), Value::String(self.lifespan()));
        virtuals
    }
}

/// Author create form, as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "First name must be specified (at most 100 characters)."),
        custom(function = "validate_alphabetic")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "Family name must be specified (at most 100 characters)."),
        custom(function = "validate_alphabetic")
    )]
    pub family_name: String,
    /// ISO-8601 date, optional
    #[validate(custom(function = "validate_iso_date"))]
    pub date_of_birth: Option<String>,
    /// ISO-8601 date, optional
    #[validate(custom(function = "validate_iso_date"))]
    pub date_of_death: Option<String>,
}

impl FormInput for AuthorForm {
    type Output = Author;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            family_name: self.family_name.trim().to_string(),
            date_of_birth: trim_optional(&self.date_of_birth),
            date_of_death: trim_optional(&self.date_of_death),
        }
    }

    fn sanitize(self) -> Result<Author, FieldError> {
        Ok(Author {
            first_name: escape(&self.first_name),
            family_name: escape(&self.family_name),
            date_of_birth: self.date_of_birth.as_deref().and_then(parse_iso_date),
            date_of_death: self.date_of_death.as_deref().and_then(parse_iso_date),
        })
    }
}
