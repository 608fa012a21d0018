//! Data models for the Local Library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::{Datelike, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::repository::Collection;

// Re-export commonly used types
pub use author::{Author, AuthorForm};
pub use book::{Book, BookForm, BookListEntry, PopulatedBook};
pub use book_instance::{BookInstance, BookInstanceForm, InstanceStatus, PopulatedBookInstance};
pub use genre::{Genre, GenreForm, GenreRenameForm};

/// A model persisted as a document in one collection
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Human-readable type name used in messages
    const NAME: &'static str;
    /// Prefix of the canonical URL, e.g. `/catalog/author`
    const URL_PREFIX: &'static str;

    /// Derived, display-only fields added next to the stored ones
    fn virtuals(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Canonical URL of a document
pub fn url_for<T: Entity>(id: Uuid) -> String {
    format!("{}/{}", T::URL_PREFIX, id)
}

/// A stored model together with its id, canonical URL and derived fields
#[derive(Debug, Clone, Serialize)]
pub struct Document<T> {
    pub id: Uuid,
    pub url: String,
    #[serde(flatten)]
    pub data: T,
    #[serde(flatten)]
    virtuals: Map<String, Value>,
}

impl<T: Entity> Document<T> {
    pub fn new(id: Uuid, data: T) -> Self {
        let virtuals = data.virtuals();
        Self {
            id,
            url: url_for::<T>(id),
            data,
            virtuals,
        }
    }

    pub fn reference(&self) -> Reference {
        Reference {
            id: self.id,
            url: self.url.clone(),
        }
    }
}

/// Canonical reference to a document, used as redirect target after mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Reference {
    pub id: Uuid,
    pub url: String,
}

/// Long display form of a date: `January 1st, 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_dates_use_ordinal_suffixes() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(format_long_date(d(2024, 1, 1)), "January 1st, 2024");
        assert_eq!(format_long_date(d(2024, 2, 2)), "February 2nd, 2024");
        assert_eq!(format_long_date(d(2024, 3, 3)), "March 3rd, 2024");
        assert_eq!(format_long_date(d(2024, 4, 11)), "April 11th, 2024");
        assert_eq!(format_long_date(d(2024, 5, 12)), "May 12th, 2024");
        assert_eq!(format_long_date(d(2024, 6, 22)), "June 22nd, 2024");
        assert_eq!(format_long_date(d(1999, 12, 31)), "December 31st, 1999");
    }
}
