//! Genre model and forms

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Entity;
use crate::{
    repository::Collection,
    validation::{escape, unescape, FieldError, FormInput},
};

/// Genre document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Genre {
    pub name: String,
}

impl Entity for Genre {
    const COLLECTION: Collection = Collection::Genres;
    const NAME: &'static str = "Genre";
    const URL_PREFIX: &'static str = "/catalog/genre";
}

/// Genre create form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenreForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Genre name required"))]
    pub name: String,
}

impl FormInput for GenreForm {
    type Output = Genre;

    const FIELDS: &'static [&'static str] = &["name"];

    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }

    fn sanitize(self) -> Result<Genre, FieldError> {
        Ok(Genre {
            name: escape(&self.name),
        })
    }
}

/// Genre update form; renames need at least two characters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenreRenameForm {
    #[serde(default)]
    #[validate(length(min = 2, message = "Genre name must be at least 2 characters"))]
    pub name: String,
}

impl FormInput for GenreRenameForm {
    type Output = Genre;

    const FIELDS: &'static [&'static str] = &["name"];

    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }

    fn sanitize(self) -> Result<Genre, FieldError> {
        Ok(Genre {
            name: escape(&self.name),
        })
    }
}

impl From<&Genre> for GenreRenameForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: unescape(&genre.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    #[test]
    fn create_requires_one_character_after_trim() {
        assert!(check(&GenreForm { name: "   ".into() }).is_err());
        assert_eq!(check(&GenreForm { name: " X ".into() }).unwrap().name, "X");
    }

    #[test]
    fn rename_requires_two_characters() {
        let errors = check(&GenreRenameForm { name: "X".into() }).unwrap_err();
        assert_eq!(errors[0].field, "name");
        assert!(check(&GenreRenameForm { name: "Sci-Fi & Fantasy".into() }).is_ok());
    }

    #[test]
    fn name_is_escaped() {
        let genre = check(&GenreForm { name: "Sci-Fi & Fantasy".into() }).unwrap();
        assert_eq!(genre.name, "Sci-Fi &amp; Fantasy");
        assert_eq!(GenreRenameForm::from(&genre).name, "Sci-Fi & Fantasy");
    }
}
