//! Book model, form and populated views

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{author::Author, genre::Genre, Document, Entity};
use crate::{
    repository::Collection,
    validation::{
        escape, normalize_set, one_or_many, parse_reference, unescape, validate_reference,
        validate_references, FieldError, FormInput,
    },
};

/// Book document; `author` and `genre` hold references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<Uuid>,
}

impl Entity for Book {
    const COLLECTION: Collection = Collection::Books;
    const NAME: &'static str = "Book";
    const URL_PREFIX: &'static str = "/catalog/book";
}

/// Book create/update form.
///
/// `genre` may be submitted absent, as one id, or as a list of ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title can not be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Author can not be empty"),
        custom(function = "validate_reference")
    )]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary can not be empty"))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN can not be empty"))]
    pub isbn: String,
    #[serde(default, deserialize_with = "one_or_many")]
    #[validate(custom(function = "validate_references"))]
    pub genre: Vec<String>,
}

impl BookForm {
    /// Whether the genre id was among the submitted selection
    pub fn selects(&self, genre: Uuid) -> bool {
        self.genre
            .iter()
            .any(|g| Uuid::parse_str(g.trim()).is_ok_and(|id| id == genre))
    }
}

impl FormInput for BookForm {
    type Output = Book;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            summary: self.summary.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            genre: normalize_set(&self.genre),
        }
    }

    fn sanitize(self) -> Result<Book, FieldError> {
        Ok(Book {
            title: escape(&self.title),
            author: parse_reference("author", &self.author)?,
            summary: escape(&self.summary),
            isbn: escape(&self.isbn),
            genre: self
                .genre
                .iter()
                .map(|g| parse_reference("genre", g))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Stored values as the user typed them, ready to be edited and resubmitted
impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: unescape(&book.title),
            author: book.author.to_string(),
            summary: unescape(&book.summary),
            isbn: unescape(&book.isbn),
            genre: book.genre.iter().map(Uuid::to_string).collect(),
        }
    }
}

/// Book list row: the author reference resolved, genres left as ids
#[derive(Debug, Clone, Serialize)]
pub struct BookListEntry {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    /// `None` when the reference dangles
    pub author: Option<Document<Author>>,
    pub genre: Vec<Uuid>,
}

impl BookListEntry {
    pub fn new(book: Document<Book>, author: Option<Document<Author>>) -> Self {
        Self {
            id: book.id,
            url: book.url,
            title: book.data.title,
            summary: book.data.summary,
            isbn: book.data.isbn,
            author,
            genre: book.data.genre,
        }
    }
}

/// Book with author and genres resolved
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedBook {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<Document<Author>>,
    pub genre: Vec<Document<Genre>>,
}

impl PopulatedBook {
    pub fn new(
        book: Document<Book>,
        author: Option<Document<Author>>,
        genre: Vec<Document<Genre>>,
    ) -> Self {
        Self {
            id: book.id,
            url: book.url,
            title: book.data.title,
            summary: book.data.summary,
            isbn: book.data.isbn,
            author,
            genre,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn valid_form() -> BookForm {
        BookForm {
            title: "Emma".into(),
            author: Uuid::new_v4().to_string(),
            summary: "A comedy of manners.".into(),
            isbn: "9780141439587".into(),
            genre: vec![],
        }
    }

    #[test]
    fn every_required_field_reports_its_own_message() {
        let errors = check(&BookForm::default()).unwrap_err();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Title can not be empty",
                "Author can not be empty",
                "Summary can not be empty",
                "ISBN can not be empty"
            ]
        );
    }

    #[test]
    fn genre_selection_is_deduplicated() {
        let genre = Uuid::new_v4();
        let mut form = valid_form();
        form.genre = vec![
            genre.to_string(),
            format!(" {} ", genre),
            genre.to_string().to_uppercase(),
        ];
        let book = check(&form).unwrap();
        assert_eq!(book.genre, vec![genre]);
        assert!(form.selects(genre));
    }

    #[test]
    fn upper_case_ids_are_selected() {
        let genre = Uuid::new_v4();
        let mut form = valid_form();
        form.genre = vec![genre.to_string().to_uppercase()];
        assert!(form.selects(genre));
    }

    #[test]
    fn malformed_references_are_rejected() {
        let mut form = valid_form();
        form.author = "not-an-id".into();
        form.genre = vec!["fiction".into()];
        let fields: Vec<String> = check(&form).unwrap_err().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["author", "genre"]);
    }

    #[test]
    fn form_round_trips_selection() {
        let genre = Uuid::new_v4();
        let mut form = valid_form();
        form.genre = vec![genre.to_string()];
        let book = check(&form).unwrap();
        let back = BookForm::from(&book);
        assert!(back.selects(genre));
        assert!(!back.selects(Uuid::new_v4()));
    }

    #[test]
    fn form_shows_stored_text_unescaped() {
        let mut form = valid_form();
        form.title = "Tom & Jerry".into();
        form.summary = "Cat <chases> mouse".into();
        let book = check(&form).unwrap();
        assert_eq!(book.title, "Tom &amp; Jerry");

        let back = BookForm::from(&book);
        assert_eq!(back.title, "Tom & Jerry");
        assert_eq!(back.summary, "Cat <chases> mouse");
        assert_eq!(check(&back).unwrap(), book);
    }
}
