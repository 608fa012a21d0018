//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use serde::Serialize;

use crate::{
    models::{Document, Reference},
    repository::Repository,
    validation::FieldError,
};

/// Result of submitting a create/update form
#[derive(Debug)]
pub enum FormOutcome<F, C = ()> {
    /// The document was persisted (or already existed); redirect here
    Saved(Reference),
    /// Nothing was persisted; redisplay the form
    Invalid(InvalidForm<F, C>),
}

impl<F, C> FormOutcome<F, C> {
    pub fn is_saved(&self) -> bool {
        matches!(self, FormOutcome::Saved(_))
    }
}

/// A rejected form: the input as submitted, what was wrong with it,
/// and whatever the form needs to render again (select options etc.)
#[derive(Debug, Serialize)]
pub struct InvalidForm<F, C = ()> {
    pub input: F,
    pub errors: Vec<FieldError>,
    #[serde(flatten)]
    pub context: C,
}

/// Data for an empty or pre-filled form
#[derive(Debug, Serialize)]
pub struct FormPage<F, C = ()> {
    pub input: Option<F>,
    #[serde(flatten)]
    pub context: C,
}

/// Result of a guarded delete
#[derive(Debug)]
pub enum DeleteOutcome<T, D> {
    Deleted,
    /// The document did not exist; nothing to do
    AlreadyDeleted,
    /// Dependent documents still reference it; nothing was deleted
    Blocked {
        target: Document<T>,
        dependents: Vec<Document<D>>,
    },
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorService,
    pub genres: genres::GenreService,
    pub books: books::BookService,
    pub book_instances: book_instances::BookInstanceService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorService::new(repository.clone()),
            genres: genres::GenreService::new(repository.clone()),
            books: books::BookService::new(repository.clone()),
            book_instances: book_instances::BookInstanceService::new(repository),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::repository::{memory::MemoryDocumentStore, Repository};

    use super::Services;

    /// Services over a fresh in-memory store
    pub fn services() -> Services {
        Services::new(Repository::new(Arc::new(MemoryDocumentStore::new())))
    }
}
