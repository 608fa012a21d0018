//! Book instance (copy) service

use serde::Serialize;
use uuid::Uuid;

use super::{FormOutcome, FormPage, InvalidForm};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInstanceForm, Document, PopulatedBookInstance},
    repository::Repository,
    validation::check,
};

/// Book select for the copy form, with the attempted selection
#[derive(Debug, Serialize)]
pub struct BookInstanceFormContext {
    pub book_list: Vec<Document<Book>>,
    pub selected_book: Option<String>,
}

#[derive(Clone)]
pub struct BookInstanceService {
    repository: Repository,
}

impl BookInstanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies with their book resolved
    pub async fn list(&self) -> AppResult<Vec<PopulatedBookInstance>> {
        self.repository.book_instances_list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<PopulatedBookInstance> {
        self.repository
            .book_instances_find_populated(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    pub async fn create_form(&self) -> AppResult<FormPage<BookInstanceForm, BookInstanceFormContext>> {
        let book_list = self.repository.books_all().await?;
        Ok(FormPage {
            input: None,
            context: BookInstanceFormContext {
                book_list,
                selected_book: None,
            },
        })
    }

    pub async fn create(
        &self,
        input: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstanceForm, BookInstanceFormContext>> {
        let instance = match check(&input) {
            Ok(instance) => instance,
            Err(errors) => {
                tracing::debug!(?errors, "Book instance form rejected");
                let book_list = self.repository.books_all().await?;
                let selected = input.book.trim();
                let selected_book = (!selected.is_empty()).then(|| selected.to_string());
                return Ok(FormOutcome::Invalid(InvalidForm {
                    input,
                    errors,
                    context: BookInstanceFormContext {
                        book_list,
                        selected_book,
                    },
                }));
            }
        };

        let created = self.repository.book_instances_create(instance).await?;
        tracing::info!(id = %created.id, book = %created.data.book, "Book instance created");
        Ok(FormOutcome::Saved(created.reference()))
    }

    /// Delete confirmation page; `None` when the copy is already gone
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<PopulatedBookInstance>> {
        self.repository.book_instances_find_populated(id).await
    }

    /// Remove the copy; a missing id is not an error
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        match self.repository.book_instances_delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "Book instance deleted");
                Ok(())
            }
            Err(AppError::NotFound(_)) => {
                tracing::debug!(%id, "Book instance already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update_form(&self, _id: Uuid) -> AppResult<FormPage<BookInstanceForm, BookInstanceFormContext>> {
        Err(AppError::Unsupported("Book instance update is not supported yet".to_string()))
    }

    pub async fn update(
        &self,
        _id: Uuid,
        _input: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstanceForm, BookInstanceFormContext>> {
        Err(AppError::Unsupported("Book instance update is not supported yet".to_string()))
    }
}
