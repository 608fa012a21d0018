//! Genre catalog service

use serde::Serialize;
use uuid::Uuid;

use super::{DeleteOutcome, FormOutcome, InvalidForm};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Document, Genre, GenreForm, GenreRenameForm},
    repository::Repository,
    validation::{check, FieldError},
};

/// A genre with the books filed under it
#[derive(Debug, Serialize)]
pub struct GenreDetail {
    pub genre: Document<Genre>,
    pub genre_books: Vec<Document<Book>>,
}

#[derive(Clone)]
pub struct GenreService {
    repository: Repository,
}

impl GenreService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres sorted by name, descending
    pub async fn list(&self) -> AppResult<Vec<Document<Genre>>> {
        self.repository.genres_list().await
    }

    /// Genre and its books, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        self.find_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    async fn find_with_books(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, genre_books) = tokio::try_join!(
            self.repository.genres_find(id),
            self.repository.genres_books(id),
        )?;
        Ok(genre.map(|genre| GenreDetail { genre, genre_books }))
    }

    /// Create a genre. An existing genre with the same name is returned instead
    /// of creating a duplicate.
    pub async fn create(&self, input: GenreForm) -> AppResult<FormOutcome<GenreForm>> {
        let genre = match check(&input) {
            Ok(genre) => genre,
            Err(errors) => {
                return Ok(FormOutcome::Invalid(InvalidForm {
                    input,
                    errors,
                    context: (),
                }))
            }
        };

        if let Some(existing) = self.repository.genres_find_by_name(&genre.name, None).await? {
            tracing::debug!(id = %existing.id, name = %genre.name, "Genre already exists");
            return Ok(FormOutcome::Saved(existing.reference()));
        }

        let created = self.repository.genres_create(genre).await?;
        tracing::info!(id = %created.id, name = %created.data.name, "Genre created");
        Ok(FormOutcome::Saved(created.reference()))
    }

    /// Current values for the update form
    pub async fn update_form(&self, id: Uuid) -> AppResult<Document<Genre>> {
        self.repository.genres_get(id).await
    }

    /// Rename a genre. The new name must not be held by another genre;
    /// keeping the current name is allowed.
    pub async fn update(&self, id: Uuid, input: GenreRenameForm) -> AppResult<FormOutcome<GenreRenameForm>> {
        // Missing genre is a NotFound, not a form error
        self.repository.genres_get(id).await?;

        let genre = match check(&input) {
            Ok(genre) => genre,
            Err(errors) => {
                return Ok(FormOutcome::Invalid(InvalidForm {
                    input,
                    errors,
                    context: (),
                }))
            }
        };

        if let Some(other) = self
            .repository
            .genres_find_by_name(&genre.name, Some(id))
            .await?
        {
            tracing::debug!(%id, other = %other.id, name = %genre.name, "Genre rename collides");
            return Ok(FormOutcome::Invalid(InvalidForm {
                input,
                errors: vec![FieldError::new("name", "Genre name already exists")],
                context: (),
            }));
        }

        let updated = self.repository.genres_update(id, genre).await?;
        tracing::info!(%id, name = %updated.data.name, "Genre updated");
        Ok(FormOutcome::Saved(updated.reference()))
    }

    /// Delete confirmation page; `None` when the genre is already gone
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        self.find_with_books(id).await
    }

    /// Delete the genre unless books are still filed under it
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<Genre, Book>> {
        let Some(detail) = self.find_with_books(id).await? else {
            return Ok(DeleteOutcome::AlreadyDeleted);
        };

        if !detail.genre_books.is_empty() {
            tracing::info!(
                %id,
                books = detail.genre_books.len(),
                "Genre delete blocked by referencing books"
            );
            return Ok(DeleteOutcome::Blocked {
                target: detail.genre,
                dependents: detail.genre_books,
            });
        }

        match self.repository.genres_delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "Genre deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(AppError::NotFound(_)) => Ok(DeleteOutcome::AlreadyDeleted),
            Err(e) => Err(e),
        }
    }
}
