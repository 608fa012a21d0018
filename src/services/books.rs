//! Book catalog service, including the home page counts

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{FormOutcome, FormPage, InvalidForm};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, BookForm, BookInstance, BookListEntry, Document, Genre, InstanceStatus,
        PopulatedBook,
    },
    repository::Repository,
    validation::{check, FieldError},
};

/// Counts shown on the catalog home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

/// A book with its references resolved and its copies
#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: PopulatedBook,
    pub book_instances: Vec<Document<BookInstance>>,
}

/// A genre checkbox on the book form
#[derive(Debug, Serialize)]
pub struct GenreOption {
    #[serde(flatten)]
    pub genre: Document<Genre>,
    pub checked: bool,
}

/// Select options for the book form
#[derive(Debug, Serialize)]
pub struct BookFormContext {
    pub authors: Vec<Document<Author>>,
    pub genres: Vec<GenreOption>,
}

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// The five catalog counts, queried concurrently; the first failure wins
    pub async fn dashboard_counts(&self) -> AppResult<DashboardCounts> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) = tokio::try_join!(
            self.repository.books_count(),
            self.repository.book_instances_count(),
            self.repository
                .book_instances_count_by_status(InstanceStatus::Available),
            self.repository.authors_count(),
            self.repository.genres_count(),
        )?;

        Ok(DashboardCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }

    /// All books with their author resolved
    pub async fn list(&self) -> AppResult<Vec<BookListEntry>> {
        self.repository.books_list().await
    }

    /// Book with author and genres, and its copies, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        self.find_with_instances(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn find_with_instances(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let (book, book_instances) = tokio::try_join!(
            self.repository.books_find_populated(id),
            self.repository.books_instances(id),
        )?;
        Ok(book.map(|book| BookDetail {
            book,
            book_instances,
        }))
    }

    /// All authors and genres, with the genres in `selected` checked
    async fn form_context(&self, selected: &BookForm) -> AppResult<BookFormContext> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors_all(),
            self.repository.genres_all(),
        )?;
        Ok(Self::options(authors, genres, selected))
    }

    fn options(authors: Vec<Document<Author>>, genres: Vec<Document<Genre>>, selected: &BookForm) -> BookFormContext {
        let genres = genres
            .into_iter()
            .map(|genre| GenreOption {
                checked: selected.selects(genre.id),
                genre,
            })
            .collect();
        BookFormContext { authors, genres }
    }

    pub async fn create_form(&self) -> AppResult<FormPage<BookForm, BookFormContext>> {
        let context = self.form_context(&BookForm::default()).await?;
        Ok(FormPage {
            input: None,
            context,
        })
    }

    pub async fn create(&self, input: BookForm) -> AppResult<FormOutcome<BookForm, BookFormContext>> {
        let book = match check(&input) {
            Ok(book) => book,
            Err(errors) => return self.invalid(input, errors).await,
        };

        let created = self.repository.books_create(book).await?;
        tracing::info!(id = %created.id, title = %created.data.title, "Book created");
        Ok(FormOutcome::Saved(created.reference()))
    }

    /// The book's current values with its genres checked
    pub async fn update_form(&self, id: Uuid) -> AppResult<FormPage<BookForm, BookFormContext>> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books_find(id),
            self.repository.authors_all(),
            self.repository.genres_all(),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        let input = BookForm::from(&book.data);
        let context = Self::options(authors, genres, &input);
        Ok(FormPage {
            input: Some(input),
            context,
        })
    }

    /// Overwrite a book's fields. A missing book is `NotFound`, whatever was submitted.
    pub async fn update(&self, id: Uuid, input: BookForm) -> AppResult<FormOutcome<BookForm, BookFormContext>> {
        if self.repository.books_find(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        let book = match check(&input) {
            Ok(book) => book,
            Err(errors) => return self.invalid(input, errors).await,
        };

        let updated = self.repository.books_update(id, book).await?;
        tracing::info!(%id, title = %updated.data.title, "Book updated");
        Ok(FormOutcome::Saved(updated.reference()))
    }

    async fn invalid(
        &self,
        input: BookForm,
        errors: Vec<FieldError>,
    ) -> AppResult<FormOutcome<BookForm, BookFormContext>> {
        tracing::debug!(?errors, "Book form rejected");
        let context = self.form_context(&input).await?;
        Ok(FormOutcome::Invalid(InvalidForm {
            input,
            errors,
            context,
        }))
    }

    /// Delete confirmation page; `None` when the book is already gone
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        self.find_with_instances(id).await
    }

    /// Remove the book. Copies are not checked and are left referencing it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let instances = self.repository.books_instances(id).await?;

        match self.repository.books_delete(id).await {
            Ok(()) => tracing::info!(%id, "Book deleted"),
            Err(AppError::NotFound(_)) => {
                tracing::debug!(%id, "Book already deleted");
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        if !instances.is_empty() {
            tracing::warn!(%id, orphaned = instances.len(), "Deleted book still had copies");
        }
        Ok(())
    }
}
