//! Author catalog service

use serde::Serialize;
use uuid::Uuid;

use super::{DeleteOutcome, FormOutcome, FormPage, InvalidForm};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book, Document},
    repository::Repository,
    validation::check,
};

/// An author with the books that reference it
#[derive(Debug, Serialize)]
pub struct AuthorDetail {
    pub author: Document<Author>,
    pub author_books: Vec<Document<Book>>,
}

#[derive(Clone)]
pub struct AuthorService {
    repository: Repository,
}

impl AuthorService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors sorted by family name
    pub async fn list(&self) -> AppResult<Vec<Document<Author>>> {
        self.repository.authors_list().await
    }

    /// Author and its books, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        self.find_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn find_with_books(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, author_books) = tokio::try_join!(
            self.repository.authors_find(id),
            self.repository.authors_books(id),
        )?;
        Ok(author.map(|author| AuthorDetail {
            author,
            author_books,
        }))
    }

    pub async fn create(&self, input: AuthorForm) -> AppResult<FormOutcome<AuthorForm>> {
        let author = match check(&input) {
            Ok(author) => author,
            Err(errors) => {
                tracing::debug!(?errors, "Author form rejected");
                return Ok(FormOutcome::Invalid(InvalidForm {
                    input,
                    errors,
                    context: (),
                }));
            }
        };

        let created = self.repository.authors_create(author).await?;
        tracing::info!(id = %created.id, name = %created.data.name(), "Author created");
        Ok(FormOutcome::Saved(created.reference()))
    }

    /// Delete confirmation page; `None` when the author is already gone
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        self.find_with_books(id).await
    }

    /// Delete the author unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<Author, Book>> {
        let Some(detail) = self.find_with_books(id).await? else {
            return Ok(DeleteOutcome::AlreadyDeleted);
        };

        if !detail.author_books.is_empty() {
            tracing::info!(
                %id,
                books = detail.author_books.len(),
                "Author delete blocked by referencing books"
            );
            return Ok(DeleteOutcome::Blocked {
                target: detail.author,
                dependents: detail.author_books,
            });
        }

        match self.repository.authors_delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "Author deleted");
                Ok(DeleteOutcome::Deleted)
            }
            // Removed concurrently between the lookup and the delete
            Err(AppError::NotFound(_)) => Ok(DeleteOutcome::AlreadyDeleted),
            Err(e) => Err(e),
        }
    }

    pub async fn update_form(&self, _id: Uuid) -> AppResult<FormPage<AuthorForm>> {
        Err(AppError::Unsupported("Author update is not supported yet".to_string()))
    }

    pub async fn update(&self, _id: Uuid, _input: AuthorForm) -> AppResult<FormOutcome<AuthorForm>> {
        Err(AppError::Unsupported("Author update is not supported yet".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::AppError,
        models::{AuthorForm, BookForm},
        services::{test_support::services, DeleteOutcome, FormOutcome},
    };

    fn austen() -> AuthorForm {
        AuthorForm {
            first_name: "Jane".into(),
            family_name: "Austen".into(),
            date_of_birth: Some("1775-12-16".into()),
            date_of_death: None,
        }
    }

    #[tokio::test]
    async fn list_is_sorted_by_family_name() {
        let services = services();
        for (first, family) in [("Leo", "Tolstoy"), ("Jane", "Austen"), ("Mary", "Shelley")] {
            let form = AuthorForm {
                first_name: first.into(),
                family_name: family.into(),
                ..Default::default()
            };
            assert!(services.authors.create(form).await.unwrap().is_saved());
        }

        let names: Vec<String> = services
            .authors
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.data.family_name)
            .collect();
        assert_eq!(names, ["Austen", "Shelley", "Tolstoy"]);
    }

    #[tokio::test]
    async fn invalid_author_is_not_persisted() {
        let services = services();
        let input = AuthorForm {
            first_name: "".into(),
            ..austen()
        };

        let FormOutcome::Invalid(invalid) = services.authors.create(input).await.unwrap() else {
            panic!("expected validation failure");
        };
        assert_eq!(invalid.errors[0].field, "first_name");
        assert_eq!(invalid.input.family_name, "Austen");
        assert!(services.authors.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_of_missing_author_is_not_found() {
        let services = services();
        let result = services.authors.detail(uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_is_blocked_while_books_reference_the_author() {
        let services = services();
        let FormOutcome::Saved(author) = services.authors.create(austen()).await.unwrap() else {
            panic!("author not saved");
        };
        let book = BookForm {
            title: "Emma".into(),
            author: author.id.to_string(),
            summary: "Matchmaking.".into(),
            isbn: "9780141439587".into(),
            genre: vec![],
        };
        let FormOutcome::Saved(book) = services.books.create(book).await.unwrap() else {
            panic!("book not saved");
        };

        match services.authors.delete(author.id).await.unwrap() {
            DeleteOutcome::Blocked { target, dependents } => {
                assert_eq!(target.id, author.id);
                assert_eq!(dependents.len(), 1);
                assert_eq!(dependents[0].id, book.id);
            }
            other => panic!("expected guard, got {:?}", other),
        }
        assert!(services.authors.detail(author.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_without_books_removes_the_author() {
        let services = services();
        let FormOutcome::Saved(author) = services.authors.create(austen()).await.unwrap() else {
            panic!("author not saved");
        };

        assert!(matches!(
            services.authors.delete(author.id).await.unwrap(),
            DeleteOutcome::Deleted
        ));
        assert!(services.authors.list().await.unwrap().is_empty());
        assert!(matches!(
            services.authors.detail(author.id).await,
            Err(AppError::NotFound(_))
        ));
        // A second delete finds nothing to do
        assert!(matches!(
            services.authors.delete(author.id).await.unwrap(),
            DeleteOutcome::AlreadyDeleted
        ));
        assert!(services.authors.delete_form(author.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_is_unsupported() {
        let services = services();
        let id = uuid::Uuid::new_v4();
        assert!(matches!(services.authors.update_form(id).await, Err(AppError::Unsupported(_))));
        let result = services.authors.update(id, austen()).await;
        assert!(matches!(result, Err(AppError::Unsupported(_))));
    }
}
