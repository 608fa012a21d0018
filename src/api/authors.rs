//! Author API endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use uuid::Uuid;

use super::{form_response, View};
use crate::{
    error::AppResult,
    models::{Author, AuthorForm, Document},
    services::{authors::AuthorDetail, DeleteOutcome, FormPage},
    AppState,
};

const AUTHOR_LIST: &str = "/catalog/authors";

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Authors sorted by family name")
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<View<Vec<Document<Author>>>> {
    let authors = state.services.authors.list().await?;
    Ok(View::new("Author List", authors))
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details and books"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<AuthorDetail>> {
    let detail = state.services.authors.detail(id).await?;
    Ok(View::new("Author Detail", detail))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Empty author form")
    )
)]
pub async fn create_author_form() -> View<FormPage<AuthorForm>> {
    View::new(
        "Create Author",
        FormPage {
            input: None,
            context: (),
        },
    )
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body = AuthorForm,
    responses(
        (status = 303, description = "Created; redirect to the author"),
        (status = 422, description = "Form rejected; input and errors returned")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(input): Json<AuthorForm>,
) -> AppResult<Response> {
    let outcome = state.services.authors.create(input).await?;
    Ok(form_response("Create Author", outcome))
}

/// Author delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author and the books blocking its deletion"),
        (status = 303, description = "Author does not exist; redirect to the list")
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    Ok(match state.services.authors.delete_form(id).await? {
        Some(detail) => View::new("Delete Author", detail).into_response(),
        None => Redirect::to(AUTHOR_LIST).into_response(),
    })
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books still reference the author; nothing deleted"),
        (status = 303, description = "Deleted; redirect to the list")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    Ok(match state.services.authors.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyDeleted => {
            Redirect::to(AUTHOR_LIST).into_response()
        }
        DeleteOutcome::Blocked { target, dependents } => View::new(
            "Delete Author",
            AuthorDetail {
                author: target,
                author_books: dependents,
            },
        )
        .into_response(),
    })
}

/// Author update form (not supported)
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 501, description = "Not supported", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<FormPage<AuthorForm>>> {
    let page = state.services.authors.update_form(id).await?;
    Ok(View::new("Update Author", page))
}

/// Update an author (not supported)
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    request_body = AuthorForm,
    responses(
        (status = 501, description = "Not supported", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AuthorForm>,
) -> AppResult<Response> {
    let outcome = state.services.authors.update(id, input).await?;
    Ok(form_response("Update Author", outcome))
}
