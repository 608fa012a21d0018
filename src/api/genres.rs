//! Genre API endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use uuid::Uuid;

use super::{form_response, View};
use crate::{
    error::AppResult,
    models::{Document, Genre, GenreForm, GenreRenameForm},
    services::{genres::GenreDetail, DeleteOutcome, FormPage},
    AppState,
};

const GENRE_LIST: &str = "/catalog/genres";

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres sorted by name, descending")
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<View<Vec<Document<Genre>>>> {
    let genres = state.services.genres.list().await?;
    Ok(View::new("Genre List", genres))
}

/// Get a genre with its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details and books"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<GenreDetail>> {
    let detail = state.services.genres.detail(id).await?;
    Ok(View::new("Genre Detail", detail))
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Empty genre form")
    )
)]
pub async fn create_genre_form() -> View<FormPage<GenreForm>> {
    View::new(
        "Create Genre",
        FormPage {
            input: None,
            context: (),
        },
    )
}

/// Create a genre, or redirect to the existing genre of that name
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body = GenreForm,
    responses(
        (status = 303, description = "Created or already present; redirect to the genre"),
        (status = 422, description = "Form rejected; input and errors returned")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Json(input): Json<GenreForm>,
) -> AppResult<Response> {
    let outcome = state.services.genres.create(input).await?;
    Ok(form_response("Create Genre", outcome))
}

/// Genre delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre and the books blocking its deletion"),
        (status = 303, description = "Genre does not exist; redirect to the list")
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    Ok(match state.services.genres.delete_form(id).await? {
        Some(detail) => View::new("Delete Genre", detail).into_response(),
        None => Redirect::to(GENRE_LIST).into_response(),
    })
}

/// Delete a genre no book is filed under
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Books are still filed under the genre; nothing deleted"),
        (status = 303, description = "Deleted; redirect to the list")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    Ok(match state.services.genres.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyDeleted => Redirect::to(GENRE_LIST).into_response(),
        DeleteOutcome::Blocked { target, dependents } => View::new(
            "Delete Genre",
            GenreDetail {
                genre: target,
                genre_books: dependents,
            },
        )
        .into_response(),
    })
}

/// Genre rename form, pre-filled
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Current genre name"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<FormPage<GenreRenameForm>>> {
    let genre = state.services.genres.update_form(id).await?;
    Ok(View::new(
        "Update Genre",
        FormPage {
            input: Some(GenreRenameForm::from(&genre.data)),
            context: (),
        },
    ))
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    request_body = GenreRenameForm,
    responses(
        (status = 303, description = "Renamed; redirect to the genre"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Form rejected or name taken by another genre")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<GenreRenameForm>,
) -> AppResult<Response> {
    let outcome = state.services.genres.update(id, input).await?;
    Ok(form_response("Update Genre", outcome))
}
