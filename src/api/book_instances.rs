//! Book instance API endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use uuid::Uuid;

use super::{form_response, View};
use crate::{
    error::AppResult,
    models::{BookInstanceForm, PopulatedBookInstance},
    services::{book_instances::BookInstanceFormContext, FormPage},
    AppState,
};

const BOOK_INSTANCE_LIST: &str = "/catalog/bookinstances";

/// List all copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copies with book populated")
    )
)]
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<View<Vec<PopulatedBookInstance>>> {
    let instances = state.services.book_instances.list().await?;
    Ok(View::new("Book Instance List", instances))
}

/// Get a copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy details"),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<PopulatedBookInstance>> {
    let instance = state.services.book_instances.detail(id).await?;
    Ok(View::new("Book Instance Detail", instance))
}

/// Empty copy form with the book options
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "All books to choose from")
    )
)]
pub async fn create_book_instance_form(
    State(state): State<AppState>,
) -> AppResult<View<FormPage<BookInstanceForm, BookInstanceFormContext>>> {
    let page = state.services.book_instances.create_form().await?;
    Ok(View::new("Create Book Instance", page))
}

/// Create a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body = BookInstanceForm,
    responses(
        (status = 303, description = "Created; redirect to the copy"),
        (status = 422, description = "Form rejected; input, errors and book options returned")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Json(input): Json<BookInstanceForm>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.create(input).await?;
    Ok(form_response("Create Book Instance", outcome))
}

/// Copy delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "The copy to delete"),
        (status = 303, description = "Copy does not exist; redirect to the list")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    Ok(match state.services.book_instances.delete_form(id).await? {
        Some(instance) => View::new("Delete Book Instance", instance).into_response(),
        None => Redirect::to(BOOK_INSTANCE_LIST).into_response(),
    })
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 303, description = "Deleted; redirect to the list")
    )
)]
pub async fn delete_book_instance(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Redirect> {
    state.services.book_instances.delete(id).await?;
    Ok(Redirect::to(BOOK_INSTANCE_LIST))
}

/// Copy update form (not supported)
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 501, description = "Not supported", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<FormPage<BookInstanceForm, BookInstanceFormContext>>> {
    let page = state.services.book_instances.update_form(id).await?;
    Ok(View::new("Update Book Instance", page))
}

/// Update a copy (not supported)
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = BookInstanceForm,
    responses(
        (status = 501, description = "Not supported", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookInstanceForm>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.update(id, input).await?;
    Ok(form_response("Update Book Instance", outcome))
}
