//! Book API endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use uuid::Uuid;

use super::{form_response, View};
use crate::{
    error::AppResult,
    models::{BookForm, BookListEntry},
    services::{
        books::{BookDetail, BookFormContext},
        FormPage,
    },
    AppState,
};

const BOOK_LIST: &str = "/catalog/books";

/// List all books with their authors
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Books with author populated")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<View<Vec<BookListEntry>>> {
    let books = state.services.books.list().await?;
    Ok(View::new("Book List", books))
}

/// Get a book with its author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details, titled after the book"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<View<BookDetail>> {
    let detail = state.services.books.detail(id).await?;
    Ok(View::new(detail.book.title.clone(), detail))
}

/// Empty book form with author and genre options
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "All authors and genres")
    )
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<View<FormPage<BookForm, BookFormContext>>> {
    let page = state.services.books.create_form().await?;
    Ok(View::new("Create Book", page))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 303, description = "Created; redirect to the book"),
        (status = 422, description = "Form rejected; input, errors and options returned")
    )
)]
pub async fn create_book(State(state): State<AppState>, Json(input): Json<BookForm>) -> AppResult<Response> {
    let outcome = state.services.books.create(input).await?;
    Ok(form_response("Create Book", outcome))
}

/// Book delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book and its copies"),
        (status = 303, description = "Book does not exist; redirect to the list")
    )
)]
pub async fn delete_book_form(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Response> {
    Ok(match state.services.books.delete_form(id).await? {
        Some(detail) => View::new("Delete Book", detail).into_response(),
        None => Redirect::to(BOOK_LIST).into_response(),
    })
}

/// Delete a book; its copies are kept
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Deleted; redirect to the list")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Redirect> {
    state.services.books.delete(id).await?;
    Ok(Redirect::to(BOOK_LIST))
}

/// Book update form, pre-filled with its genres checked
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Current values with author and genre options"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<View<FormPage<BookForm, BookFormContext>>> {
    let page = state.services.books.update_form(id).await?;
    Ok(View::new("Update Book", page))
}

/// Overwrite a book
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = BookForm,
    responses(
        (status = 303, description = "Updated; redirect to the book"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Form rejected; input, errors and options returned")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookForm>,
) -> AppResult<Response> {
    let outcome = state.services.books.update(id, input).await?;
    Ok(form_response("Update Book", outcome))
}
