//! HTTP handlers for the catalog

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    services::{FormOutcome, FormPage},
    validation::FieldError,
    AppState,
};

/// Render context: what a page needs to display, as JSON
#[derive(Debug, Serialize)]
pub struct View<T> {
    pub title: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> View<T> {
    pub fn new(title: impl Into<String>, data: T) -> Self {
        Self {
            title: title.into(),
            data,
            errors: None,
        }
    }

    pub fn with_errors(title: impl Into<String>, data: T, errors: Vec<FieldError>) -> Self {
        Self {
            title: title.into(),
            data,
            errors: Some(errors),
        }
    }
}

impl<T: Serialize> IntoResponse for View<T> {
    fn into_response(self) -> Response {
        let status = if self.errors.is_some() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}

/// Redirect to the saved document, or redisplay the rejected form
pub(crate) fn form_response<F, C>(title: &str, outcome: FormOutcome<F, C>) -> Response
where
    F: Serialize,
    C: Serialize,
{
    match outcome {
        FormOutcome::Saved(reference) => Redirect::to(&reference.url).into_response(),
        FormOutcome::Invalid(invalid) => View::with_errors(
            title,
            FormPage {
                input: Some(invalid.input),
                context: invalid.context,
            },
            invalid.errors,
        )
        .into_response(),
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Books
        .route("/books", get(books::list_books))
        .route("/book/create", get(books::create_book_form).post(books::create_book))
        .route("/book/:id", get(books::get_book))
        .route("/book/:id/delete", get(books::delete_book_form).post(books::delete_book))
        .route("/book/:id/update", get(books::update_book_form).post(books::update_book))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/author/create", get(authors::create_author_form).post(authors::create_author))
        .route("/author/:id", get(authors::get_author))
        .route("/author/:id/delete", get(authors::delete_author_form).post(authors::delete_author))
        .route("/author/:id/update", get(authors::update_author_form).post(authors::update_author))
        // Genres
        .route("/genres", get(genres::list_genres))
        .route("/genre/create", get(genres::create_genre_form).post(genres::create_genre))
        .route("/genre/:id", get(genres::get_genre))
        .route("/genre/:id/delete", get(genres::delete_genre_form).post(genres::delete_genre))
        .route("/genre/:id/update", get(genres::update_genre_form).post(genres::update_genre))
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form).post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form).post(book_instances::delete_book_instance),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_book_instance_form).post(book_instances::update_book_instance),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state)
        .merge(openapi::create_openapi_router())
}
