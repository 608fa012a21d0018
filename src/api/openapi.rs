//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, catalog, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "1.0.0",
        description = "Library catalog of authors, books, genres and book copies"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::index,
        // Books
        books::list_books,
        books::get_book,
        books::create_book_form,
        books::create_book,
        books::delete_book_form,
        books::delete_book,
        books::update_book_form,
        books::update_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::delete_author_form,
        authors::delete_author,
        authors::update_author_form,
        authors::update_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre_form,
        genres::create_genre,
        genres::delete_genre_form,
        genres::delete_genre,
        genres::update_genre_form,
        genres::update_genre,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        book_instances::delete_book_instance_form,
        book_instances::delete_book_instance,
        book_instances::update_book_instance_form,
        book_instances::update_book_instance,
    ),
    components(
        schemas(
            // Stored documents
            crate::models::Author,
            crate::models::Book,
            crate::models::Genre,
            crate::models::BookInstance,
            crate::models::InstanceStatus,
            crate::models::Reference,
            // Forms
            crate::models::AuthorForm,
            crate::models::BookForm,
            crate::models::GenreForm,
            crate::models::GenreRenameForm,
            crate::models::BookInstanceForm,
            crate::validation::FieldError,
            // Catalog
            crate::services::books::DashboardCounts,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog home page"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "bookinstances", description = "Book copy management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/catalog",
            "/catalog/books",
            "/catalog/book/{id}/update",
            "/catalog/author/{id}/delete",
            "/catalog/genre/create",
            "/catalog/bookinstance/{id}",
            "/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
