//! API integration tests, driving the router over an in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use local_library::{
    api,
    repository::{memory::MemoryDocumentStore, Repository},
    services::Services,
    AppConfig, AppState,
};

fn app() -> Router {
    let repository = Repository::new(Arc::new(MemoryDocumentStore::new()));
    api::router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(repository)),
    })
}

async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post(app: &Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect without Location")
        .to_string()
}

/// Create through the API and return the new document's URL
async fn create(app: &Router, entity: &str, body: Value) -> String {
    let response = post(app, &format!("/catalog/{}/create", entity), body).await;
    location(&response)
}

fn id_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");

    let response = get(&app, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ready");
}

#[tokio::test]
async fn test_home_page_counts() {
    let app = app();
    create(&app, "genre", json!({ "name": "Fiction" })).await;

    let response = get(&app, "/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["title"], "Local Library Home");
    assert_eq!(body["data"]["genre_count"], 1);
    assert_eq!(body["data"]["book_count"], 0);
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_genre_create_redirects_and_is_idempotent() {
    let app = app();

    let url = create(&app, "genre", json!({ "name": "Fiction" })).await;
    assert!(url.starts_with("/catalog/genre/"));
    let again = create(&app, "genre", json!({ "name": "Fiction" })).await;
    assert_eq!(again, url);

    let body = json_body(get(&app, &url).await).await;
    assert_eq!(body["data"]["genre"]["name"], "Fiction");
    assert_eq!(body["data"]["genre"]["url"], url);
    assert_eq!(body["data"]["genre_books"], json!([]));
}

#[tokio::test]
async fn test_invalid_form_is_redisplayed_with_errors() {
    let app = app();

    let response = post(&app, "/catalog/genre/create", json!({ "name": "   " })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["title"], "Create Genre");
    assert_eq!(body["data"]["input"]["name"], "   ");
    assert_eq!(body["errors"][0]["field"], "name");
    assert_eq!(body["errors"][0]["message"], "Genre name required");

    let list = json_body(get(&app, "/catalog/genres").await).await;
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let app = app();

    let missing = format!("/catalog/book/{}", uuid::Uuid::new_v4());
    let response = get(&app, &missing).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "NoSuchDocument");

    let response = get(&app, "/catalog/book/not-an-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Delete pages of missing documents go back to the list
    let response = get(&app, &format!("/catalog/genre/{}/delete", uuid::Uuid::new_v4())).await;
    assert_eq!(location(&response), "/catalog/genres");
}

#[tokio::test]
async fn test_unsupported_updates() {
    let app = app();
    let id = uuid::Uuid::new_v4();

    let response = get(&app, &format!("/catalog/author/{}/update", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

    let response = post(
        &app,
        &format!("/catalog/bookinstance/{}/update", id),
        json!({ "book": id, "imprint": "Penguin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json_body(response).await["error"], "Unsupported");
}

#[tokio::test]
async fn test_catalog_lifecycle() {
    let app = app();

    let author = create(
        &app,
        "author",
        json!({ "first_name": "Jane", "family_name": "Austen", "date_of_birth": "1775-12-16" }),
    )
    .await;
    let genre = create(&app, "genre", json!({ "name": "Romance" })).await;

    // A single genre value is accepted as well as a list
    let book = create(
        &app,
        "book",
        json!({
            "title": "Pride and Prejudice",
            "author": id_of(&author),
            "summary": "Elizabeth Bennet and Mr Darcy.",
            "isbn": "9780141439518",
            "genre": id_of(&genre),
        }),
    )
    .await;
    let copy = create(
        &app,
        "bookinstance",
        json!({ "book": id_of(&book), "imprint": "Penguin, 2003", "status": "Available" }),
    )
    .await;

    let detail = json_body(get(&app, &book).await).await;
    assert_eq!(detail["title"], "Pride and Prejudice");
    assert_eq!(detail["data"]["book"]["author"]["name"], "Austen, Jane");
    assert_eq!(detail["data"]["book"]["genre"][0]["name"], "Romance");
    assert_eq!(detail["data"]["book_instances"][0]["url"], copy);

    let home = json_body(get(&app, "/catalog").await).await;
    assert_eq!(home["data"]["book_instance_available_count"], 1);

    // The author cannot go while the book references it
    let response = post(&app, &format!("{}/delete", author), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let blocked = json_body(response).await;
    assert_eq!(blocked["title"], "Delete Author");
    assert_eq!(blocked["data"]["author_books"][0]["url"], book);

    let response = post(&app, &format!("{}/delete", book), json!({})).await;
    assert_eq!(location(&response), "/catalog/books");
    let response = post(&app, &format!("{}/delete", author), json!({})).await;
    assert_eq!(location(&response), "/catalog/authors");

    // The copy outlives its book
    let orphan = json_body(get(&app, &copy).await).await;
    assert_eq!(orphan["data"]["imprint"], "Penguin, 2003");
    assert!(orphan["data"]["book"].is_null());
}
