//! HTTP API tests, driving the router in-process

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use stacks_server::{api, AppState};

fn router(db: &common::TestDb) -> Router {
    api::create_router(AppState {
        services: Arc::new(db.services.clone()),
    })
}

async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header(api::USER_ID_HEADER, user);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health_and_readiness() {
    let db = common::setup().await;
    let app = router(&db);

    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_list_books_with_availability() {
    let db = common::setup().await;
    let catalog = common::seed_catalog(&db.pool).await;
    let alice = common::add_user(&db.pool, "alice").await;
    db.services.circulation.checkout(alice, catalog.dune).await.unwrap();
    let app = router(&db);

    let (status, body) = send(&app, "GET", "/api/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 7);

    let dune = books.iter().find(|b| b["title"] == "Dune").unwrap();
    assert_eq!(dune["available"], false);
    assert_eq!(dune["genres"], serde_json::json!(["Science Fiction", "Adventure"]));
    assert!(dune["abstract"].is_null());

    let hobbit = books.iter().find(|b| b["title"] == "The Hobbit").unwrap();
    assert_eq!(hobbit["available"], true);
}

#[tokio::test]
async fn test_list_books_filtered_by_query() {
    let db = common::setup().await;
    common::seed_catalog(&db.pool).await;
    let app = router(&db);

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/books?genres=Fantasy,%20Adventure&genre_mode=all",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "The Hobbit");

    let (status, body) = send(&app, "GET", "/api/v1/books?genre_mode=all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);

    let (status, body) = send(&app, "GET", "/api/v1/books?title=zzz-no-such-book", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoMatch");
}

#[tokio::test]
async fn test_book_detail_with_caller_status() {
    let db = common::setup().await;
    let catalog = common::seed_catalog(&db.pool).await;
    let alice = common::add_user(&db.pool, "alice").await;
    db.services.circulation.checkout(alice, catalog.dracula).await.unwrap();
    let app = router(&db);

    let uri = format!("/api/v1/books/{}", catalog.dracula);
    let (status, body) = send(&app, "GET", &uri, Some(&alice.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "Bram Stoker");
    assert_eq!(body["status"]["can_checkout"], false);
    assert_eq!(body["status"]["can_check_in"], true);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["status"].is_null());

    let (status, body) = send(&app, "GET", &uri, Some("0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidIdentifier");

    let (status, body) = send(&app, "GET", &uri, Some("abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidIdentifier");

    let (status, body) = send(&app, "GET", "/api/v1/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidIdentifier");

    let (status, _) = send(&app, "GET", "/api/v1/books/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_and_check_in_flow() {
    let db = common::setup().await;
    let catalog = common::seed_catalog(&db.pool).await;
    let alice = common::add_user(&db.pool, "alice").await.to_string();
    let bob = common::add_user(&db.pool, "bob").await.to_string();
    let app = router(&db);

    let checkout = format!("/api/v1/books/{}/checkout", catalog.hobbit);
    let checkin = format!("/api/v1/books/{}/checkin", catalog.hobbit);

    let (status, body) = send(&app, "POST", &checkout, Some(&alice)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book_id"], catalog.hobbit);

    let (status, body) = send(&app, "POST", &checkout, Some(&alice)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyLoanedBySelf");

    let (status, body) = send(&app, "POST", &checkout, Some(&bob)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyLoanedByOther");

    let (status, body) = send(&app, "GET", "/api/v1/me/loans", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["title"], "The Hobbit");

    let (status, body) = send(&app, "GET", "/api/v1/loans/book-ids", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([catalog.hobbit]));

    let (status, body) = send(&app, "POST", &checkin, Some(&bob)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NothingToReturn");

    let (status, body) = send(&app, "POST", &checkin, Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");

    let (status, _) = send(&app, "POST", &checkout, Some(&bob)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_caller_identity_is_required() {
    let db = common::setup().await;
    let catalog = common::seed_catalog(&db.pool).await;
    let app = router(&db);

    let checkout = format!("/api/v1/books/{}/checkout", catalog.dune);

    let (status, body) = send(&app, "POST", &checkout, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, body) = send(&app, "POST", &checkout, Some("0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidIdentifier");

    let (status, _) = send(&app, "POST", "/api/v1/books/-4/checkout", Some("1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
