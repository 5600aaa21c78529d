use std::sync::Arc;

use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jot_api::v1::{ErrorBody, Message, Todo};
use jot_back::{app, AppState, StoreConfig};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri("/api/todos")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn list_request() -> Request<String> {
    Request::builder()
        .uri("/api/todos")
        .body(String::new())
        .unwrap()
}

fn delete_request(query: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/api/todos{}", query))
        .body(String::new())
        .unwrap()
}

fn update_body(id: impl std::fmt::Display, text: &str, completed: bool) -> String {
    serde_json::json!({ "id": id.to_string(), "text": text, "completed": completed }).to_string()
}

fn new_app() -> Router {
    app(Arc::new(AppState::in_memory()))
}

async fn create(app: &Router, text: &str) -> Todo {
    let body = serde_json::json!({ "text": text }).to_string();
    let resp = app.clone().oneshot(json_request("POST", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn list(app: &Router) -> Vec<Todo> {
    let resp = app.clone().oneshot(list_request()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    assert!(list(&new_app()).await.is_empty());
}

#[tokio::test]
async fn list_todos_newest_first() {
    let app = new_app();

    for text in ["one", "two", "three"] {
        create(&app, text).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let todos = list(&app).await;
    let texts: Vec<_> = todos.iter().map(|todo| todo.text.as_str()).collect();
    assert_eq!(texts, ["three", "two", "one"]);
    assert!(todos.windows(2).all(|w| w[0].created_at > w[1].created_at));
}

#[tokio::test]
async fn unreadable_store_returns_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.ron");
    std::fs::write(&path, "{ definitely not ron").unwrap();

    let app = app(Arc::new(AppState::new(StoreConfig::File(path))));
    let resp = app.oneshot(list_request()).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Internal server error");
    assert!(body.field.is_none());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let app = new_app();
    let todo = create(&app, "  buy milk ").await;

    assert_eq!(todo.text, "buy milk");
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
    assert_eq!(list(&app).await, vec![todo]);
}

#[tokio::test]
async fn create_todo_ignores_completed() {
    let app = new_app();
    let resp = app
        .clone()
        .oneshot(json_request("POST", r#"{"text":"done already","completed":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert!(!todo.completed);
}

#[tokio::test]
async fn create_todo_blank_text_returns_400() {
    let app = new_app();

    for body in [r#"{}"#, r#"{"text":""}"#, r#"{"text":"   "}"#, r#"{"text":null}"#] {
        let resp = app.clone().oneshot(json_request("POST", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let error: ErrorBody = body_json(resp).await;
        assert_eq!(error.error, "Todo text is required");
        assert_eq!(error.field.as_deref(), Some("text"));
    }

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_todo_malformed_json_returns_400() {
    let app = new_app();

    for body in [r#"{"text":"#, r#"{"text":42}"#, "[]"] {
        let resp = app.clone().oneshot(json_request("POST", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let error: ErrorBody = body_json(resp).await;
        assert!(!error.error.is_empty());
    }
}

// --- update ---

#[tokio::test]
async fn update_todo_replaces_fields() {
    let app = new_app();
    let todo = create(&app, "walk dog").await;

    let resp = app
        .clone()
        .oneshot(json_request("PUT", &update_body(todo.id, "walk cat", true)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.id, todo.id);
    assert_eq!(updated.text, "walk cat");
    assert!(updated.completed);
    assert_eq!(updated.created_at, todo.created_at);
    assert!(updated.updated_at > todo.updated_at);

    assert_eq!(list(&app).await, vec![updated]);
}

#[tokio::test]
async fn update_todo_accepts_underscore_id() {
    let app = new_app();
    let todo = create(&app, "walk dog").await;

    let body = serde_json::json!({ "_id": todo.id, "text": "walk dog", "completed": true });
    let resp = app
        .clone()
        .oneshot(json_request("PUT", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert!(updated.completed);
}

#[tokio::test]
async fn update_todo_missing_field_returns_400() {
    let app = new_app();
    let todo = create(&app, "walk dog").await;

    let body = serde_json::json!({ "id": todo.id, "text": "walk dog" });
    let resp = app
        .clone()
        .oneshot(json_request("PUT", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = body_json(resp).await;
    assert_eq!(error.field.as_deref(), Some("completed"));

    let resp = app
        .clone()
        .oneshot(json_request("PUT", &update_body(todo.id, " ", false)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = body_json(resp).await;
    assert_eq!(error.field.as_deref(), Some("text"));

    assert_eq!(list(&app).await, vec![todo]);
}

#[tokio::test]
async fn update_todo_not_found() {
    let app = new_app();
    let todo = create(&app, "keep").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &update_body(uuid::Uuid::nil(), "nope", true),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorBody = body_json(resp).await;
    assert_eq!(error.error, "Todo not found");

    assert_eq!(list(&app).await, vec![todo]);
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = new_app()
        .oneshot(delete_request("?id=00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorBody = body_json(resp).await;
    assert_eq!(error.error, "Todo not found");
}

#[tokio::test]
async fn delete_todo_bad_id_returns_400() {
    let app = new_app();

    for query in ["", "?id=", "?id=not-a-uuid"] {
        let resp = app.clone().oneshot(delete_request(query)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query: {}", query);
    }
}

#[tokio::test]
async fn delete_todo_removes_only_target() {
    let app = new_app();
    let gone = create(&app, "gone").await;
    let kept = create(&app, "kept").await;

    let resp = app
        .clone()
        .oneshot(delete_request(&format!("?id={}", gone.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(list(&app).await, vec![kept]);
}

// --- persistence ---

#[tokio::test]
async fn todos_persist_across_app_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.ron");

    let first = app(Arc::new(AppState::new(StoreConfig::File(path.clone()))));
    let todo = create(&first, "remember me").await;

    let second = app(Arc::new(AppState::new(StoreConfig::File(path))));
    assert_eq!(list(&second).await, vec![todo]);
}

// --- full lifecycle ---

#[tokio::test]
async fn buy_milk_lifecycle() {
    let app = new_app();

    let todo = create(&app, "buy milk").await;
    assert_eq!(todo.text, "buy milk");
    assert!(!todo.completed);

    let resp = app
        .clone()
        .oneshot(json_request("PUT", &update_body(todo.id, "buy milk", true)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert!(updated.completed);

    let resp = app
        .clone()
        .oneshot(delete_request(&format!("?id={}", todo.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let message: Message = body_json(resp).await;
    assert_eq!(message.message, "Todo deleted successfully");

    assert!(list(&app).await.is_empty());

    let resp = app
        .clone()
        .oneshot(delete_request(&format!("?id={}", todo.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
