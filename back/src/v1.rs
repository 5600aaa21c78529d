use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use jot_api::v1::{DeleteQuery, Message, NewTodo, Todo, UpdateTodo, TODO_DELETED};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, Result},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/todos",
        get(list_todos)
            .post(create_todo)
            .put(update_todo)
            .delete(delete_todo),
    )
}

async fn list_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>> {
    let store = state.store().await?;
    Ok(Json(store.list().await))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>)> {
    let store = state.store().await?;
    let Json(input) = body?;

    let todo = store.create(input.text.as_deref()).await?;

    info!(
        id = %todo.id,
        text = %todo.text,
        "created todo"
    );

    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>> {
    let store = state.store().await?;
    let Json(input) = body?;

    let todo = store
        .update(input.id, input.text.as_deref(), input.completed)
        .await?;

    info!(
        id = %todo.id,
        text = %todo.text,
        completed = todo.completed,
        "updated todo"
    );

    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<Message>> {
    let store = state.store().await?;
    let Query(query) = query?;
    let id = parse_id(query.id.as_deref())?;

    let todo = store.delete(id).await?;

    info!(id = %todo.id, "deleted todo");

    Ok(Json(Message {
        message: String::from(TODO_DELETED),
    }))
}

fn parse_id(id: Option<&str>) -> Result<Uuid> {
    let id = id.ok_or_else(|| ApiError::BadRequest(String::from("Todo id is required")))?;
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid todo id: {}", id)))
}
