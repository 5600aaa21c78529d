use eyre::{bail, Context};
use jot_api::v1::{ErrorBody, Message, NewTodo, Todo, UpdateTodo, TODO_NOT_FOUND};
use reqwest::Response;
use uuid::Uuid;

pub const DEFAULT_URL: &str = "http://127.0.0.1:7890/api";

/// Talks to the `/todos` collection of a running server.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_owned();

        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base)
    }

    pub async fn list(&self) -> eyre::Result<Vec<Todo>> {
        let response = self.http.get(self.todos_url()).send().await?;
        let todos = check(response).await?.json().await?;
        Ok(todos)
    }

    pub async fn create(&self, text: &str) -> eyre::Result<Todo> {
        let todo = NewTodo {
            text: Some(text.to_owned()),
        };

        let response = self
            .http
            .post(self.todos_url())
            .json(&todo)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn update(&self, id: Uuid, text: &str, completed: bool) -> eyre::Result<Todo> {
        let todo = UpdateTodo {
            id,
            text: Some(text.to_owned()),
            completed: Some(completed),
        };

        let response = self
            .http
            .put(self.todos_url())
            .json(&todo)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Deletes the todo and returns the server's confirmation.
    pub async fn delete(&self, id: Uuid) -> eyre::Result<String> {
        let response = self
            .http
            .delete(self.todos_url())
            .query(&[("id", id.to_string())])
            .send()
            .await?;

        let message: Message = check(response).await?.json().await?;
        Ok(message.message)
    }

    /// There is no single-record endpoint, so this searches the list.
    pub async fn get(&self, id: Uuid) -> eyre::Result<Todo> {
        let todos = self.list().await?;

        match todos.into_iter().find(|todo| todo.id == id) {
            Some(todo) => Ok(todo),
            None => bail!("{}: {}", TODO_NOT_FOUND, id),
        }
    }

    pub async fn set_completed(&self, id: Uuid, completed: bool) -> eyre::Result<Todo> {
        let todo = self.get(id).await?;
        self.update(id, &todo.text, completed).await
    }

    pub async fn set_text(&self, id: Uuid, text: &str) -> eyre::Result<Todo> {
        let todo = self.get(id).await?;
        self.update(id, text, todo.completed).await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

async fn check(response: Response) -> eyre::Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body: ErrorBody = response
        .json()
        .await
        .wrap_err_with(|| format!("Request failed with {}", status))?;

    bail!("{} ({})", body.error, status)
}
