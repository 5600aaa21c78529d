use std::{collections::HashMap, io, path::PathBuf};

use chrono::{DateTime, Duration, Utc};
use jot_api::v1::Todo;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

pub const TEXT_REQUIRED: &str = "Todo text is required";
pub const COMPLETED_REQUIRED: &str = "Todo completed flag is required";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("Todo not found")]
    NotFound,

    #[error("failed to access data file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode data file: {0}")]
    Decode(#[from] ron::error::SpannedError),

    #[error("failed to encode data file: {0}")]
    Encode(#[from] ron::Error),
}

/// The todo collection.
///
/// Records live in memory and, when the store was opened from a path, every
/// successful mutation rewrites the data file before the write lock is
/// released. A mutation whose write fails is rolled back.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            todos: RwLock::new(HashMap::new()),
        }
    }

    /// Opens the data file at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let todos = match fs::read_to_string(&path).await {
            Ok(contents) => match ron::de::from_str(&contents)? {
                DataOwned::V1 { todos } => todos,
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path: Some(path),
            todos: RwLock::new(todos),
        })
    }

    /// Every record, newest first.
    pub async fn list(&self) -> Vec<Todo> {
        let todos = self.todos.read().await;
        let mut todos: Vec<_> = todos.values().cloned().collect();
        todos.sort_unstable_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        todos
    }

    pub async fn create(&self, text: Option<&str>) -> Result<Todo, StoreError> {
        let text = validate_text(text)?;
        let now = Utc::now();

        let todo = Todo {
            id: Uuid::new_v4(),
            text,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let mut todos = self.todos.write().await;
        todos.insert(todo.id, todo.clone());

        if let Err(err) = self.persist(&todos).await {
            todos.remove(&todo.id);
            return Err(err);
        }

        Ok(todo)
    }

    /// Replaces `text` and `completed` of the record with `id`.
    pub async fn update(
        &self,
        id: Uuid,
        text: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Todo, StoreError> {
        let text = validate_text(text)?;
        let completed = completed.ok_or(StoreError::Validation {
            field: "completed",
            message: COMPLETED_REQUIRED,
        })?;

        let mut todos = self.todos.write().await;
        let todo = todos.get_mut(&id).ok_or(StoreError::NotFound)?;
        let previous = todo.clone();

        todo.text = text;
        todo.completed = completed;
        todo.updated_at = advance(todo.updated_at);
        let todo = todo.clone();

        if let Err(err) = self.persist(&todos).await {
            todos.insert(id, previous);
            return Err(err);
        }

        Ok(todo)
    }

    /// Removes the record with `id` for good and returns it.
    pub async fn delete(&self, id: Uuid) -> Result<Todo, StoreError> {
        let mut todos = self.todos.write().await;
        let todo = todos.remove(&id).ok_or(StoreError::NotFound)?;

        if let Err(err) = self.persist(&todos).await {
            todos.insert(id, todo);
            return Err(err);
        }

        Ok(todo)
    }

    async fn persist(&self, todos: &HashMap<Uuid, Todo>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let data = DataBorrowed::V1 { todos };
        let contents = ron::ser::to_string_pretty(&data, Default::default())?;

        let tmp = path.with_extension("ron.tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, path).await?;

        Ok(())
    }
}

fn validate_text(text: Option<&str>) -> Result<String, StoreError> {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_owned()),
        _ => Err(StoreError::Validation {
            field: "text",
            message: TEXT_REQUIRED,
        }),
    }
}

// updatedAt must move strictly forward even if the clock has not.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();

    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

#[derive(Serialize)]
enum DataBorrowed<'a> {
    V1 { todos: &'a HashMap<Uuid, Todo> },
}

#[derive(Deserialize)]
enum DataOwned {
    V1 { todos: HashMap<Uuid, Todo> },
}
