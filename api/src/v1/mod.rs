use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TODO_DELETED: &str = "Todo deleted successfully";
pub const TODO_NOT_FOUND: &str = "Todo not found";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request. Anything besides `text` is ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of an update request. Updates replace the whole record, so both
/// `text` and `completed` are expected; they are optional here only so the
/// server can report which one is missing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
