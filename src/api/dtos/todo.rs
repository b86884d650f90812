use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::{TodoApiError, TITLE_EMPTY, TITLE_REQUIRED};
use crate::models::todo_model::TodoPatch;

/// Body of `POST /api/todos`, `title` stays loose so a wrong type reads as a missing title
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateTodoDTO {
    pub title: Option<Value>,
}

impl CreateTodoDTO {
    /// The trimmed title, rejected if missing, not a string or blank
    pub fn validated_title(self) -> Result<String, TodoApiError> {
        match self.title {
            Some(Value::String(title)) if !title.trim().is_empty() => {
                Ok(title.trim().to_string())
            }
            _ => Err(TodoApiError::BadRequest(String::from(TITLE_REQUIRED))),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTodoDTO {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTodoDTO {
    /// Same title rule as create, an empty title is never stored
    pub fn into_patch(self) -> Result<TodoPatch, TodoApiError> {
        let title = match self.title {
            Some(title) if title.trim().is_empty() => {
                return Err(TodoApiError::BadRequest(String::from(TITLE_EMPTY)));
            }
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };

        Ok(TodoPatch {
            title,
            completed: self.completed,
        })
    }
}
