use reqwest::{
    blocking::{Client, Response},
    header::CONTENT_TYPE,
    StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::{
    config::API_URL,
    errors::TodoError,
    models::todo_model::{Todo, TodoPatch},
    utils::{make_api_url, make_url},
};

#[derive(Debug, Deserialize)]
struct TodosEnvelope {
    todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
struct TodoEnvelope {
    todo: Todo,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
}

/// Operations the client side needs from the todo api
pub trait TodoApi {
    fn fetch_todos(&self) -> Result<Vec<Todo>, TodoError>;

    fn create_todo(&self, title: &str) -> Result<Todo, TodoError>;

    fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, TodoError>;

    fn delete_todo(&self, id: Uuid) -> Result<(), TodoError>;
}

/// Blocking http client for the todo api
pub struct HttpTodoClient {
    base_url: String,
    client: Client,
}

impl HttpTodoClient {
    pub fn new(base_url: &str) -> Self {
        HttpTodoClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Client for the url picked by `TODO_API_URL` / `TODO_ENV`
    pub fn from_env() -> Self {
        Self::new(API_URL.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health(&self) -> Result<Health, TodoError> {
        let response = self.client.get(make_url(&self.base_url, "health")).send()?;

        handle_response(response)
    }

    fn todo_url(&self, id: Uuid) -> String {
        make_api_url(&self.base_url, &format!("todos/{}", id))
    }
}

impl TodoApi for HttpTodoClient {
    fn fetch_todos(&self) -> Result<Vec<Todo>, TodoError> {
        let response = self
            .client
            .get(make_api_url(&self.base_url, "todos"))
            .send()?;

        handle_response::<TodosEnvelope>(response).map(|envelope| envelope.todos)
    }

    fn create_todo(&self, title: &str) -> Result<Todo, TodoError> {
        let response = self
            .client
            .post(make_api_url(&self.base_url, "todos"))
            .header(CONTENT_TYPE, "application/json")
            .json(&serde_json::json!({ "title": title }))
            .send()?;

        handle_response::<TodoEnvelope>(response).map(|envelope| envelope.todo)
    }

    fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, TodoError> {
        let response = self
            .client
            .put(self.todo_url(id))
            .header(CONTENT_TYPE, "application/json")
            .json(patch)
            .send()?;

        handle_response::<TodoEnvelope>(response).map(|envelope| envelope.todo)
    }

    fn delete_todo(&self, id: Uuid) -> Result<(), TodoError> {
        let response = self.client.delete(self.todo_url(id)).send()?;

        let envelope = handle_response::<MessageEnvelope>(response)?;

        log::debug!("Deleted todo {}: {}", id, envelope.message);

        Ok(())
    }
}

/// Handle http request response
fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, TodoError> {
    let status = response.status();
    let body = response.text()?;

    decode_body(status, &body)
}

/// Decodes a success body, or turns the `{"error": ..}` envelope into a `TodoError`
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, TodoError> {
    if status.is_success() {
        return Ok(serde_json::from_str(body)?);
    }

    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    Err(TodoError::ApiError {
        status: status.as_u16(),
        message,
    })
}
