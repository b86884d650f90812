use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::TodoStore;
use crate::{
    api::errors::TodoApiError,
    models::todo_model::{Todo, TodoPatch},
};

/// Process lifetime store, todos are kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
}

fn poisoned<T>(_: PoisonError<T>) -> TodoApiError {
    log::error!("Todo list lock poisoned");
    TodoApiError::InternalServerError
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two sample todos a fresh install starts with
    pub fn with_samples() -> Self {
        let mut learn = Todo::from_title(String::from("Learn the CI/CD pipeline"));
        learn.completed = true;

        let build = Todo::from_title(String::from("Build the backend with actix-web"));

        Self {
            todos: RwLock::new(vec![learn, build]),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Todo>>, TodoApiError> {
        self.todos.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Todo>>, TodoApiError> {
        self.todos.write().map_err(poisoned)
    }
}

impl TodoStore for MemoryStore {
    fn list(&self) -> Result<Vec<Todo>, TodoApiError> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<Todo>, TodoApiError> {
        Ok(self.read()?.iter().find(|todo| todo.id == id).cloned())
    }

    fn create(&self, title: String) -> Result<Todo, TodoApiError> {
        let todo = Todo::from_title(title);

        self.write()?.push(todo.clone());

        Ok(todo)
    }

    fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, TodoApiError> {
        let mut todos = self.write()?;

        match todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.apply(patch);
                Ok(Some(todo.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: Uuid) -> Result<bool, TodoApiError> {
        let mut todos = self.write()?;

        match todos.iter().position(|todo| todo.id == id) {
            Some(index) => {
                todos.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
