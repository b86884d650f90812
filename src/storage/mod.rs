mod memory;
mod postgres;

use std::sync::Arc;

pub use memory::MemoryStore;
pub use postgres::PgStore;
use uuid::Uuid;

use crate::{
    api::errors::TodoApiError,
    config::{Settings, StorageBackend},
    models::todo_model::{Todo, TodoPatch},
};

/// Storage for todos, shared by every request handler.
///
/// Calls are blocking, handlers run them inside `web::block`.
pub trait TodoStore: Send + Sync {
    /// Every stored todo, order is up to the backend
    fn list(&self) -> Result<Vec<Todo>, TodoApiError>;

    fn get(&self, id: Uuid) -> Result<Option<Todo>, TodoApiError>;

    /// Stores a new todo for an already validated `title`
    fn create(&self, title: String) -> Result<Todo, TodoApiError>;

    /// Returns `None` if there is no todo with `id`
    fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, TodoApiError>;

    /// Returns `false` if there is no todo with `id`
    fn delete(&self, id: Uuid) -> Result<bool, TodoApiError>;
}

/// Creates the store selected by `settings`
pub fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match settings.storage {
        StorageBackend::Memory => {
            if settings.seed_samples {
                Arc::new(MemoryStore::with_samples())
            } else {
                Arc::new(MemoryStore::new())
            }
        }
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for postgres storage"))?;

            Arc::new(PgStore::connect(database_url, settings.db_pool_size)?)
        }
    };

    Ok(store)
}
