use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use uuid::Uuid;

use super::TodoStore;
use crate::{
    api::errors::TodoApiError,
    models::{
        self,
        todo_model::{Todo, TodoPatch},
    },
    schema::todos,
};

/// Todos in a single postgres table keyed by `id`
pub struct PgStore {
    pool: models::Pool,
}

/// Full row write used after merging a patch
#[derive(AsChangeset)]
#[table_name = "todos"]
struct TodoChangeset {
    title: String,
    completed: bool,
    updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoChangeset {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            completed: todo.completed,
            updated_at: todo.updated_at,
        }
    }
}

impl PgStore {
    pub fn connect(database_url: &str, pool_size: u32) -> Result<Self, r2d2::Error> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);

        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        Ok(Self { pool })
    }
}

impl TodoStore for PgStore {
    fn list(&self) -> Result<Vec<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        Ok(todos.load::<Todo>(conn)?)
    }

    fn get(&self, todo_id: Uuid) -> Result<Option<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        Ok(todos.find(todo_id).first::<Todo>(conn).optional()?)
    }

    fn create(&self, new_title: String) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let new_todo = Todo::from_title(new_title);

        let inserted = diesel::insert_into(todos)
            .values(&new_todo)
            .get_result::<Todo>(conn)?;

        Ok(inserted)
    }

    fn update(&self, todo_id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let mut todo = match todos.find(todo_id).first::<Todo>(conn).optional()? {
            Some(todo) => todo,
            None => return Ok(None),
        };

        todo.apply(patch);

        // the row may have been deleted between the read and this write
        let updated = diesel::update(todos.find(todo_id))
            .set(&TodoChangeset::from(&todo))
            .get_result::<Todo>(conn)
            .optional()?;

        Ok(updated)
    }

    fn delete(&self, todo_id: Uuid) -> Result<bool, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let delete_count = diesel::delete(todos.find(todo_id)).execute(conn)?;

        Ok(delete_count > 0)
    }
}
