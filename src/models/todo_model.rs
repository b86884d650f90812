use crate::schema::*;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Insertable, Queryable)]
#[table_name = "todos"]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: uuid::Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a `Todo`, only the fields that are `Some` are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Timestamps are kept at microsecond precision, which is what postgres stores
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl Todo {
    /// Builds a fresh, not completed todo with a new id
    pub fn from_title(title: String) -> Self {
        let created_at = now();

        Self {
            id: uuid::Uuid::new_v4(),
            title,
            completed: false,
            created_at,
            updated_at: created_at,
        }
    }

    /// Merge the present fields of `patch` and refresh `updated_at`
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }

        if let Some(completed) = patch.completed {
            self.completed = completed;
        }

        self.touch();
    }

    /// `updated_at` always moves forward, even when two updates land in the same microsecond
    fn touch(&mut self) {
        let floor = self.updated_at + Duration::microseconds(1);

        self.updated_at = std::cmp::max(now(), floor);
    }
}
