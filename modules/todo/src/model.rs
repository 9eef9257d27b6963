use chrono::{DateTime, Utc};
use crudkit::Resource;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo entry. Identity, timestamps and the deletion marker
/// are server-managed and stay off the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Client-writable fields of a todo entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

impl Resource for Todo {
    type Body = TodoBody;
    const KIND: &'static str = "item";

    fn assemble(id: Uuid, now: DateTime<Utc>, body: TodoBody) -> Self {
        Self {
            id,
            title: body.title,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn body(&self) -> TodoBody {
        TodoBody {
            title: self.title.clone(),
        }
    }

    fn set_body(&mut self, body: TodoBody, now: DateTime<Utc>) {
        self.title = body.title;
        self.updated_at = now;
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
    }
}
