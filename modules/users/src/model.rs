use chrono::{DateTime, Utc};
use crudkit::Resource;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. Identity, timestamps and the deletion marker are
/// server-managed and stay off the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Client-writable fields of a user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub password: String,
}

impl Resource for User {
    type Body = UserBody;
    const KIND: &'static str = "user";

    fn assemble(id: Uuid, now: DateTime<Utc>, body: UserBody) -> Self {
        Self {
            id,
            name: body.name,
            email: body.email,
            gender: body.gender,
            password: body.password,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn body(&self) -> UserBody {
        UserBody {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            password: self.password.clone(),
        }
    }

    fn set_body(&mut self, body: UserBody, now: DateTime<Utc>) {
        self.name = body.name;
        self.email = body.email;
        self.gender = body.gender;
        self.password = body.password;
        self.updated_at = now;
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
    }
}
