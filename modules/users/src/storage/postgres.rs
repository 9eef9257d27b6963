use async_trait::async_trait;
use chrono::Utc;
use crudkit::{
    repo::{page_offset, Repository, PAGE_SIZE},
    RepoError, Resource,
};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::model::{User, UserBody};

/// PostgreSQL-backed user repository. Same shape as the todo variant:
/// conditional single-statement writes, soft delete via `deleted_at`.
pub struct PostgresUserRepository {
    pool: PgPool,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    gender      TEXT NOT NULL,
    password    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ
)
"#;

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }
}

fn storage(err: sqlx::Error) -> RepoError {
    RepoError::storage(err.to_string())
}

fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        gender: row.try_get("gender")?,
        password: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl Repository<User> for PostgresUserRepository {
    async fn create(&self, body: UserBody) -> Result<Uuid, RepoError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, name, email, gender, password, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(&body.name)
        .bind(&body.email)
        .bind(&body.gender)
        .bind(&body.password)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(id)
    }

    async fn list(&self, page: i64) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, name, email, gender, password, created_at, updated_at, deleted_at \
             FROM users WHERE deleted_at IS NULL ORDER BY created_at LIMIT $1 OFFSET $2",
        )
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter()
            .map(row_to_user)
            .collect::<Result<_, _>>()
            .map_err(storage)
    }

    async fn get(&self, id: Uuid) -> Result<User, RepoError> {
        let row = sqlx::query(
            "SELECT id, name, email, gender, password, created_at, updated_at, deleted_at \
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| RepoError::not_found(User::KIND, id))?;

        row_to_user(&row).map_err(storage)
    }

    async fn update(&self, id: Uuid, body: UserBody) -> Result<Uuid, RepoError> {
        let result = sqlx::query(
            "UPDATE users SET name = $1, email = $2, gender = $3, password = $4, \
             updated_at = $5 WHERE id = $6 AND deleted_at IS NULL",
        )
        .bind(&body.name)
        .bind(&body.email)
        .bind(&body.gender)
        .bind(&body.password)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(User::KIND, id));
        }
        Ok(id)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, RepoError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(User::KIND, id));
        }
        Ok(id)
    }
}
