use async_trait::async_trait;
use chrono::Utc;
use crudkit::{
    repo::{page_offset, Repository, PAGE_SIZE},
    RepoError, Resource,
};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::model::{Todo, TodoBody};

/// PostgreSQL-backed todo repository.
///
/// Update and delete are single conditional statements so there is no
/// read-modify-write window under concurrent writers; the database is
/// the only synchronization point.
pub struct PostgresTodoRepository {
    pool: PgPool,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS todo (
    id          UUID PRIMARY KEY,
    title       TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ
)
"#;

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet. Called once
    /// at startup; a failure here is fatal for the process.
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

fn row_to_todo(row: &PgRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl Repository<Todo> for PostgresTodoRepository {
    async fn create(&self, body: TodoBody) -> Result<Uuid, RepoError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query("INSERT INTO todo (id, title, created_at, updated_at) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&body.title)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(id)
    }

    async fn list(&self, page: i64) -> Result<Vec<Todo>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, title, created_at, updated_at, deleted_at FROM todo \
             WHERE deleted_at IS NULL ORDER BY created_at LIMIT $1 OFFSET $2",
        )
        .bind(PAGE_SIZE)
        .bind(page_offset(page))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter()
            .map(row_to_todo)
            .collect::<Result<_, _>>()
            .map_err(storage)
    }

    async fn get(&self, id: Uuid) -> Result<Todo, RepoError> {
        let row = sqlx::query(
            "SELECT id, title, created_at, updated_at, deleted_at FROM todo \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| RepoError::not_found(Todo::KIND, id))?;

        row_to_todo(&row).map_err(storage)
    }

    async fn update(&self, id: Uuid, body: TodoBody) -> Result<Uuid, RepoError> {
        let result = sqlx::query(
            "UPDATE todo SET title = $1, updated_at = $2 \
             WHERE id = $3 AND deleted_at IS NULL",
        )
        .bind(&body.title)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(Todo::KIND, id));
        }
        Ok(id)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, RepoError> {
        let result = sqlx::query(
            "UPDATE todo SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(Todo::KIND, id));
        }
        Ok(id)
    }
}
