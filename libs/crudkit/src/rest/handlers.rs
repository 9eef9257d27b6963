use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{resource::Resource, rest::error::ApiError, usecase::UseCase};

/// Query parameters accepted by the list operation. The page number is
/// kept as a raw string so a non-numeric value maps to the contractual
/// 400 body instead of a generic extractor rejection.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

fn parse_page(query: &ListQuery) -> Result<i64, ApiError> {
    match query.page.as_deref() {
        None | Some("") => Ok(1),
        Some(raw) => raw.parse().map_err(|_| ApiError::PageParam),
    }
}

pub async fn create<R: Resource>(
    Extension(uc): Extension<Arc<UseCase<R>>>,
    payload: Result<Json<R::Body>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    debug!(kind = R::KIND, "transport: create");
    let Json(body) = payload.map_err(|_| ApiError::InvalidPayload)?;

    match uc.create(body).await {
        Ok(id) => Ok((
            StatusCode::CREATED,
            Json(json!({ "status": "created", "id": id })),
        )),
        Err(e) => {
            error!(kind = R::KIND, error = %e, "create failed");
            Err(e.into())
        }
    }
}

pub async fn list<R: Resource>(
    Extension(uc): Extension<Arc<UseCase<R>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<R::Body>>, ApiError> {
    debug!(kind = R::KIND, "transport: list");
    let page = parse_page(&query)?;

    match uc.list(page).await {
        Ok(records) => Ok(Json(records.iter().map(Resource::body).collect())),
        Err(e) => {
            error!(kind = R::KIND, error = %e, "list failed");
            Err(e.into())
        }
    }
}

pub async fn get_by_id<R: Resource>(
    Extension(uc): Extension<Arc<UseCase<R>>>,
    Path(id): Path<String>,
) -> Result<Json<R::Body>, ApiError> {
    debug!(kind = R::KIND, id = %id, "transport: get");
    let id = parse_id(&id)?;

    match uc.get(id).await {
        Ok(record) => Ok(Json(record.body())),
        Err(e) => {
            if !e.is_not_found() {
                error!(kind = R::KIND, %id, error = %e, "get failed");
            }
            Err(e.into())
        }
    }
}

pub async fn update<R: Resource>(
    Extension(uc): Extension<Arc<UseCase<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<R::Body>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    debug!(kind = R::KIND, id = %id, "transport: update");
    let id = parse_id(&id)?;
    let Json(body) = payload.map_err(|_| ApiError::InvalidPayload)?;

    match uc.update(id, body).await {
        Ok(id) => Ok(Json(json!({ "status": "updated", "id": id }))),
        Err(e) => {
            if !e.is_not_found() {
                error!(kind = R::KIND, %id, error = %e, "update failed");
            }
            Err(e.into())
        }
    }
}

pub async fn delete<R: Resource>(
    Extension(uc): Extension<Arc<UseCase<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    debug!(kind = R::KIND, id = %id, "transport: delete");
    let id = parse_id(&id)?;

    match uc.delete(id).await {
        Ok(id) => Ok(Json(json!({ "status": "deleted", "id": id }))),
        Err(e) => {
            if !e.is_not_found() {
                error!(kind = R::KIND, %id, error = %e, "delete failed");
            }
            Err(e.into())
        }
    }
}
