//! HTTP transport: axum handlers generalized over the resource type and
//! a router builder that mounts the full CRUD surface under one prefix.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing, Extension, Router};

use crate::{resource::Resource, usecase::UseCase};

/// Mount the CRUD surface for one resource under `/<prefix>/`.
///
/// The use case rides along as a typed extension, so routers for
/// different resources can be merged into one application without
/// clashing.
pub fn resource_router<R: Resource>(prefix: &str, uc: Arc<UseCase<R>>) -> Router {
    let collection = format!("/{prefix}/");
    let item = format!("/{prefix}/{{id}}");

    Router::new()
        .route(
            &collection,
            routing::post(handlers::create::<R>).get(handlers::list::<R>),
        )
        .route(
            &item,
            routing::get(handlers::get_by_id::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
        .layer(Extension(uc))
}
