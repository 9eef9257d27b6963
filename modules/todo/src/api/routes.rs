use std::sync::Arc;

use axum::Router;
use crudkit::{rest, UseCase};

use crate::model::Todo;

/// Path prefix this module answers under.
pub const PREFIX: &str = "todo";

/// Mount the todo CRUD surface on a fresh router.
pub fn router(uc: Arc<UseCase<Todo>>) -> Router {
    rest::resource_router::<Todo>(PREFIX, uc)
}
