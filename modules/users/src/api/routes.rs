use std::sync::Arc;

use axum::Router;
use crudkit::{rest, UseCase};

use crate::model::User;

/// Path prefix this module answers under.
pub const PREFIX: &str = "user";

/// Mount the user CRUD surface on a fresh router.
pub fn router(uc: Arc<UseCase<User>>) -> Router {
    rest::resource_router::<User>(PREFIX, uc)
}
