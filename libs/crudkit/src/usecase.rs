use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{error::RepoError, repo::Repository, resource::Resource};

/// Orchestration layer between transport and storage.
///
/// Today every method delegates straight to the repository; business
/// rules (field validation, authorization, cross-resource checks) land
/// here without touching transport or storage.
pub struct UseCase<R: Resource> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Resource> UseCase<R> {
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, body: R::Body) -> Result<Uuid, RepoError> {
        debug!(kind = R::KIND, "create");
        self.repo.create(body).await
    }

    pub async fn list(&self, page: i64) -> Result<Vec<R>, RepoError> {
        debug!(kind = R::KIND, page, "list");
        self.repo.list(page).await
    }

    pub async fn get(&self, id: Uuid) -> Result<R, RepoError> {
        debug!(kind = R::KIND, %id, "get");
        self.repo.get(id).await
    }

    pub async fn update(&self, id: Uuid, body: R::Body) -> Result<Uuid, RepoError> {
        debug!(kind = R::KIND, %id, "update");
        self.repo.update(id, body).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<Uuid, RepoError> {
        debug!(kind = R::KIND, %id, "delete");
        self.repo.delete(id).await
    }
}
