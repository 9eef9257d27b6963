use async_trait::async_trait;
use uuid::Uuid;

use crate::{error::RepoError, resource::Resource};

/// Fixed number of records returned by one list call.
pub const PAGE_SIZE: i64 = 2;

/// Normalize a 1-based page number and derive the query offset.
pub fn page_offset(page: i64) -> i64 {
    (page.max(1) - 1) * PAGE_SIZE
}

/// Storage port for one resource type.
///
/// Identity and timestamps are owned by the implementation: `create`
/// assigns a fresh id, `update` bumps the update timestamp, `delete` is
/// always a soft delete that keeps the record around. Soft-deleted
/// records are invisible to `list` and `get`, reject `update`, and make
/// a repeated `delete` report `NotFound`.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// Persist a new record and return its generated id.
    async fn create(&self, body: R::Body) -> Result<Uuid, RepoError>;

    /// Return one page of live records in stable creation order.
    async fn list(&self, page: i64) -> Result<Vec<R>, RepoError>;

    /// Load a live record by id.
    async fn get(&self, id: Uuid) -> Result<R, RepoError>;

    /// Replace the writable fields of an existing live record.
    async fn update(&self, id: Uuid, body: R::Body) -> Result<Uuid, RepoError>;

    /// Mark a live record as deleted.
    async fn delete(&self, id: Uuid) -> Result<Uuid, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_zero_based_pages_one_based() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), PAGE_SIZE);
        assert_eq!(page_offset(3), 2 * PAGE_SIZE);
    }

    #[test]
    fn pages_below_one_normalize_to_one() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(-7), 0);
    }
}
