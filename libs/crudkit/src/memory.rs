use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    error::RepoError,
    repo::{page_offset, Repository, PAGE_SIZE},
    resource::Resource,
};

/// In-process repository backed by a guarded map.
///
/// The lock lives inside the repository boundary so callers stay unaware
/// of it. An insertion-order index gives `list` the same stable paging
/// behavior as the relational backend.
pub struct MemoryRepository<R> {
    state: RwLock<State<R>>,
}

struct State<R> {
    records: HashMap<Uuid, R>,
    order: Vec<Uuid>,
}

impl<R: Resource> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                records: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl<R: Resource> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for MemoryRepository<R> {
    async fn create(&self, body: R::Body) -> Result<Uuid, RepoError> {
        let id = Uuid::new_v4();
        let mut state = self.state.write();
        state.records.insert(id, R::assemble(id, Utc::now(), body));
        state.order.push(id);
        Ok(id)
    }

    async fn list(&self, page: i64) -> Result<Vec<R>, RepoError> {
        let state = self.state.read();
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.records.get(id))
            .filter(|r| r.deleted_at().is_none())
            .skip(page_offset(page) as usize)
            .take(PAGE_SIZE as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<R, RepoError> {
        let state = self.state.read();
        state
            .records
            .get(&id)
            .filter(|r| r.deleted_at().is_none())
            .cloned()
            .ok_or_else(|| RepoError::not_found(R::KIND, id))
    }

    async fn update(&self, id: Uuid, body: R::Body) -> Result<Uuid, RepoError> {
        let mut state = self.state.write();
        let record = state
            .records
            .get_mut(&id)
            .filter(|r| r.deleted_at().is_none())
            .ok_or_else(|| RepoError::not_found(R::KIND, id))?;
        record.set_body(body, Utc::now());
        Ok(id)
    }

    async fn delete(&self, id: Uuid) -> Result<Uuid, RepoError> {
        let mut state = self.state.write();
        let record = state
            .records
            .get_mut(&id)
            .filter(|r| r.deleted_at().is_none())
            .ok_or_else(|| RepoError::not_found(R::KIND, id))?;
        record.mark_deleted(Utc::now());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        text: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct NoteBody {
        text: String,
    }

    impl Resource for Note {
        type Body = NoteBody;
        const KIND: &'static str = "note";

        fn assemble(id: Uuid, now: DateTime<Utc>, body: NoteBody) -> Self {
            Self {
                id,
                text: body.text,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn body(&self) -> NoteBody {
            NoteBody {
                text: self.text.clone(),
            }
        }

        fn set_body(&mut self, body: NoteBody, now: DateTime<Utc>) {
            self.text = body.text;
            self.updated_at = now;
        }

        fn deleted_at(&self) -> Option<DateTime<Utc>> {
            self.deleted_at
        }

        fn mark_deleted(&mut self, now: DateTime<Utc>) {
            self.deleted_at = Some(now);
        }
    }

    fn body(text: &str) -> NoteBody {
        NoteBody {
            text: text.to_string(),
        }
    }

    fn repo() -> MemoryRepository<Note> {
        MemoryRepository::new()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = repo();
        let id = repo.create(body("first")).await.unwrap();
        assert!(!id.is_nil());

        let note = repo.get(id).await.unwrap();
        assert_eq!(note.id, id);
        assert_eq!(note.body(), body("first"));
        assert!(note.deleted_at.is_none());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let repo = repo();
        let id = Uuid::new_v4();

        assert!(repo.get(id).await.unwrap_err().is_not_found());
        assert!(repo.update(id, body("x")).await.unwrap_err().is_not_found());
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_replaces_body_and_keeps_identity() {
        let repo = repo();
        let id = repo.create(body("before")).await.unwrap();
        let created = repo.get(id).await.unwrap();

        repo.update(id, body("after")).await.unwrap();

        let updated = repo.get(id).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.text, "after");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_is_soft_and_not_repeatable() {
        let repo = repo();
        let id = repo.create(body("gone")).await.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), id);

        // The record is retained but invisible to every read path.
        assert!(repo.get(id).await.unwrap_err().is_not_found());
        assert!(repo.list(1).await.unwrap().is_empty());
        assert!(repo.update(id, body("x")).await.unwrap_err().is_not_found());
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
        assert!(repo.state.read().records.contains_key(&id));
    }

    #[tokio::test]
    async fn list_pages_in_insertion_order() {
        let repo = repo();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(repo.create(body(&format!("note {i}"))).await.unwrap());
        }

        let page1: Vec<Uuid> = repo.list(1).await.unwrap().iter().map(Note::id).collect();
        let page2: Vec<Uuid> = repo.list(2).await.unwrap().iter().map(Note::id).collect();
        let page3: Vec<Uuid> = repo.list(3).await.unwrap().iter().map(Note::id).collect();

        assert_eq!(page1, ids[0..2]);
        assert_eq!(page2, ids[2..4]);
        assert_eq!(page3, ids[4..5]);
        assert!(repo.list(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn page_zero_behaves_like_page_one() {
        let repo = repo();
        for i in 0..3 {
            repo.create(body(&format!("note {i}"))).await.unwrap();
        }

        let zero: Vec<Uuid> = repo.list(0).await.unwrap().iter().map(Note::id).collect();
        let one: Vec<Uuid> = repo.list(1).await.unwrap().iter().map(Note::id).collect();
        assert_eq!(zero, one);
        assert_eq!(one.len(), PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn deleted_records_do_not_occupy_page_slots() {
        let repo = repo();
        let mut ids = Vec::new();
        for i in 0..4 {
            ids.push(repo.create(body(&format!("note {i}"))).await.unwrap());
        }

        repo.delete(ids[1]).await.unwrap();

        let page1: Vec<Uuid> = repo.list(1).await.unwrap().iter().map(Note::id).collect();
        assert_eq!(page1, vec![ids[0], ids[2]]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_creates_yield_distinct_retrievable_records() {
        let repo = Arc::new(repo());

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(body(&format!("note {i}"))).await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());

        for id in ids {
            assert_eq!(repo.get(id).await.unwrap().id, id);
        }
    }
}
