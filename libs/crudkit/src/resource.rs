use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A stored entity addressed by an opaque id.
///
/// Implementations own the mapping between the full record (identity,
/// timestamps, soft-delete marker) and its wire body, which carries only
/// the client-writable fields. Identity and timestamps are assigned by
/// the storage layer, never by clients.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Client-writable fields, used both as request payload and as the
    /// response representation.
    type Body: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Noun used in log lines and not-found messages.
    const KIND: &'static str;

    /// Materialize a fresh record from a wire body.
    fn assemble(id: Uuid, now: DateTime<Utc>, body: Self::Body) -> Self;

    fn id(&self) -> Uuid;

    /// Project the record back onto its wire body.
    fn body(&self) -> Self::Body;

    /// Replace the writable fields and bump the update timestamp.
    fn set_body(&mut self, body: Self::Body, now: DateTime<Utc>);

    /// Soft-delete marker. A marked record is invisible to reads.
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn mark_deleted(&mut self, now: DateTime<Utc>);
}
