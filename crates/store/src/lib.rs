//! Record store abstraction for LIBRIS.
//!
//! A [`RecordStore`] is a persistent collection keyed by a store-assigned
//! [`RecordId`]. The only non-trivial guarantee it makes is that
//! [`RecordStore::update_by_id`] checks its predicate and applies its patch as
//! one indivisible step and reports how many records it actually changed.
//! Everything the lending logic knows about concurrency rests on that.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::{NoContext, Timestamp, Uuid};

pub mod memory;

pub use memory::MemoryStore;

/// Opaque identifier assigned by the store on insert.
///
/// The UUID inside is an implementation detail; callers treat the id as a
/// string token that round-trips through [`fmt::Display`] and
/// [`RecordId::parse`] without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Mint a fresh identifier. V7 keeps ids roughly time-ordered, which makes
    /// store listings line up with insertion order.
    pub fn generate() -> Self {
        Self(Uuid::new_v7(Timestamp::now(NoContext)))
    }

    /// Parse an identifier token supplied by a caller.
    pub fn parse(raw: &str) -> Result<Self, MalformedIdError> {
        Uuid::parse_str(raw).map(Self).map_err(|_| MalformedIdError {
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The supplied token is not a valid record identifier.
#[derive(Debug, Error)]
#[error("'{raw}' is not a valid record identifier")]
pub struct MalformedIdError {
    raw: String,
}

/// Failures raised by a store backend itself.
///
/// These are not contention signals — a conditional update that matches
/// nothing reports a zero count instead of an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected the operation: {0}")]
    Rejected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Predicate evaluated against a record under the store's atomicity guarantee.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send>;

/// Mutation applied to a record that passed the predicate.
pub type Patch<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Persistent collection of documents of one type.
#[async_trait]
pub trait RecordStore<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Insert a document and return its freshly assigned id.
    async fn insert(&self, doc: T) -> StoreResult<RecordId>;

    /// Fetch a document by id.
    async fn find_by_id(&self, id: &RecordId) -> StoreResult<Option<T>>;

    /// Fetch the first document matching `predicate`, in store order.
    async fn find_one(&self, predicate: Predicate<T>) -> StoreResult<Option<(RecordId, T)>>;

    /// Conditionally update one document.
    ///
    /// The predicate check and the patch happen atomically with respect to
    /// every other call on this store. Returns the number of records changed:
    /// zero when the id matches nothing or the predicate rejects the record.
    async fn update_by_id(
        &self,
        id: &RecordId,
        predicate: Predicate<T>,
        patch: Patch<T>,
    ) -> StoreResult<u64>;

    /// Delete a document by id, returning the number of records removed.
    async fn delete_by_id(&self, id: &RecordId) -> StoreResult<u64>;

    /// List up to `limit` documents in store order.
    async fn list(&self, limit: usize) -> StoreResult<Vec<(RecordId, T)>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_round_trips_through_string_form() {
        let id = RecordId::generate();
        let parsed = RecordId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn record_id_rejects_garbage_tokens() {
        for raw in ["", "not-a-uuid", "1234", "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"] {
            assert!(RecordId::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }
}
