//! Shared catalog operations over a record store.
//!
//! Books and e-books expose the same add/get/list/remove surface; only books
//! carry lending state on top. The shared part lives here so the lending
//! operations stay where they belong, on the book service alone.

use std::sync::Arc;

use libris_store::{RecordId, RecordStore};

use crate::error::DomainError;

/// Hard cap on a listing page. A contract constant, not a tuning knob.
pub const LIST_LIMIT: usize = 100;

/// Store-backed CRUD for one document type.
pub struct Catalog<T> {
    store: Arc<dyn RecordStore<T>>,
    kind: &'static str,
}

impl<T> Catalog<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `kind` names the record type in error messages ("book", "ebook").
    pub fn new(store: Arc<dyn RecordStore<T>>, kind: &'static str) -> Self {
        Self { store, kind }
    }

    /// Validate a caller-supplied id token. Rejects malformed tokens before
    /// any store access.
    pub fn parse_id(&self, raw: &str) -> Result<RecordId, DomainError> {
        RecordId::parse(raw).map_err(|_| DomainError::MalformedId(raw.to_string()))
    }

    pub async fn add(&self, doc: T) -> Result<RecordId, DomainError> {
        Ok(self.store.insert(doc).await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<(RecordId, T), DomainError> {
        let id = self.parse_id(raw_id)?;
        let doc = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: self.kind,
                id: raw_id.to_string(),
            })?;
        Ok((id, doc))
    }

    pub async fn list(&self) -> Result<Vec<(RecordId, T)>, DomainError> {
        Ok(self.store.list(LIST_LIMIT).await?)
    }

    pub async fn remove(&self, raw_id: &str) -> Result<RecordId, DomainError> {
        let id = self.parse_id(raw_id)?;
        let deleted = self.store.delete_by_id(&id).await?;
        if deleted == 0 {
            return Err(DomainError::NotFound {
                kind: self.kind,
                id: raw_id.to_string(),
            });
        }
        Ok(id)
    }

    /// Direct store access for operations beyond plain CRUD.
    pub fn store(&self) -> &Arc<dyn RecordStore<T>> {
        &self.store
    }
}
