//! In-memory record store backend.

use tokio::sync::RwLock;

use crate::{Patch, Predicate, RecordId, RecordStore, StoreResult};

/// Process-local [`RecordStore`] over an ordered vector behind a
/// `tokio::sync::RwLock`.
///
/// Records stay in insertion order. Conditional updates run their predicate
/// and patch while holding the write lock, so a concurrent caller can never
/// observe a lost update — the loser of a race sees a zero modified count.
pub struct MemoryStore<T> {
    records: RwLock<Vec<(RecordId, T)>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn insert(&self, doc: T) -> StoreResult<RecordId> {
        let id = RecordId::generate();
        self.records.write().await.push((id.clone(), doc));
        tracing::debug!(record_id = %id, "record inserted");
        Ok(id)
    }

    async fn find_by_id(&self, id: &RecordId) -> StoreResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|(record_id, _)| record_id == id)
            .map(|(_, doc)| doc.clone()))
    }

    async fn find_one(&self, predicate: Predicate<T>) -> StoreResult<Option<(RecordId, T)>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|(_, doc)| predicate(doc))
            .map(|(id, doc)| (id.clone(), doc.clone())))
    }

    async fn update_by_id(
        &self,
        id: &RecordId,
        predicate: Predicate<T>,
        patch: Patch<T>,
    ) -> StoreResult<u64> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|(record_id, _)| record_id == id) {
            Some((_, doc)) if predicate(doc) => {
                patch(doc);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: &RecordId) -> StoreResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|(record_id, _)| record_id != id);
        let deleted = (before - records.len()) as u64;
        if deleted > 0 {
            tracing::debug!(record_id = %id, "record deleted");
        }
        Ok(deleted)
    }

    async fn list(&self, limit: usize) -> StoreResult<Vec<(RecordId, T)>> {
        let records = self.records.read().await;
        Ok(records.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        label: &'static str,
        value: u32,
    }

    fn counter(label: &'static str) -> Counter {
        Counter { label, value: 0 }
    }

    #[tokio::test]
    async fn insert_then_find_returns_the_document() {
        let store = MemoryStore::new();
        let id = store.insert(counter("a")).await.unwrap();
        let found = store.find_by_id(&id).await.unwrap();
        assert_eq!(found, Some(counter("a")));
    }

    #[tokio::test]
    async fn find_with_unknown_id_returns_none() {
        let store = MemoryStore::<Counter>::new();
        let missing = store.find_by_id(&RecordId::generate()).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn update_applies_patch_when_predicate_holds() {
        let store = MemoryStore::new();
        let id = store.insert(counter("a")).await.unwrap();

        let modified = store
            .update_by_id(
                &id,
                Box::new(|doc: &Counter| doc.value == 0),
                Box::new(|doc: &mut Counter| doc.value = 7),
            )
            .await
            .unwrap();

        assert_eq!(modified, 1);
        assert_eq!(store.find_by_id(&id).await.unwrap().unwrap().value, 7);
    }

    #[tokio::test]
    async fn update_reports_zero_when_predicate_rejects() {
        let store = MemoryStore::new();
        let id = store.insert(counter("a")).await.unwrap();

        let modified = store
            .update_by_id(
                &id,
                Box::new(|doc: &Counter| doc.value == 99),
                Box::new(|doc: &mut Counter| doc.value = 7),
            )
            .await
            .unwrap();

        assert_eq!(modified, 0);
        assert_eq!(store.find_by_id(&id).await.unwrap().unwrap().value, 0);
    }

    #[tokio::test]
    async fn update_reports_zero_for_unknown_id() {
        let store = MemoryStore::<Counter>::new();
        let modified = store
            .update_by_id(
                &RecordId::generate(),
                Box::new(|_: &Counter| true),
                Box::new(|doc: &mut Counter| doc.value = 7),
            )
            .await
            .unwrap();
        assert_eq!(modified, 0);
    }

    #[tokio::test]
    async fn delete_reports_how_many_records_went_away() {
        let store = MemoryStore::new();
        let id = store.insert(counter("a")).await.unwrap();

        assert_eq!(store.delete_by_id(&id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(&id).await.unwrap(), 0);
        assert_eq!(store.find_by_id(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order_and_honors_the_limit() {
        let store = MemoryStore::new();
        for label in ["a", "b", "c"] {
            store.insert(counter(label)).await.unwrap();
        }

        let all = store.list(100).await.unwrap();
        let labels: Vec<_> = all.iter().map(|(_, doc)| doc.label).collect();
        assert_eq!(labels, ["a", "b", "c"]);

        let page = store.list(2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].1.label, "a");
    }

    #[tokio::test]
    async fn find_one_returns_the_first_match_in_store_order() {
        let store = MemoryStore::new();
        store.insert(counter("a")).await.unwrap();
        let b_id = store.insert(counter("b")).await.unwrap();
        store.insert(counter("b")).await.unwrap();

        let hit = store
            .find_one(Box::new(|doc: &Counter| doc.label == "b"))
            .await
            .unwrap();
        assert_eq!(hit.map(|(id, _)| id), Some(b_id));
    }

    #[tokio::test]
    async fn racing_conditional_updates_leave_exactly_one_winner() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let id = store.insert(counter("a")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_by_id(
                        &id,
                        Box::new(|doc: &Counter| doc.value == 0),
                        Box::new(|doc: &mut Counter| doc.value += 1),
                    )
                    .await
                    .unwrap()
            }));
        }

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }

        assert_eq!(total, 1);
        assert_eq!(store.find_by_id(&id).await.unwrap().unwrap().value, 1);
    }
}
