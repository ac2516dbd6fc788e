//! API key issuance and checks.
//!
//! Keys are opaque credential strings. A key is valid while an active record
//! for it exists; there is no expiry or revocation flow.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use libris_store::{RecordStore, StoreError};

/// Stored credential record.
#[derive(Debug, Clone)]
pub struct ApiKeyDoc {
    pub key: String,
    pub active: bool,
}

/// Source of fresh key material.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generates `{prefix}_{uuid}` keys. The prefix makes keys recognizable in
/// logs without revealing anything.
pub struct UuidKeyGenerator {
    prefix: String,
}

impl UuidKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl KeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        format!("{}_{}", self.prefix, Uuid::new_v4().simple())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("api key is not recognized")]
    Denied,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Issues new API keys and answers existence checks.
pub struct ApiKeyService {
    store: Arc<dyn RecordStore<ApiKeyDoc>>,
    generator: Box<dyn KeyGenerator>,
}

impl ApiKeyService {
    pub fn new(store: Arc<dyn RecordStore<ApiKeyDoc>>, generator: Box<dyn KeyGenerator>) -> Self {
        Self { store, generator }
    }

    /// Generate a key, persist it as active, and hand it back. The key string
    /// is returned exactly once; it is never logged.
    pub async fn issue(&self) -> Result<String, AuthError> {
        let key = self.generator.generate();
        self.store
            .insert(ApiKeyDoc {
                key: key.clone(),
                active: true,
            })
            .await?;
        tracing::info!("issued a new api key");
        Ok(key)
    }

    /// Accept the key if an active record for it exists.
    pub async fn check(&self, key: &str) -> Result<(), AuthError> {
        let wanted = key.to_string();
        let hit = self
            .store
            .find_one(Box::new(move |doc: &ApiKeyDoc| {
                doc.active && doc.key == wanted
            }))
            .await?;

        match hit {
            Some(_) => Ok(()),
            None => Err(AuthError::Denied),
        }
    }
}

#[cfg(test)]
mod tests {
    use libris_store::MemoryStore;

    use super::*;

    fn service() -> (Arc<MemoryStore<ApiKeyDoc>>, ApiKeyService) {
        let store = Arc::new(MemoryStore::new());
        let svc = ApiKeyService::new(store.clone(), Box::new(UuidKeyGenerator::new("lk")));
        (store, svc)
    }

    #[test]
    fn generated_keys_carry_the_prefix_and_differ() {
        let generator = UuidKeyGenerator::new("lk");
        let a = generator.generate();
        let b = generator.generate();
        assert!(a.starts_with("lk_"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn issued_key_passes_the_check() {
        let (_, svc) = service();
        let key = svc.issue().await.unwrap();
        assert!(svc.check(&key).await.is_ok());
    }

    #[tokio::test]
    async fn never_issued_key_is_denied() {
        let (_, svc) = service();
        let result = svc.check("lk_0000000000000000").await;
        assert!(matches!(result, Err(AuthError::Denied)));
    }

    #[tokio::test]
    async fn inactive_key_is_denied() {
        let (store, svc) = service();
        store
            .insert(ApiKeyDoc {
                key: "lk_disabled".to_string(),
                active: false,
            })
            .await
            .unwrap();

        let result = svc.check("lk_disabled").await;
        assert!(matches!(result, Err(AuthError::Denied)));
    }
}
