pub mod apikeys;
pub mod books;
pub mod ebooks;

use std::sync::Arc;

use libris_auth::{ApiKeyService, UuidKeyGenerator};
use libris_kernel::{settings::Settings, ModuleRegistry};
use libris_store::MemoryStore;

/// Register every application module with the registry.
///
/// Stores are built here, once per process, and injected into the modules
/// that own them. Nothing else ever touches them directly.
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    registry.register(books::create_module(Arc::new(MemoryStore::new())));
    registry.register(ebooks::create_module(Arc::new(MemoryStore::new())));

    let keys = ApiKeyService::new(
        Arc::new(MemoryStore::new()),
        Box::new(UuidKeyGenerator::new(settings.auth.key_prefix.clone())),
    );
    registry.register(apikeys::create_module(Arc::new(keys)));
}
