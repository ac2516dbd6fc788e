//! LIBRIS application library.
//!
//! The application modules (books, ebooks, apikeys) and the bootstrap that
//! wires them into the kernel's module system and the HTTP server.

pub mod catalog;
pub mod error;
pub mod modules;

use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Bring the service up and serve until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    libris_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    tracing::info!("libris shut down cleanly");
    Ok(())
}
