use async_trait::async_trait;
use axum::Router;

/// Context handed to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// A self-contained application module.
///
/// Modules own their routes and whatever state those routes close over;
/// the registry only drives the lifecycle.
#[async_trait]
pub trait Module: Send + Sync {
    /// Unique name; the module's routes mount under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Called once during application startup, before the server binds.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router for this module's endpoints.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment for this module, merged into the service document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called after every module initialized; start background work here.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
