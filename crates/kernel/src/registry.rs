use std::sync::Arc;

use anyhow::Context;

use crate::module::{InitCtx, Module};

/// Ordered collection of application modules.
///
/// Registration order is lifecycle order: `init_all` and `start_all` walk the
/// list front to back, `stop_all` walks it back to front.
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module at the end of the lifecycle order.
    pub fn register(&mut self, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), "module registered");
        self.modules.push(module);
    }

    /// All registered modules, in registration order.
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Look a module up by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Initialize every module in registration order.
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");
            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }
        Ok(())
    }

    /// Start every module in registration order.
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");
            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }
        Ok(())
    }

    /// Stop every module in reverse registration order.
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");
            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }
        Ok(())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::settings::Settings;

    struct ProbeModule {
        name: &'static str,
        stopped_at: Arc<AtomicUsize>,
        clock: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Module for ProbeModule {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn stop(&self) -> anyhow::Result<()> {
            let tick = self.clock.fetch_add(1, Ordering::SeqCst);
            self.stopped_at.store(tick, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn empty_registry_has_no_modules() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("books").is_none());
    }

    #[tokio::test]
    async fn lifecycle_runs_and_stop_reverses_registration_order() {
        let clock = Arc::new(AtomicUsize::new(0));
        let first_stop = Arc::new(AtomicUsize::new(usize::MAX));
        let second_stop = Arc::new(AtomicUsize::new(usize::MAX));

        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ProbeModule {
            name: "first",
            stopped_at: first_stop.clone(),
            clock: clock.clone(),
        }));
        registry.register(Arc::new(ProbeModule {
            name: "second",
            stopped_at: second_stop.clone(),
            clock: clock.clone(),
        }));

        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        registry.init_all(&ctx).await.unwrap();
        registry.start_all(&ctx).await.unwrap();
        registry.stop_all().await.unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("second").is_some());
        // reverse order: "second" stops before "first"
        assert!(second_stop.load(Ordering::SeqCst) < first_stop.load(Ordering::SeqCst));
    }
}
