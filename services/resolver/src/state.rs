//! Application state shared across request handlers.

use std::sync::Arc;

use crate::engine::{EngineSettings, Minter, Resolver, Updater};
use crate::registry::Registry;

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
/// Handlers construct engines on demand; the engines themselves are
/// stateless and only borrow the registry handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<dyn Registry>,
    settings: EngineSettings,
}

impl AppState {
    /// Create a new application state over any registry backend.
    pub fn new(registry: Arc<dyn Registry>, settings: EngineSettings) -> Self {
        Self {
            inner: Arc::new(AppStateInner { registry, settings }),
        }
    }

    /// Get a reference to the registry.
    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.inner.registry
    }

    /// Build a minting engine.
    pub fn minter(&self) -> Minter {
        Minter::new(self.inner.registry.clone(), &self.inner.settings)
    }

    /// Build a resolution engine.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.inner.registry.clone(), &self.inner.settings)
    }

    /// Build an update engine.
    pub fn updater(&self) -> Updater {
        Updater::new(self.inner.registry.clone())
    }
}
