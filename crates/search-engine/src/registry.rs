use crate::engine::SearchEngine;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_REGISTRY: Lazy<EngineRegistry> = Lazy::new(EngineRegistry::new);

/// The process-global registry.
///
/// Hosts that configure one backend at startup register it here; the indexer
/// resolves engines from whichever registry it is handed.
#[must_use]
pub fn registry() -> &'static EngineRegistry {
    &GLOBAL_REGISTRY
}

/// Maps index names to configured backends.
///
/// Cloning is cheap and shares the underlying table.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: Arc<RwLock<HashMap<String, Arc<dyn SearchEngine>>>>,
}

impl EngineRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, index_name: impl Into<String>, engine: Arc<dyn SearchEngine>) {
        let index_name = index_name.into();
        log::debug!("registering search engine for {index_name}");
        self.engines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index_name, engine);
    }

    pub fn unregister(&self, index_name: &str) -> Option<Arc<dyn SearchEngine>> {
        self.engines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(index_name)
    }

    /// Resolve the backend for `index_name`. Absence is not an error; an
    /// unconfigured index simply has no engine.
    #[must_use]
    pub fn get(&self, index_name: &str) -> Option<Arc<dyn SearchEngine>> {
        self.engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index_name)
            .cloned()
    }
}
