//! Host-side registry of node types.
//!
//! Modules register factories at load and remove them at unload; the host
//! owns the registry and the render thread is the only caller.

use std::sync::Arc;

use tracing::debug;

use crate::source::SourceFactory;

#[derive(Default)]
pub struct Registry {
    factories: Vec<Arc<dyn SourceFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type. Returns `false` (and keeps the existing entry)
    /// if the id is already taken.
    pub fn register_source(&mut self, factory: Arc<dyn SourceFactory>) -> bool {
        let id = factory.info().id;
        if self.factories.iter().any(|f| f.info().id == id) {
            debug!(id, "source type already registered");
            return false;
        }
        debug!(id, "registered source type");
        self.factories.push(factory);
        true
    }

    /// Remove a node type by id. Returns `false` if it was not registered.
    pub fn unregister_source(&mut self, id: &str) -> bool {
        let before = self.factories.len();
        self.factories.retain(|f| f.info().id != id);
        before != self.factories.len()
    }

    pub fn factory(&self, id: &str) -> Option<&Arc<dyn SourceFactory>> {
        self.factories.iter().find(|f| f.info().id == id)
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|f| f.info().id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
