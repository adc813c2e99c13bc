//! Per-family storage of resolved handlers.
//!
//! A [`HandlerRegistry`] maps a kind name to the handler instance that
//! serves it. Registries never fail: lookups miss and insertions always
//! succeed, replacing any handler previously stored under the same id.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::family::{FilterFamily, HandlerFamily, QdiscFamily};

/// Resolved handlers of one family, keyed by kind.
pub struct HandlerRegistry<F: HandlerFamily> {
    handlers: HashMap<String, Arc<F::Handler>>,
}

impl<F: HandlerFamily> HandlerRegistry<F> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Looks up the handler registered for `id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Arc<F::Handler>> {
        self.handlers.get(id).map(Arc::clone)
    }

    /// Registers `handler` under its own id.
    pub fn insert(&mut self, handler: Arc<F::Handler>) {
        let id = F::handler_id(&handler).to_owned();
        self.handlers.insert(id, handler);
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the registered ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<F: HandlerFamily> Default for HandlerRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: HandlerFamily> fmt::Debug for HandlerRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("family", &F::NAME)
            .field("ids", &self.ids())
            .finish()
    }
}

/// The pair of registries owned by a resolver.
#[derive(Debug, Default)]
pub struct Registries {
    /// Resolved qdisc handlers.
    pub qdiscs: HandlerRegistry<QdiscFamily>,
    /// Resolved filter handlers.
    pub filters: HandlerRegistry<FilterFamily>,
}
