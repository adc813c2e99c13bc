//! The two handler families and their naming conventions.
//!
//! A family fixes the handler trait, the extension unit prefix and the
//! exported symbol suffix, so the resolver can be written once for both.

use std::fmt;
use std::sync::Arc;

use crate::extension::Symbol;
use crate::handler::{FilterHandler, QdiscHandler};
use crate::registry::{HandlerRegistry, Registries};
use crate::stub::{UnknownFilter, UnknownQdisc};

/// A pluggable handler family.
pub trait HandlerFamily: Sized {
    /// Handler trait object served by the family.
    type Handler: ?Sized + fmt::Debug;

    /// Family name as used in symbols and diagnostics.
    const NAME: &'static str;

    /// File name prefix of the family's extension units.
    const UNIT_PREFIX: &'static str;

    /// Returns the kind served by `handler`.
    fn handler_id(handler: &Self::Handler) -> &str;

    /// Extracts a handler of this family from an exported symbol.
    fn from_symbol(symbol: &Symbol) -> Option<Arc<Self::Handler>>;

    /// Builds the fallback handler for an unknown kind.
    fn stub(id: &str) -> Arc<Self::Handler>;

    /// Selects this family's registry.
    fn registry(registries: &Registries) -> &HandlerRegistry<Self>;

    /// Selects this family's registry mutably.
    fn registry_mut(registries: &mut Registries) -> &mut HandlerRegistry<Self>;

    /// File name of the extension unit for `id`.
    #[must_use]
    fn unit_name(id: &str) -> String {
        format!("{}{id}.so", Self::UNIT_PREFIX)
    }

    /// Exported symbol name for `id`.
    #[must_use]
    fn symbol_name(id: &str) -> String {
        format!("{id}_{}_util", Self::NAME)
    }
}

/// Queueing disciplines.
#[derive(Debug, Clone, Copy)]
pub enum QdiscFamily {}

/// Classifiers.
#[derive(Debug, Clone, Copy)]
pub enum FilterFamily {}

impl HandlerFamily for QdiscFamily {
    type Handler = dyn QdiscHandler;

    const NAME: &'static str = "qdisc";
    const UNIT_PREFIX: &'static str = "q_";

    fn handler_id(handler: &Self::Handler) -> &str {
        handler.id()
    }

    fn from_symbol(symbol: &Symbol) -> Option<Arc<Self::Handler>> {
        match symbol {
            Symbol::Qdisc(handler) => Some(Arc::clone(handler)),
            Symbol::Filter(_) => None,
        }
    }

    fn stub(id: &str) -> Arc<Self::Handler> {
        Arc::new(UnknownQdisc::new(id))
    }

    fn registry(registries: &Registries) -> &HandlerRegistry<Self> {
        &registries.qdiscs
    }

    fn registry_mut(registries: &mut Registries) -> &mut HandlerRegistry<Self> {
        &mut registries.qdiscs
    }
}

impl HandlerFamily for FilterFamily {
    type Handler = dyn FilterHandler;

    const NAME: &'static str = "filter";
    const UNIT_PREFIX: &'static str = "f_";

    fn handler_id(handler: &Self::Handler) -> &str {
        handler.id()
    }

    fn from_symbol(symbol: &Symbol) -> Option<Arc<Self::Handler>> {
        match symbol {
            Symbol::Filter(handler) => Some(Arc::clone(handler)),
            Symbol::Qdisc(_) => None,
        }
    }

    fn stub(id: &str) -> Arc<Self::Handler> {
        Arc::new(UnknownFilter::new(id))
    }

    fn registry(registries: &Registries) -> &HandlerRegistry<Self> {
        &registries.filters
    }

    fn registry_mut(registries: &mut Registries) -> &mut HandlerRegistry<Self> {
        &mut registries.filters
    }
}
