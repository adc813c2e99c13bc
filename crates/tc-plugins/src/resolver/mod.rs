//! Lazy, cached resolution of kind names to handlers.
//!
//! The [`PluginResolver`] owns both registries and the collaborators used to
//! find handlers that are not registered yet. Resolution always yields a
//! handler: when neither an extension unit nor the process image provides
//! one, the family's stub is registered in its place.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::extension::{BuiltinImage, ExtensionCatalog, ExtensionLoader, Exports, ImageSource};
use crate::family::{FilterFamily, HandlerFamily, QdiscFamily};
use crate::handler::{FilterHandler, QdiscHandler};
use crate::registry::Registries;

/// Resolves qdisc and filter kinds to handlers.
pub struct PluginResolver<L = ExtensionCatalog, I = BuiltinImage> {
    registries: Registries,
    lib_dir: Utf8PathBuf,
    loader: L,
    image_source: I,
    image: OnceCell<Exports>,
}

impl PluginResolver {
    /// Creates a resolver for `lib_dir` with the bundled extension units and
    /// the handlers linked into this binary.
    #[must_use]
    pub fn with_bundled(lib_dir: impl Into<Utf8PathBuf>) -> Self {
        let lib_dir = lib_dir.into();
        let catalog = ExtensionCatalog::bundled(lib_dir.clone());
        Self::new(lib_dir, catalog, BuiltinImage)
    }
}

impl<L, I> PluginResolver<L, I> {
    /// Creates a resolver probing `lib_dir` through `loader` and falling back
    /// to the image opened by `image_source`.
    #[must_use]
    pub fn new(lib_dir: impl Into<Utf8PathBuf>, loader: L, image_source: I) -> Self {
        Self {
            registries: Registries::default(),
            lib_dir: lib_dir.into(),
            loader,
            image_source,
            image: OnceCell::new(),
        }
    }

    /// The extension directory.
    #[must_use]
    pub fn lib_dir(&self) -> &Utf8Path {
        &self.lib_dir
    }

    /// Handlers resolved so far.
    #[must_use]
    pub const fn registries(&self) -> &Registries {
        &self.registries
    }
}

impl<L: ExtensionLoader, I: ImageSource> PluginResolver<L, I> {
    /// Resolves `id` within family `F`, registering the result.
    pub fn resolve<F: HandlerFamily>(&mut self, id: &str) -> Arc<F::Handler> {
        if let Some(handler) = F::registry(&self.registries).find(id) {
            return handler;
        }
        let handler = self.locate::<F>(id);
        F::registry_mut(&mut self.registries).insert(Arc::clone(&handler));
        handler
    }

    /// Resolves a qdisc kind.
    pub fn qdisc(&mut self, id: &str) -> Arc<dyn QdiscHandler> {
        self.resolve::<QdiscFamily>(id)
    }

    /// Resolves a filter kind.
    pub fn filter(&mut self, id: &str) -> Arc<dyn FilterHandler> {
        self.resolve::<FilterFamily>(id)
    }

    fn locate<F: HandlerFamily>(&self, id: &str) -> Arc<F::Handler> {
        let symbol = F::symbol_name(id);
        let unit = self.lib_dir.join(F::unit_name(id));
        match self.loader.load(&unit) {
            Ok(exports) => exports
                .lookup(&symbol)
                .and_then(F::from_symbol)
                .unwrap_or_else(|| {
                    debug!(target: "tc::plugins", %unit, %symbol, "symbol missing from unit");
                    F::stub(id)
                }),
            Err(error) => {
                debug!(target: "tc::plugins", %error, "falling back to process image");
                self.from_image::<F>(id, &symbol)
            }
        }
    }

    fn from_image<F: HandlerFamily>(&self, id: &str, symbol: &str) -> Arc<F::Handler> {
        match self.image.get_or_try_init(|| self.image_source.open()) {
            Ok(image) => image.lookup(symbol).and_then(F::from_symbol).unwrap_or_else(|| {
                debug!(target: "tc::plugins", family = F::NAME, id, "no handler found; using stub");
                F::stub(id)
            }),
            Err(error) => {
                debug!(target: "tc::plugins", %error, "process image unavailable; using stub");
                F::stub(id)
            }
        }
    }
}

impl<L, I> fmt::Debug for PluginResolver<L, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginResolver")
            .field("lib_dir", &self.lib_dir)
            .field("registries", &self.registries)
            .field("image_open", &self.image.get().is_some())
            .finish_non_exhaustive()
    }
}
