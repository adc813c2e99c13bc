//! Extension units and the process image.
//!
//! Handlers are published through [`Exports`] tables keyed by symbol name
//! (`<kind>_qdisc_util`, `<kind>_filter_util`). An extension unit is an
//! export table installed into an [`ExtensionCatalog`] under its file name;
//! the resolver probes the catalog through the [`ExtensionLoader`] seam with
//! the unit's full path in the extension directory. The process image is the
//! export table of handlers linked into the binary, opened through the
//! [`ImageSource`] seam.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::builtin;
use crate::error::LoadError;
use crate::family::{FilterFamily, HandlerFamily, QdiscFamily};
use crate::handler::{FilterHandler, QdiscHandler};

/// An exported handler.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A qdisc handler.
    Qdisc(Arc<dyn QdiscHandler>),
    /// A filter handler.
    Filter(Arc<dyn FilterHandler>),
}

/// A table of exported handlers keyed by symbol name.
#[derive(Debug, Clone, Default)]
pub struct Exports {
    symbols: HashMap<String, Symbol>,
}

impl Exports {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports a qdisc handler under `<id>_qdisc_util`.
    #[must_use]
    pub fn with_qdisc(mut self, handler: Arc<dyn QdiscHandler>) -> Self {
        let name = QdiscFamily::symbol_name(handler.id());
        self.symbols.insert(name, Symbol::Qdisc(handler));
        self
    }

    /// Exports a filter handler under `<id>_filter_util`.
    #[must_use]
    pub fn with_filter(mut self, handler: Arc<dyn FilterHandler>) -> Self {
        let name = FilterFamily::symbol_name(handler.id());
        self.symbols.insert(name, Symbol::Filter(handler));
        self
    }

    /// Looks up an exported symbol.
    #[must_use]
    pub fn lookup(&self, symbol: &str) -> Option<&Symbol> {
        self.symbols.get(symbol)
    }

    /// Returns the number of exported symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` when the table exports nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Loads extension units by path.
pub trait ExtensionLoader {
    /// Opens the unit at `path` and returns its export table.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] when no unit exists at `path`.
    fn load(&self, path: &Utf8Path) -> Result<Exports, LoadError>;
}

/// Opens the process image.
pub trait ImageSource {
    /// Returns the export table of the running binary.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Image`] when the image cannot be inspected.
    fn open(&self) -> Result<Exports, LoadError>;
}

/// Extension units installed for one extension directory.
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
    dir: Utf8PathBuf,
    units: HashMap<String, Exports>,
}

impl ExtensionCatalog {
    /// Creates an empty catalog for `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            units: HashMap::new(),
        }
    }

    /// Creates a catalog for `dir` holding the units shipped with the tool.
    #[must_use]
    pub fn bundled(dir: impl Into<Utf8PathBuf>) -> Self {
        let mut catalog = Self::new(dir);
        builtin::install_units(&mut catalog);
        catalog
    }

    /// Installs `exports` as the unit with file name `unit`.
    pub fn install(&mut self, unit: impl Into<String>, exports: Exports) {
        let unit = unit.into();
        debug!(target: "tc::plugins", dir = %self.dir, %unit, "extension unit installed");
        self.units.insert(unit, exports);
    }

    /// The directory the catalog serves.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the installed unit names in sorted order.
    #[must_use]
    pub fn units(&self) -> Vec<&str> {
        let mut units: Vec<&str> = self.units.keys().map(String::as_str).collect();
        units.sort_unstable();
        units
    }
}

impl fmt::Debug for ExtensionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionCatalog")
            .field("dir", &self.dir)
            .field("units", &self.units())
            .finish()
    }
}

impl ExtensionLoader for ExtensionCatalog {
    fn load(&self, path: &Utf8Path) -> Result<Exports, LoadError> {
        let not_found = || LoadError::NotFound {
            path: path.to_path_buf(),
        };
        if path.parent() != Some(self.dir.as_path()) {
            return Err(not_found());
        }
        path.file_name()
            .and_then(|unit| self.units.get(unit))
            .cloned()
            .ok_or_else(not_found)
    }
}

/// The handlers linked into this binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinImage;

impl ImageSource for BuiltinImage {
    fn open(&self) -> Result<Exports, LoadError> {
        Ok(builtin::image_exports())
    }
}

#[cfg(test)]
mod tests;
