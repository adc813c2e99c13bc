//! Handler resolution for the `tc` frontend.
//!
//! Every qdisc and filter kind named on the command line is served by a
//! handler that knows how to turn the kind's option words into a netlink
//! payload and how to print a payload the kernel reports back. The
//! [`PluginResolver`] maps a kind to its handler, trying in turn:
//!
//! 1. the family's [`HandlerRegistry`] of already resolved handlers;
//! 2. an extension unit named `q_<kind>.so` or `f_<kind>.so` in the
//!    configured extension directory, exporting `<kind>_qdisc_util` or
//!    `<kind>_filter_util`;
//! 3. the same symbol in the process image, the handlers linked into the
//!    binary;
//! 4. a stub that refuses every option and prints an opaque summary.
//!
//! Whatever is found is registered, so a kind resolves to the same handler
//! instance for the rest of the session.
//!
//! # Example
//!
//! ```rust,no_run
//! use tc_plugins::PluginResolver;
//!
//! let mut resolver = PluginResolver::with_bundled("/usr/lib/tc");
//! let handler = resolver.qdisc("pfifo");
//! assert_eq!(handler.id(), "pfifo");
//! ```

#![expect(
    clippy::host_endian_bytes,
    reason = "netlink payloads are laid out in host byte order"
)]

pub mod builtin;
pub mod error;
pub mod extension;
pub mod family;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod stub;

#[cfg(test)]
mod tests;

pub use self::error::{LoadError, OptionError};
pub use self::extension::{BuiltinImage, ExtensionCatalog, ExtensionLoader, Exports, ImageSource, Symbol};
pub use self::family::{FilterFamily, HandlerFamily, QdiscFamily};
pub use self::handler::{FilterHandler, QdiscHandler};
pub use self::registry::{HandlerRegistry, Registries};
pub use self::resolver::PluginResolver;
