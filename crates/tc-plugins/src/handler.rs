//! Handler traits for the two pluggable families.
//!
//! A handler owns the option syntax of one qdisc or filter kind. Parsing
//! writes into the [`TcRequest`] being built by the caller; printing renders
//! the kind-specific `TCA_OPTIONS` payload reported by the kernel.

use std::fmt;
use std::io::{self, Write};

use tc_netlink::TcRequest;

use crate::error::OptionError;

/// Handler for a queueing discipline kind.
///
/// Classful qdiscs also override the class hooks; the defaults describe a
/// classless qdisc.
pub trait QdiscHandler: fmt::Debug + Send + Sync {
    /// Kind name, e.g. `pfifo`.
    fn id(&self) -> &str;

    /// Parses qdisc option words into `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] describing the first word that could not be
    /// understood.
    fn parse_options(&self, args: &[String], request: &mut TcRequest) -> Result<(), OptionError>;

    /// Prints a qdisc option payload.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    fn print_options(&self, out: &mut dyn Write, options: Option<&[u8]>) -> io::Result<()>;

    /// Parses class option words into `request`.
    ///
    /// # Errors
    ///
    /// The default reports [`OptionError::Classless`].
    fn parse_class_options(
        &self,
        _args: &[String],
        _request: &mut TcRequest,
    ) -> Result<(), OptionError> {
        Err(OptionError::Classless {
            kind: self.id().to_owned(),
        })
    }

    /// Prints a class option payload. The default prints nothing.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    fn print_class_options(
        &self,
        _out: &mut dyn Write,
        _options: Option<&[u8]>,
    ) -> io::Result<()> {
        Ok(())
    }
}

/// Handler for a classifier kind.
pub trait FilterHandler: fmt::Debug + Send + Sync {
    /// Kind name, e.g. `matchall`.
    fn id(&self) -> &str;

    /// Parses filter option words into `request`. `handle` is the textual
    /// filter handle given with `handle`, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] describing the first word or handle that
    /// could not be understood.
    fn parse_options(
        &self,
        handle: Option<&str>,
        args: &[String],
        request: &mut TcRequest,
    ) -> Result<(), OptionError>;

    /// Prints a filter option payload for the filter with `handle`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    fn print_options(
        &self,
        out: &mut dyn Write,
        options: Option<&[u8]>,
        handle: u32,
    ) -> io::Result<()>;
}
