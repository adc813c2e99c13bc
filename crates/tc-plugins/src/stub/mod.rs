//! Fallback handlers for kinds nothing else can serve.
//!
//! The stubs keep unknown kinds usable: objects of that kind can still be
//! listed and deleted, while any attempt to pass options is rejected.

use std::io::{self, Write};

use tc_netlink::TcRequest;

use crate::error::OptionError;
use crate::handler::{FilterHandler, QdiscHandler};

/// Stub for an unknown qdisc kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownQdisc {
    id: String,
}

impl UnknownQdisc {
    /// Creates a stub answering to `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl QdiscHandler for UnknownQdisc {
    fn id(&self) -> &str {
        &self.id
    }

    fn parse_options(&self, args: &[String], _request: &mut TcRequest) -> Result<(), OptionError> {
        match args.first() {
            Some(option) => Err(OptionError::UnknownKind {
                family: "qdisc",
                kind: self.id.clone(),
                option: option.clone(),
            }),
            None => Ok(()),
        }
    }

    fn print_options(&self, out: &mut dyn Write, options: Option<&[u8]>) -> io::Result<()> {
        match options {
            Some(payload) if !payload.is_empty() => {
                write!(out, "[Unknown qdisc, optlen={}] ", payload.len())
            }
            _ => Ok(()),
        }
    }
}

/// Stub for an unknown filter kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter {
    id: String,
}

impl UnknownFilter {
    /// Creates a stub answering to `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl FilterHandler for UnknownFilter {
    fn id(&self) -> &str {
        &self.id
    }

    fn parse_options(
        &self,
        handle: Option<&str>,
        args: &[String],
        request: &mut TcRequest,
    ) -> Result<(), OptionError> {
        if let Some(option) = args.first() {
            return Err(OptionError::UnknownKind {
                family: "filter",
                kind: self.id.clone(),
                option: option.clone(),
            });
        }
        if let Some(text) = handle {
            request.header_mut().handle = parse_hex(text).ok_or_else(|| {
                OptionError::InvalidHandle {
                    handle: text.to_owned(),
                }
            })?;
        }
        Ok(())
    }

    fn print_options(
        &self,
        out: &mut dyn Write,
        options: Option<&[u8]>,
        handle: u32,
    ) -> io::Result<()> {
        match options {
            Some(payload) if !payload.is_empty() => write!(
                out,
                "fh {handle:08x} [Unknown filter, optlen={}] ",
                payload.len()
            ),
            _ if handle != 0 => write!(out, "fh {handle:08x} "),
            _ => Ok(()),
        }
    }
}

fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}
