//! The `pfifo`, `bfifo` and `pfifo_head_drop` qdiscs.
//!
//! All three carry a single `struct tc_fifo_qopt { __u32 limit; }` payload.
//! The packet variants count the limit in packets, `bfifo` in bytes.
#![expect(
    clippy::host_endian_bytes,
    reason = "qdisc option structures are laid out in host byte order"
)]

use std::io::{self, Write};

use tc_netlink::TcRequest;
use tc_netlink::attr::read_u32;
use tc_netlink::consts::TCA_OPTIONS;

use super::args::{Words, parse_u32};
use super::size::{format_size, parse_size};
use crate::error::OptionError;
use crate::handler::QdiscHandler;

const USAGE: &str = "Usage: ... <[p|b]fifo | pfifo_head_drop> [ limit NUMBER ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Packets,
    Bytes,
    HeadDrop,
}

/// A first-in first-out qdisc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fifo {
    unit: Unit,
}

impl Fifo {
    /// `pfifo`: limit in packets.
    #[must_use]
    pub const fn packets() -> Self {
        Self {
            unit: Unit::Packets,
        }
    }

    /// `bfifo`: limit in bytes.
    #[must_use]
    pub const fn bytes() -> Self {
        Self { unit: Unit::Bytes }
    }

    /// `pfifo_head_drop`: limit in packets, dropping from the head.
    #[must_use]
    pub const fn head_drop() -> Self {
        Self {
            unit: Unit::HeadDrop,
        }
    }

    fn parse_limit(self, text: &str) -> Option<u32> {
        match self.unit {
            Unit::Bytes => parse_size(text),
            Unit::Packets | Unit::HeadDrop => parse_u32(text),
        }
    }
}

impl QdiscHandler for Fifo {
    fn id(&self) -> &str {
        match self.unit {
            Unit::Packets => "pfifo",
            Unit::Bytes => "bfifo",
            Unit::HeadDrop => "pfifo_head_drop",
        }
    }

    fn parse_options(&self, args: &[String], request: &mut TcRequest) -> Result<(), OptionError> {
        let mut limit = None;
        let mut words = Words::new(args);
        while let Some(word) = words.next() {
            match word {
                "limit" => {
                    let value = words.value(word)?;
                    limit = Some(self.parse_limit(value).ok_or_else(|| OptionError::invalid(word))?);
                }
                "help" => return Err(OptionError::Usage { usage: USAGE }),
                other => return Err(OptionError::unknown(other)),
            }
        }
        if let Some(value) = limit {
            request.push_attr(TCA_OPTIONS, &value.to_ne_bytes());
        }
        Ok(())
    }

    fn print_options(&self, out: &mut dyn Write, options: Option<&[u8]>) -> io::Result<()> {
        let Some(limit) = options.and_then(read_u32) else {
            return Ok(());
        };
        match self.unit {
            Unit::Bytes => write!(out, "limit {}", format_size(limit)),
            Unit::Packets | Unit::HeadDrop => write!(out, "limit {limit}p"),
        }
    }
}
