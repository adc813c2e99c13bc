//! The `drr` (Deficit Round Robin) classful qdisc.
//!
//! The qdisc itself takes no options; each class carries a nested
//! `TCA_DRR_QUANTUM` giving the bytes it may send per round.

use std::io::{self, Write};

use tc_netlink::attr::{attributes, read_u32};
use tc_netlink::consts::{NLA_F_NESTED, TCA_OPTIONS};
use tc_netlink::TcRequest;

use super::args::Words;
use super::size::{format_size, parse_size};
use crate::error::OptionError;
use crate::handler::QdiscHandler;

/// Class quantum attribute inside `TCA_OPTIONS`.
pub const TCA_DRR_QUANTUM: u16 = 1;

const USAGE: &str = "Usage: ... drr\n\nDRR class parameters: [ quantum QUANTUM ]";

/// The DRR qdisc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drr;

impl QdiscHandler for Drr {
    fn id(&self) -> &str {
        "drr"
    }

    fn parse_options(&self, args: &[String], _request: &mut TcRequest) -> Result<(), OptionError> {
        match args.first().map(String::as_str) {
            None => Ok(()),
            Some("help") => Err(OptionError::Usage { usage: USAGE }),
            Some(other) => Err(OptionError::unknown(other)),
        }
    }

    fn print_options(&self, _out: &mut dyn Write, _options: Option<&[u8]>) -> io::Result<()> {
        Ok(())
    }

    fn parse_class_options(
        &self,
        args: &[String],
        request: &mut TcRequest,
    ) -> Result<(), OptionError> {
        let mut quantum = None;
        let mut words = Words::new(args);
        while let Some(word) = words.next() {
            match word {
                "quantum" => {
                    let value = words.value(word)?;
                    quantum = Some(parse_size(value).ok_or_else(|| OptionError::invalid(word))?);
                }
                "help" => return Err(OptionError::Usage { usage: USAGE }),
                other => return Err(OptionError::unknown(other)),
            }
        }
        let nest = request.begin_nest(TCA_OPTIONS | NLA_F_NESTED);
        if let Some(value) = quantum {
            request.push_u32(TCA_DRR_QUANTUM, value);
        }
        request.end_nest(nest);
        Ok(())
    }

    fn print_class_options(&self, out: &mut dyn Write, options: Option<&[u8]>) -> io::Result<()> {
        let quantum = options.and_then(|payload| {
            attributes(payload)
                .find(|(kind, _)| *kind == TCA_DRR_QUANTUM)
                .and_then(|(_, value)| read_u32(value))
        });
        match quantum {
            Some(bytes) => write!(out, "quantum {} ", format_size(bytes)),
            None => Ok(()),
        }
    }
}
