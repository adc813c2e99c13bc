//! The `matchall` classifier, shipped as the `f_matchall.so` extension unit.

use std::io::{self, Write};

use tc_netlink::attr::{attributes, read_u32};
use tc_netlink::consts::{NLA_F_NESTED, TCA_OPTIONS};
use tc_netlink::{TcHandle, TcRequest};

use super::args::{Words, parse_u32};
use crate::error::OptionError;
use crate::handler::FilterHandler;

/// Kind served by this handler.
pub const KIND: &str = "matchall";

/// Target class attribute inside `TCA_OPTIONS`.
pub const TCA_MATCHALL_CLASSID: u16 = 1;
/// Offload flags attribute inside `TCA_OPTIONS`.
pub const TCA_MATCHALL_FLAGS: u16 = 3;

const SKIP_HW: u32 = 1 << 0;
const SKIP_SW: u32 = 1 << 1;

const USAGE: &str = "Usage: ... matchall [skip_sw | skip_hw]\n                 [ classid CLASSID ]";

/// The match-everything classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matchall;

impl FilterHandler for Matchall {
    fn id(&self) -> &str {
        KIND
    }

    fn parse_options(
        &self,
        handle: Option<&str>,
        args: &[String],
        request: &mut TcRequest,
    ) -> Result<(), OptionError> {
        if let Some(text) = handle {
            request.header_mut().handle =
                parse_u32(text).ok_or_else(|| OptionError::invalid("handle"))?;
        }
        let mut classid = None;
        let mut flags = 0;
        let mut words = Words::new(args);
        while let Some(word) = words.next() {
            match word {
                "classid" | "flowid" => {
                    let value = words.value(word)?;
                    let parsed =
                        TcHandle::parse_classid(value).map_err(|_| OptionError::invalid(word))?;
                    classid = Some(parsed.raw());
                }
                "skip_hw" => flags |= SKIP_HW,
                "skip_sw" => flags |= SKIP_SW,
                "help" => return Err(OptionError::Usage { usage: USAGE }),
                other => return Err(OptionError::unknown(other)),
            }
        }
        let nest = request.begin_nest(TCA_OPTIONS | NLA_F_NESTED);
        if let Some(value) = classid {
            request.push_u32(TCA_MATCHALL_CLASSID, value);
        }
        if flags != 0 {
            request.push_u32(TCA_MATCHALL_FLAGS, flags);
        }
        request.end_nest(nest);
        Ok(())
    }

    fn print_options(
        &self,
        out: &mut dyn Write,
        options: Option<&[u8]>,
        handle: u32,
    ) -> io::Result<()> {
        let Some(payload) = options else {
            return Ok(());
        };
        if handle != 0 {
            write!(out, "handle 0x{handle:x} ")?;
        }
        for (kind, value) in attributes(payload) {
            match (kind, read_u32(value)) {
                (TCA_MATCHALL_CLASSID, Some(classid)) => {
                    write!(out, "flowid {} ", TcHandle::from_raw(classid))?;
                }
                (TCA_MATCHALL_FLAGS, Some(flags)) => {
                    if flags & SKIP_HW != 0 {
                        out.write_all(b"skip_hw ")?;
                    }
                    if flags & SKIP_SW != 0 {
                        out.write_all(b"skip_sw ")?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
