//! Object routines: the bodies behind `tc qdisc`, `tc class`, `tc filter`
//! and `tc monitor`.
//!
//! Routines parse the words after the object keyword, build a [`TcRequest`]
//! (handing kind-specific words to the resolved handler) and exchange it over
//! the session's control channel.
//!
//! [`TcRequest`]: tc_netlink::TcRequest

mod class;
mod filter;
mod monitor;
mod print;
mod protocol;
mod qdisc;

#[cfg(test)]
mod tests;

use std::slice;

use tc_netlink::consts::{NLM_F_CREATE, NLM_F_EXCL, NLM_F_REPLACE};

use crate::errors::CommandError;
use crate::output::CommandOutput;
use crate::session::Session;

/// Top-level routine for each object keyword.
pub trait ObjectRoutines {
    /// `tc qdisc ...`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] whose text is the command's diagnostic.
    fn qdisc(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError>;

    /// `tc class ...`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] whose text is the command's diagnostic.
    fn class(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError>;

    /// `tc filter ...`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] whose text is the command's diagnostic.
    fn filter(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError>;

    /// `tc actions ...`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] whose text is the command's diagnostic.
    fn actions(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError>;

    /// `tc monitor ...`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] whose text is the command's diagnostic.
    fn monitor(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError>;

    /// `tc exec ...`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] whose text is the command's diagnostic.
    fn exec(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError>;
}

/// Routines that talk to the kernel through the session's channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelRoutines;

impl ObjectRoutines for KernelRoutines {
    fn qdisc(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        qdisc::run(session, args, out)
    }

    fn class(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        class::run(session, args, out)
    }

    fn filter(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        filter::run(session, args, out)
    }

    fn actions(
        &mut self,
        _session: &mut Session,
        _args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        Err(CommandError::Unsupported { object: "actions" })
    }

    fn monitor(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        monitor::run(session, args, out)
    }

    fn exec(
        &mut self,
        _session: &mut Session,
        _args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        Err(CommandError::Unsupported { object: "exec" })
    }
}

/// Subcommands shared by the qdisc, class and filter objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subcommand {
    Modify { message_type: u16, flags: u16 },
    Show,
    Help,
}

const ADD: u16 = NLM_F_EXCL | NLM_F_CREATE;
const CHANGE: u16 = 0;
const REPLACE: u16 = NLM_F_CREATE | NLM_F_REPLACE;
const LINK: u16 = NLM_F_REPLACE;

/// Cursor over a routine's words.
#[derive(Debug, Clone)]
struct Words<'a> {
    inner: slice::Iter<'a, String>,
}

impl<'a> Words<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { inner: args.iter() }
    }

    /// The value following a keyword.
    fn value(&mut self) -> Result<&'a str, CommandError> {
        self.next().ok_or(CommandError::Incomplete)
    }

    /// Words not consumed yet.
    fn rest(&self) -> &'a [String] {
        self.inner.as_slice()
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }
}

/// Stores `value` in `slot` unless a value is already there.
fn set_once<'a>(
    slot: &mut Option<&'a str>,
    option: &'static str,
    value: &'a str,
) -> Result<(), CommandError> {
    if slot.is_some() {
        return Err(CommandError::Duplicate {
            option,
            value: value.to_owned(),
        });
    }
    *slot = Some(value);
    Ok(())
}

/// Stores a handle in `slot` unless one is already there.
fn set_handle(slot: &mut u32, option: &'static str, value: &str, raw: u32) -> Result<(), CommandError> {
    if *slot != 0 {
        return Err(CommandError::Duplicate {
            option,
            value: value.to_owned(),
        });
    }
    *slot = raw;
    Ok(())
}

fn invalid(value: &str, what: &'static str) -> CommandError {
    CommandError::InvalidArgument {
        value: value.to_owned(),
        what,
    }
}

/// Interface index of `name` in the `tcmsg` representation.
fn device_index(session: &Session, name: &str) -> Result<i32, CommandError> {
    let index = session.channel.interface_index(name)?;
    i32::try_from(index).map_err(|_| tc_netlink::ChannelError::unknown_device(name).into())
}
