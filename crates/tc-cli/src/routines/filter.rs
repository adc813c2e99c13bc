//! `tc filter`.

use tc_netlink::consts::{
    NLM_F_DUMP, NLM_F_REQUEST, RTM_DELTFILTER, RTM_GETTFILTER, RTM_NEWTFILTER, TC_H_MIN_EGRESS,
    TC_H_MIN_INGRESS, TC_H_ROOT, TCA_KIND,
};
use tc_netlink::{TcHandle, TcRequest};

use super::print::{self, Layout};
use super::{
    ADD, CHANGE, REPLACE, Subcommand, Words, device_index, invalid, protocol, set_handle, set_once,
};
use crate::abbrev::{first_match, matches};
use crate::errors::CommandError;
use crate::output::CommandOutput;
use crate::session::Session;

pub(super) const USAGE: &str = "\
Usage: tc filter [ add | del | change | replace | show ] dev STRING
       [ pref PRIO ] protocol PROTO
       [ root | ingress | egress | parent CLASSID ]
       [ handle FILTERID ] [ FILTER_TYPE [ help | OPTIONS ] ]

       tc filter show [ dev STRING ] [ root | ingress | egress | parent CLASSID ]
Where:
FILTER_TYPE := { matchall | etc. }
OPTIONS := ... try tc filter add <desired FILTER_KIND> help";

const COMMANDS: &[(&str, Subcommand)] = &[
    (
        "add",
        Subcommand::Modify {
            message_type: RTM_NEWTFILTER,
            flags: ADD,
        },
    ),
    (
        "change",
        Subcommand::Modify {
            message_type: RTM_NEWTFILTER,
            flags: CHANGE,
        },
    ),
    (
        "replace",
        Subcommand::Modify {
            message_type: RTM_NEWTFILTER,
            flags: REPLACE,
        },
    ),
    (
        "delete",
        Subcommand::Modify {
            message_type: RTM_DELTFILTER,
            flags: CHANGE,
        },
    ),
    ("show", Subcommand::Show),
    ("list", Subcommand::Show),
    ("lst", Subcommand::Show),
    ("help", Subcommand::Help),
];

/// The clsact hooks addressed by `ingress` and `egress`.
fn clsact(minor: u32) -> u32 {
    TcHandle::new(0xffff, 0).raw() | minor
}

pub(super) fn run(
    session: &mut Session,
    args: &[String],
    out: &mut CommandOutput<'_>,
) -> Result<(), CommandError> {
    let Some((command, rest)) = args.split_first() else {
        return show(session, &[], out);
    };
    match first_match(command, COMMANDS) {
        Some(Subcommand::Modify {
            message_type,
            flags,
        }) => modify(session, message_type, flags, rest),
        Some(Subcommand::Show) => show(session, rest, out),
        Some(Subcommand::Help) => Err(CommandError::Usage { usage: USAGE }),
        None => Err(CommandError::UnknownCommand {
            object: "filter",
            command: command.clone(),
        }),
    }
}

/// Attachment and selection keywords shared by modify and show.
#[derive(Debug, Default)]
struct Selector<'a> {
    device: Option<&'a str>,
    parent: u32,
    preference: u16,
    protocol: u16,
}

impl<'a> Selector<'a> {
    /// Consumes `word` (and its value) when it is a selector keyword.
    fn accept(&mut self, word: &'a str, words: &mut Words<'a>) -> Result<bool, CommandError> {
        match word {
            "dev" => set_once(&mut self.device, "dev", words.value()?)?,
            "root" => set_handle(&mut self.parent, "parent", word, TC_H_ROOT)?,
            "ingress" => set_handle(&mut self.parent, "parent", word, clsact(TC_H_MIN_INGRESS))?,
            "egress" => set_handle(&mut self.parent, "parent", word, clsact(TC_H_MIN_EGRESS))?,
            "parent" => {
                let value = words.value()?;
                let parent = TcHandle::parse_classid(value)
                    .map_err(|_| invalid(value, "invalid parent ID"))?;
                set_handle(&mut self.parent, "parent", value, parent.raw())?;
            }
            "protocol" => {
                let value = words.value()?;
                if self.protocol != 0 {
                    return Err(CommandError::Duplicate {
                        option: "protocol",
                        value: value.to_owned(),
                    });
                }
                self.protocol =
                    protocol::parse(value).ok_or_else(|| invalid(value, "invalid protocol"))?;
            }
            "pref" | "preference" | "priority" | "prio" => {
                let value = words.value()?;
                if self.preference != 0 {
                    return Err(CommandError::Duplicate {
                        option: "priority",
                        value: value.to_owned(),
                    });
                }
                self.preference = value
                    .parse()
                    .map_err(|_| invalid(value, "invalid priority value"))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn apply(&self, session: &Session, request: &mut TcRequest) -> Result<(), CommandError> {
        let header = request.header_mut();
        header.parent = self.parent;
        header.info = protocol::pack_info(self.preference, self.protocol);
        if let Some(name) = self.device {
            header.ifindex = device_index(session, name)?;
        }
        Ok(())
    }
}

fn modify(
    session: &mut Session,
    message_type: u16,
    flags: u16,
    args: &[String],
) -> Result<(), CommandError> {
    let mut request = TcRequest::new(message_type, NLM_F_REQUEST | flags);
    let mut selector = Selector::default();
    let mut handle = None;
    let mut kind = None;
    let mut words = Words::new(args);

    while let Some(word) = words.next() {
        if selector.accept(word, &mut words)? {
            continue;
        }
        match word {
            "handle" => set_once(&mut handle, "handle", words.value()?)?,
            "help" => return Err(CommandError::Usage { usage: USAGE }),
            other => {
                kind = Some(other);
                break;
            }
        }
    }

    selector.apply(session, &mut request)?;
    match kind {
        Some(kind) => {
            request.push_str(TCA_KIND, kind);
            let handler = session.resolver.filter(kind);
            handler.parse_options(handle, words.rest(), &mut request)?;
        }
        None if handle.is_some() => return Err(CommandError::HandleWithoutKind),
        None => {}
    }
    session.channel.talk(&request)?;
    Ok(())
}

fn show(
    session: &mut Session,
    args: &[String],
    out: &mut CommandOutput<'_>,
) -> Result<(), CommandError> {
    let mut request = TcRequest::new(RTM_GETTFILTER, NLM_F_REQUEST | NLM_F_DUMP);
    let mut selector = Selector::default();
    let mut words = Words::new(args);

    while let Some(word) = words.next() {
        if selector.accept(word, &mut words)? {
            continue;
        }
        if matches(word, "help") {
            return Err(CommandError::Usage { usage: USAGE });
        }
        return Err(CommandError::UnknownArgument {
            object: "filter",
            argument: word.to_owned(),
        });
    }

    if selector.device.is_none() {
        return Err(CommandError::MissingDevice { object: "filter" });
    }
    selector.apply(session, &mut request)?;
    let messages = session.channel.dump(&request)?;
    for message in &messages {
        print::filter(session, message, Layout { device: false }, &mut *out.stdout)?;
    }
    out.stdout.flush()?;
    Ok(())
}
