//! `tc class`.

use tc_netlink::consts::{
    NLM_F_DUMP, NLM_F_REQUEST, RTM_DELTCLASS, RTM_GETTCLASS, RTM_NEWTCLASS, TC_H_ROOT, TCA_KIND,
};
use tc_netlink::{TcHandle, TcRequest};

use super::print::{self, Layout};
use super::{ADD, CHANGE, REPLACE, Subcommand, Words, device_index, invalid, set_handle, set_once};
use crate::abbrev::{first_match, matches};
use crate::errors::CommandError;
use crate::output::CommandOutput;
use crate::session::Session;

pub(super) const USAGE: &str = "\
Usage: tc class [ add | del | change | replace | show ] dev STRING
       [ classid CLASSID ] [ root | parent CLASSID ]
       [ QDISC_KIND [ help | OPTIONS ] ]

       tc class show [ dev STRING ] [ root | parent CLASSID ] [ classid CLASSID ]
Where:
QDISC_KIND := { drr | etc. }
OPTIONS := ... try tc class add <desired QDISC_KIND> help";

const COMMANDS: &[(&str, Subcommand)] = &[
    (
        "add",
        Subcommand::Modify {
            message_type: RTM_NEWTCLASS,
            flags: ADD,
        },
    ),
    (
        "change",
        Subcommand::Modify {
            message_type: RTM_NEWTCLASS,
            flags: CHANGE,
        },
    ),
    (
        "replace",
        Subcommand::Modify {
            message_type: RTM_NEWTCLASS,
            flags: REPLACE,
        },
    ),
    (
        "delete",
        Subcommand::Modify {
            message_type: RTM_DELTCLASS,
            flags: CHANGE,
        },
    ),
    ("show", Subcommand::Show),
    ("list", Subcommand::Show),
    ("lst", Subcommand::Show),
    ("help", Subcommand::Help),
];

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
            object: "class",
            command: command.clone(),
        }),
    }
}

fn modify(
    session: &mut Session,
    message_type: u16,
    flags: u16,
    args: &[String],
) -> Result<(), CommandError> {
    let mut request = TcRequest::new(message_type, NLM_F_REQUEST | flags);
    let mut device = None;
    let mut words = Words::new(args);

    while let Some(word) = words.next() {
        match word {
            "dev" => set_once(&mut device, "dev", words.value()?)?,
            "classid" => {
                let value = words.value()?;
                let handle = TcHandle::parse_classid(value)
                    .map_err(|_| invalid(value, "invalid class ID"))?;
                set_handle(&mut request.header_mut().handle, "classid", value, handle.raw())?;
            }
            "handle" => return Err(CommandError::ClassHandle),
            "root" => set_handle(&mut request.header_mut().parent, "parent", word, TC_H_ROOT)?,
            "parent" => {
                let value = words.value()?;
                let parent = TcHandle::parse_classid(value)
                    .map_err(|_| invalid(value, "invalid parent ID"))?;
                set_handle(&mut request.header_mut().parent, "parent", value, parent.raw())?;
            }
            "help" => return Err(CommandError::Usage { usage: USAGE }),
            kind => {
                request.push_str(TCA_KIND, kind);
                let handler = session.resolver.qdisc(kind);
                handler.parse_class_options(words.rest(), &mut request)?;
                break;
            }
        }
    }

    if let Some(name) = device {
        request.header_mut().ifindex = device_index(session, name)?;
    }
    session.channel.talk(&request)?;
    Ok(())
}

fn show(
    session: &mut Session,
    args: &[String],
    out: &mut CommandOutput<'_>,
) -> Result<(), CommandError> {
    let mut request = TcRequest::new(RTM_GETTCLASS, NLM_F_REQUEST | NLM_F_DUMP);
    let mut device = None;
    let mut parent = None;
    let mut classid = None;
    let mut words = Words::new(args);

    while let Some(word) = words.next() {
        match word {
            "dev" => set_once(&mut device, "dev", words.value()?)?,
            "root" => parent = Some(TC_H_ROOT),
            "parent" => {
                let value = words.value()?;
                let raw = TcHandle::parse_classid(value)
                    .map_err(|_| invalid(value, "invalid parent ID"))?;
                parent = Some(raw.raw());
            }
            "classid" => {
                let value = words.value()?;
                let raw = TcHandle::parse_classid(value)
                    .map_err(|_| invalid(value, "invalid class ID"))?;
                classid = Some(raw.raw());
            }
            _ if matches(word, "help") => return Err(CommandError::Usage { usage: USAGE }),
            other => {
                return Err(CommandError::UnknownArgument {
                    object: "class",
                    argument: other.to_owned(),
                });
            }
        }
    }

    let Some(name) = device else {
        return Err(CommandError::MissingDevice { object: "class" });
    };
    request.header_mut().ifindex = device_index(session, name)?;
    let messages = session.channel.dump(&request)?;
    for message in &messages {
        let header = message.header();
        if parent.is_some_and(|wanted| wanted != header.parent)
            || classid.is_some_and(|wanted| wanted != header.handle)
        {
            continue;
        }
        print::class(session, message, Layout { device: false }, &mut *out.stdout)?;
    }
    out.stdout.flush()?;
    Ok(())
}
