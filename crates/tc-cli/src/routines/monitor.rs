//! `tc monitor`: prints traffic-control events as the kernel reports them.

use std::io::{self, Write};

use tc_netlink::TcMessage;
use tc_netlink::consts::{
    RTM_DELQDISC, RTM_DELTCLASS, RTM_DELTFILTER, RTM_NEWQDISC, RTM_NEWTCLASS, RTM_NEWTFILTER,
};
use time::OffsetDateTime;

use super::print::{self, Layout};
use crate::abbrev::matches;
use crate::errors::CommandError;
use crate::options::DisplayOptions;
use crate::output::CommandOutput;
use crate::session::Session;

pub(super) const USAGE: &str = "Usage: tc [-timestamp [-tshort]] monitor";

pub(super) fn run(
    session: &mut Session,
    args: &[String],
    out: &mut CommandOutput<'_>,
) -> Result<(), CommandError> {
    if let Some(word) = args.first() {
        if matches(word, "help") {
            return Err(CommandError::Usage { usage: USAGE });
        }
        return Err(CommandError::UnknownArgument {
            object: "monitor",
            argument: word.clone(),
        });
    }

    session.channel.subscribe()?;
    loop {
        let events = session.channel.receive()?;
        if events.is_empty() {
            return Ok(());
        }
        for event in &events {
            print_event(session, event, &mut *out.stdout)?;
        }
        out.stdout.flush()?;
    }
}

fn print_event(session: &mut Session, event: &TcMessage, out: &mut dyn Write) -> io::Result<()> {
    let layout = Layout { device: true };
    let display = session.display();
    match event.message_type() {
        RTM_NEWQDISC | RTM_DELQDISC => {
            timestamp(display, OffsetDateTime::now_utc(), out)?;
            print::qdisc(session, event, layout, out)
        }
        RTM_NEWTCLASS | RTM_DELTCLASS => {
            timestamp(display, OffsetDateTime::now_utc(), out)?;
            print::class(session, event, layout, out)
        }
        RTM_NEWTFILTER | RTM_DELTFILTER => {
            timestamp(display, OffsetDateTime::now_utc(), out)?;
            print::filter(session, event, layout, out)
        }
        _ => Ok(()),
    }
}

/// Writes the event timestamp selected by `-timestamp` or `-tshort`.
fn timestamp(display: DisplayOptions, now: OffsetDateTime, out: &mut dyn Write) -> io::Result<()> {
    if display.timestamp == 0 {
        return Ok(());
    }
    if display.timestamp_short {
        return write!(
            out,
            "[{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}] ",
            now.year(),
            u8::from(now.month()),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.microsecond()
        );
    }
    writeln!(
        out,
        "Timestamp: {} {}{:>3} {:02}:{:02}:{:02} {} {} usec",
        abbreviated(&now.weekday().to_string()),
        abbreviated(&now.month().to_string()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        now.year(),
        now.microsecond()
    )
}

fn abbreviated(name: &str) -> String {
    name.chars().take(3).collect()
}
