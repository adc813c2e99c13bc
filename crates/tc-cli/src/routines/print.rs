//! Rendering of qdiscs, classes and filters reported by the kernel.

use std::io::{self, Write};

use tc_netlink::consts::{RTM_DELQDISC, RTM_DELTCLASS, RTM_DELTFILTER, TC_H_ROOT};
use tc_netlink::{TcHandle, TcMessage, TcStats};
use tracing::debug;

use super::protocol;
use crate::session::Session;

/// Which attachment details to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Layout {
    /// Print `dev IF`.
    pub(super) device: bool,
}

pub(super) fn qdisc(
    session: &mut Session,
    message: &TcMessage,
    layout: Layout,
    out: &mut dyn Write,
) -> io::Result<()> {
    let Some(kind) = message.kind() else {
        debug!(target: "tc::print", "qdisc message without kind skipped");
        return Ok(());
    };
    let header = message.header();
    if message.message_type() == RTM_DELQDISC {
        out.write_all(b"deleted ")?;
    }
    write!(out, "qdisc {kind} {:x}: ", header.handle >> 16)?;
    if layout.device {
        write!(out, "dev {} ", session.interface_name(header.ifindex))?;
    }
    parent(session, header.parent, out)?;
    if header.info != 1 {
        write!(out, "refcnt {} ", header.info)?;
    }
    if let Some(options) = message.options() {
        let handler = session.resolver.qdisc(kind);
        handler.print_options(out, Some(options))?;
    }
    trailer(session, message, out)
}

pub(super) fn class(
    session: &mut Session,
    message: &TcMessage,
    layout: Layout,
    out: &mut dyn Write,
) -> io::Result<()> {
    let Some(kind) = message.kind() else {
        debug!(target: "tc::print", "class message without kind skipped");
        return Ok(());
    };
    let header = message.header();
    if message.message_type() == RTM_DELTCLASS {
        out.write_all(b"deleted ")?;
    }
    write!(
        out,
        "class {kind} {} ",
        session.format_class(TcHandle::from_raw(header.handle))
    )?;
    if layout.device {
        write!(out, "dev {} ", session.interface_name(header.ifindex))?;
    }
    parent(session, header.parent, out)?;
    if header.info != 0 {
        write!(out, "leaf {:x}: ", header.info >> 16)?;
    }
    let handler = session.resolver.qdisc(kind);
    handler.print_class_options(out, message.options())?;
    trailer(session, message, out)
}

pub(super) fn filter(
    session: &mut Session,
    message: &TcMessage,
    layout: Layout,
    out: &mut dyn Write,
) -> io::Result<()> {
    let header = message.header();
    if message.message_type() == RTM_DELTFILTER {
        out.write_all(b"deleted ")?;
    }
    out.write_all(b"filter ")?;
    if layout.device {
        write!(out, "dev {} ", session.interface_name(header.ifindex))?;
    }
    parent(session, header.parent, out)?;
    if header.info != 0 {
        let (preference, protocol_id) = protocol::split_info(header.info);
        write!(
            out,
            "protocol {} pref {preference} ",
            protocol::name(protocol_id)
        )?;
    }
    if let Some(kind) = message.kind() {
        write!(out, "{kind} ")?;
        let handler = session.resolver.filter(kind);
        handler.print_options(out, message.options(), header.handle)?;
    }
    trailer(session, message, out)
}

fn parent(session: &Session, raw: u32, out: &mut dyn Write) -> io::Result<()> {
    match raw {
        0 => Ok(()),
        TC_H_ROOT => out.write_all(b"root "),
        other => write!(out, "parent {} ", session.format_class(TcHandle::from_raw(other))),
    }
}

/// Raw options, end of line and statistics.
fn trailer(session: &Session, message: &TcMessage, out: &mut dyn Write) -> io::Result<()> {
    let display = session.display();
    writeln!(out)?;
    if display.raw > 0
        && let Some(options) = message.options().filter(|options| !options.is_empty())
    {
        writeln!(out, " raw {}", hex(options))?;
    }
    if display.stats > 0
        && let Some(stats) = message.stats()
    {
        statistics(&stats, out)?;
    }
    Ok(())
}

pub(super) fn statistics(stats: &TcStats, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        " Sent {} bytes {} pkt (dropped {}, overlimits {}) ",
        stats.bytes, stats.packets, stats.drops, stats.overlimits
    )?;
    if stats.bps != 0 || stats.pps != 0 {
        writeln!(
            out,
            " rate {}bit {}pps ",
            u64::from(stats.bps).saturating_mul(8),
            stats.pps
        )?;
    }
    writeln!(out, " backlog {}b {}p ", stats.backlog, stats.qlen)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
