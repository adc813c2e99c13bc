//! Numeric constants from `<linux/netlink.h>`, `<linux/rtnetlink.h>` and
//! `<linux/pkt_sched.h>` used by the frontend.

/// Size of `struct nlmsghdr`.
pub const NLMSG_HDRLEN: usize = 16;
/// Size of `struct tcmsg`.
pub const TCMSG_LEN: usize = 20;
/// Size of `struct nlattr` / `struct rtattr`.
pub const NLA_HDRLEN: usize = 4;
/// Alignment of netlink messages and attributes.
pub const NLA_ALIGNTO: usize = 4;
/// Mask stripping the nested and byte-order flags from an attribute type.
pub const NLA_TYPE_MASK: u16 = 0x3fff;
/// Flag marking an attribute whose payload is itself a list of attributes.
pub const NLA_F_NESTED: u16 = 0x8000;

/// Control message acknowledging or rejecting a request.
pub const NLMSG_ERROR: u16 = 2;
/// Terminates a multipart dump.
pub const NLMSG_DONE: u16 = 3;

/// The message is a request.
pub const NLM_F_REQUEST: u16 = 0x001;
/// Part of a multipart reply.
pub const NLM_F_MULTI: u16 = 0x002;
/// Ask the kernel for an acknowledgement.
pub const NLM_F_ACK: u16 = 0x004;
/// Replace an existing object.
pub const NLM_F_REPLACE: u16 = 0x100;
/// Fail if the object already exists.
pub const NLM_F_EXCL: u16 = 0x200;
/// Create the object if it does not exist.
pub const NLM_F_CREATE: u16 = 0x400;
/// Dump every matching object.
pub const NLM_F_DUMP: u16 = 0x300;

/// Create a qdisc.
pub const RTM_NEWQDISC: u16 = 36;
/// Delete a qdisc.
pub const RTM_DELQDISC: u16 = 37;
/// Query qdiscs.
pub const RTM_GETQDISC: u16 = 38;
/// Create a class.
pub const RTM_NEWTCLASS: u16 = 40;
/// Delete a class.
pub const RTM_DELTCLASS: u16 = 41;
/// Query classes.
pub const RTM_GETTCLASS: u16 = 42;
/// Create a filter.
pub const RTM_NEWTFILTER: u16 = 44;
/// Delete a filter.
pub const RTM_DELTFILTER: u16 = 45;
/// Query filters.
pub const RTM_GETTFILTER: u16 = 46;

/// rtnetlink multicast group carrying traffic-control events.
pub const RTNLGRP_TC: u32 = 4;

/// Attribute holding the object kind as a NUL-terminated string.
pub const TCA_KIND: u16 = 1;
/// Attribute holding kind-specific options.
pub const TCA_OPTIONS: u16 = 2;
/// Attribute holding the legacy `struct tc_stats` block.
pub const TCA_STATS: u16 = 3;

/// Unspecified handle.
pub const TC_H_UNSPEC: u32 = 0;
/// The root of an interface's egress hierarchy.
pub const TC_H_ROOT: u32 = 0xffff_ffff;
/// The ingress (and clsact) attach point.
pub const TC_H_INGRESS: u32 = 0xffff_fff1;
/// Minor number selecting the ingress hook of clsact.
pub const TC_H_MIN_INGRESS: u32 = 0xfff2;
/// Minor number selecting the egress hook of clsact.
pub const TC_H_MIN_EGRESS: u32 = 0xfff3;

/// `ETH_P_ALL`, matching every protocol.
pub const ETH_P_ALL: u16 = 0x0003;
