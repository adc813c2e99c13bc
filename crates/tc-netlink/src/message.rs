//! Traffic-control netlink messages.
//!
//! A [`TcRequest`] is the message-build context handed to handlers: the
//! dispatcher fills in the `tcmsg` header and `TCA_KIND`, and the handler
//! appends its `TCA_OPTIONS` payload. Replies and events come back as
//! [`TcMessage`] values.
#![expect(
    clippy::host_endian_bytes,
    reason = "netlink headers are laid out in host byte order"
)]

use crate::attr::{self, align, attributes, build_attr, encode_len, read_i32, read_u32};
use crate::consts::{NLMSG_HDRLEN, TCA_KIND, TCA_OPTIONS, TCA_STATS, TCMSG_LEN};
use crate::error::ChannelError;

/// The fixed `struct tcmsg` header that follows the netlink header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcMsg {
    /// Address family, always `AF_UNSPEC` for tc.
    pub family: u8,
    /// Interface index, or zero for every interface.
    pub ifindex: i32,
    /// Object handle.
    pub handle: u32,
    /// Parent handle.
    pub parent: u32,
    /// Family-specific information; filters carry `prio << 16 | protocol`.
    pub info: u32,
}

impl TcMsg {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.family);
        buf.extend_from_slice(&[0; 3]);
        buf.extend_from_slice(&self.ifindex.to_ne_bytes());
        buf.extend_from_slice(&self.handle.to_ne_bytes());
        buf.extend_from_slice(&self.parent.to_ne_bytes());
        buf.extend_from_slice(&self.info.to_ne_bytes());
    }

    fn decode(buf: &[u8]) -> Option<Self> {
        Some(Self {
            family: *buf.first()?,
            ifindex: read_i32(buf.get(4..8)?)?,
            handle: read_u32(buf.get(8..12)?)?,
            parent: read_u32(buf.get(12..16)?)?,
            info: read_u32(buf.get(16..20)?)?,
        })
    }
}

/// Marks an open nested attribute so its length can be patched once the
/// nested payload is complete.
#[derive(Debug)]
#[must_use = "a nested attribute must be closed with TcRequest::end_nest"]
pub struct NestToken {
    offset: usize,
}

/// A traffic-control request under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcRequest {
    message_type: u16,
    flags: u16,
    header: TcMsg,
    attributes: Vec<u8>,
}

impl TcRequest {
    /// Starts a request of `message_type` carrying netlink `flags`.
    #[must_use]
    pub fn new(message_type: u16, flags: u16) -> Self {
        Self {
            message_type,
            flags,
            header: TcMsg::default(),
            attributes: Vec::new(),
        }
    }

    /// Netlink message type, e.g. `RTM_NEWQDISC`.
    #[must_use]
    pub const fn message_type(&self) -> u16 {
        self.message_type
    }

    /// Netlink flags.
    #[must_use]
    pub const fn flags(&self) -> u16 {
        self.flags
    }

    /// The `tcmsg` header.
    #[must_use]
    pub const fn header(&self) -> &TcMsg {
        &self.header
    }

    /// Adds netlink flags to the request.
    pub const fn add_flags(&mut self, flags: u16) {
        self.flags |= flags;
    }

    /// Mutable access to the `tcmsg` header.
    pub const fn header_mut(&mut self) -> &mut TcMsg {
        &mut self.header
    }

    /// The packed attribute buffer.
    #[must_use]
    pub fn attributes(&self) -> &[u8] {
        &self.attributes
    }

    /// Returns the first top-level attribute of `kind`.
    #[must_use]
    pub fn attribute(&self, kind: u16) -> Option<&[u8]> {
        find(&self.attributes, kind)
    }

    /// Appends a raw attribute.
    pub fn push_attr(&mut self, kind: u16, value: &[u8]) {
        self.attributes.extend(build_attr(kind, value));
    }

    /// Appends a `u32` attribute.
    pub fn push_u32(&mut self, kind: u16, value: u32) {
        self.push_attr(kind, &value.to_ne_bytes());
    }

    /// Appends a NUL-terminated string attribute.
    pub fn push_str(&mut self, kind: u16, value: &str) {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend_from_slice(value.as_bytes());
        bytes.push(0);
        self.push_attr(kind, &bytes);
    }

    /// Opens a nested attribute. Everything appended until
    /// [`Self::end_nest`] becomes its payload.
    pub fn begin_nest(&mut self, kind: u16) -> NestToken {
        let offset = self.attributes.len();
        self.attributes.extend_from_slice(&0u16.to_ne_bytes());
        self.attributes.extend_from_slice(&kind.to_ne_bytes());
        NestToken { offset }
    }

    /// Closes a nested attribute, recording its final length.
    pub fn end_nest(&mut self, token: NestToken) {
        let len = encode_len(self.attributes.len() - token.offset);
        if let Some(slot) = self.attributes.get_mut(token.offset..token.offset + 2) {
            slot.copy_from_slice(&len.to_ne_bytes());
        }
        self.attributes.resize(align(self.attributes.len()), 0);
    }

    /// Serialises the request into a complete netlink frame.
    #[must_use]
    pub fn encode(&self, sequence: u32) -> Vec<u8> {
        let total = NLMSG_HDRLEN + TCMSG_LEN + self.attributes.len();
        let mut buf = Vec::with_capacity(total);
        buf.extend_from_slice(&u32::try_from(total).unwrap_or(u32::MAX).to_ne_bytes());
        buf.extend_from_slice(&self.message_type.to_ne_bytes());
        buf.extend_from_slice(&self.flags.to_ne_bytes());
        buf.extend_from_slice(&sequence.to_ne_bytes());
        buf.extend_from_slice(&0u32.to_ne_bytes());
        self.header.encode(&mut buf);
        buf.extend_from_slice(&self.attributes);
        buf
    }
}

/// A decoded traffic-control message received from the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcMessage {
    message_type: u16,
    header: TcMsg,
    attributes: Vec<u8>,
}

impl TcMessage {
    /// Assembles a message from its parts.
    #[must_use]
    pub const fn new(message_type: u16, header: TcMsg, attributes: Vec<u8>) -> Self {
        Self {
            message_type,
            header,
            attributes,
        }
    }

    /// Decodes the payload of a netlink frame of `message_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Malformed`] when the payload is shorter than
    /// a `tcmsg` header.
    pub fn decode(message_type: u16, payload: &[u8]) -> Result<Self, ChannelError> {
        let header = TcMsg::decode(payload).ok_or(ChannelError::Malformed {
            reason: "truncated tcmsg header",
        })?;
        let attributes = payload.get(align(TCMSG_LEN)..).unwrap_or_default().to_vec();
        Ok(Self::new(message_type, header, attributes))
    }

    /// Netlink message type.
    #[must_use]
    pub const fn message_type(&self) -> u16 {
        self.message_type
    }

    /// The `tcmsg` header.
    #[must_use]
    pub const fn header(&self) -> &TcMsg {
        &self.header
    }

    /// Returns the first top-level attribute of `kind`.
    #[must_use]
    pub fn attribute(&self, kind: u16) -> Option<&[u8]> {
        find(&self.attributes, kind)
    }

    /// The object kind carried in `TCA_KIND`.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.attribute(TCA_KIND).and_then(attr::read_str)
    }

    /// The kind-specific `TCA_OPTIONS` payload.
    #[must_use]
    pub fn options(&self) -> Option<&[u8]> {
        self.attribute(TCA_OPTIONS)
    }

    /// Basic counters from `TCA_STATS`.
    #[must_use]
    pub fn stats(&self) -> Option<TcStats> {
        self.attribute(TCA_STATS).and_then(TcStats::decode)
    }
}

impl From<TcRequest> for TcMessage {
    fn from(request: TcRequest) -> Self {
        Self::new(request.message_type, request.header, request.attributes)
    }
}

fn find(buf: &[u8], kind: u16) -> Option<&[u8]> {
    attributes(buf).find_map(|(found, value)| (found == kind).then_some(value))
}

/// Counters reported in `struct tc_stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcStats {
    /// Bytes sent.
    pub bytes: u64,
    /// Packets sent.
    pub packets: u32,
    /// Packets dropped.
    pub drops: u32,
    /// Times the rate limit was hit.
    pub overlimits: u32,
    /// Current byte rate.
    pub bps: u32,
    /// Current packet rate.
    pub pps: u32,
    /// Queue length in packets.
    pub qlen: u32,
    /// Queue backlog in bytes.
    pub backlog: u32,
}

impl TcStats {
    const LEN: usize = 36;

    fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::LEN {
            return None;
        }
        let word = |at: usize| buf.get(at..at + 4).and_then(read_u32);
        Some(Self {
            bytes: attr::read_u64(buf.get(0..8)?)?,
            packets: word(8)?,
            drops: word(12)?,
            overlimits: word(16)?,
            bps: word(20)?,
            pps: word(24)?,
            qlen: word(28)?,
            backlog: word(32)?,
        })
    }

    /// Serialises the counters in `struct tc_stats` layout.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::LEN);
        buf.extend_from_slice(&self.bytes.to_ne_bytes());
        for word in [
            self.packets,
            self.drops,
            self.overlimits,
            self.bps,
            self.pps,
            self.qlen,
            self.backlog,
        ] {
            buf.extend_from_slice(&word.to_ne_bytes());
        }
        buf
    }
}

/// One netlink frame inside a receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame<'a> {
    pub(crate) message_type: u16,
    pub(crate) sequence: u32,
    pub(crate) payload: &'a [u8],
}

/// Splits a receive buffer into netlink frames.
pub(crate) fn frames(buf: &[u8]) -> impl Iterator<Item = Result<Frame<'_>, ChannelError>> {
    let mut rest = buf;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let frame = split_frame(rest);
        match frame {
            Ok((frame, tail)) => {
                rest = tail;
                Some(Ok(frame))
            }
            Err(err) => {
                rest = &[];
                Some(Err(err))
            }
        }
    })
}

fn split_frame(buf: &[u8]) -> Result<(Frame<'_>, &[u8]), ChannelError> {
    let truncated = ChannelError::Malformed {
        reason: "truncated netlink header",
    };
    let header = buf.get(..NLMSG_HDRLEN).ok_or(truncated)?;
    let len = header
        .get(0..4)
        .and_then(read_u32)
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or_default();
    let message_type = header.get(4..6).and_then(attr::read_u16).unwrap_or_default();
    let sequence = header.get(8..12).and_then(read_u32).unwrap_or_default();
    if len < NLMSG_HDRLEN {
        return Err(ChannelError::Malformed {
            reason: "netlink length shorter than header",
        });
    }
    let payload = buf.get(NLMSG_HDRLEN..len).ok_or(ChannelError::Malformed {
        reason: "netlink length exceeds buffer",
    })?;
    let tail = buf.get(align(len)..).unwrap_or_default();
    Ok((
        Frame {
            message_type,
            sequence,
            payload,
        },
        tail,
    ))
}
