//! The rtnetlink socket implementation of [`ControlChannel`].

use std::io::{self, Read};
use std::os::fd::AsRawFd;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, trace};

use crate::attr::read_i32;
use crate::channel::ControlChannel;
use crate::consts::{NLM_F_ACK, NLMSG_DONE, NLMSG_ERROR, RTM_DELTFILTER, RTM_NEWQDISC, RTNLGRP_TC};
use crate::error::ChannelError;
use crate::interface;
use crate::message::{TcMessage, TcRequest, frames};

const RECEIVE_BUFFER_LEN: usize = 32 * 1024;

/// A `NETLINK_ROUTE` socket bound to the calling process.
#[derive(Debug)]
pub struct NetlinkChannel {
    socket: Socket,
    sequence: u32,
    buffer: Vec<u8>,
}

impl NetlinkChannel {
    /// Opens and binds an rtnetlink socket.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Open`] when the socket cannot be created or
    /// bound.
    pub fn open() -> Result<Self, ChannelError> {
        let socket = Socket::new(
            Domain::from(libc::AF_NETLINK),
            Type::from(libc::SOCK_RAW),
            Some(Protocol::from(libc::NETLINK_ROUTE)),
        )
        .map_err(ChannelError::Open)?;
        socket.bind(&netlink_address()).map_err(ChannelError::Open)?;
        debug!(target: "tc::netlink", "rtnetlink socket opened");
        Ok(Self {
            socket,
            sequence: 0,
            buffer: vec![0; RECEIVE_BUFFER_LEN],
        })
    }

    fn send(&mut self, request: &TcRequest, extra_flags: u16) -> Result<u32, ChannelError> {
        self.sequence = self.sequence.wrapping_add(1);
        let mut outgoing = request.clone();
        outgoing.add_flags(extra_flags);
        let frame = outgoing.encode(self.sequence);
        trace!(
            target: "tc::netlink",
            message_type = request.message_type(),
            sequence = self.sequence,
            len = frame.len(),
            "sending request"
        );
        self.socket.send(&frame).map_err(ChannelError::Send)?;
        Ok(self.sequence)
    }

    fn read_datagram(&mut self) -> Result<usize, ChannelError> {
        loop {
            match (&self.socket).read(&mut self.buffer) {
                Ok(len) => return Ok(len),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(ChannelError::Receive(err)),
            }
        }
    }
}

impl ControlChannel for NetlinkChannel {
    fn talk(&mut self, request: &TcRequest) -> Result<(), ChannelError> {
        let sequence = self.send(request, NLM_F_ACK)?;
        loop {
            let len = self.read_datagram()?;
            let datagram = self.buffer.get(..len).unwrap_or_default();
            for frame in frames(datagram) {
                let frame = frame?;
                if frame.sequence != sequence || frame.message_type != NLMSG_ERROR {
                    continue;
                }
                return acknowledgement(frame.payload);
            }
        }
    }

    fn dump(&mut self, request: &TcRequest) -> Result<Vec<TcMessage>, ChannelError> {
        let sequence = self.send(request, 0)?;
        let mut messages = Vec::new();
        loop {
            let len = self.read_datagram()?;
            let datagram = self.buffer.get(..len).unwrap_or_default();
            for frame in frames(datagram) {
                let frame = frame?;
                if frame.sequence != sequence {
                    continue;
                }
                match frame.message_type {
                    NLMSG_DONE => return Ok(messages),
                    NLMSG_ERROR => acknowledgement(frame.payload)?,
                    message_type => {
                        messages.push(TcMessage::decode(message_type, frame.payload)?);
                    }
                }
            }
        }
    }

    fn subscribe(&mut self) -> Result<(), ChannelError> {
        let group = RTNLGRP_TC;
        // SAFETY: the option value points at a live u32 whose size is passed
        // alongside it.
        let rc = unsafe {
            libc::setsockopt(
                self.socket.as_raw_fd(),
                libc::SOL_NETLINK,
                libc::NETLINK_ADD_MEMBERSHIP,
                std::ptr::from_ref(&group).cast(),
                socklen_of::<u32>(),
            )
        };
        if rc < 0 {
            return Err(ChannelError::Subscribe(io::Error::last_os_error()));
        }
        debug!(target: "tc::netlink", group, "joined multicast group");
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<TcMessage>, ChannelError> {
        loop {
            let len = self.read_datagram()?;
            if len == 0 {
                return Ok(Vec::new());
            }
            let datagram = self.buffer.get(..len).unwrap_or_default();
            let mut messages = Vec::new();
            for frame in frames(datagram) {
                let frame = frame?;
                if (RTM_NEWQDISC..=RTM_DELTFILTER).contains(&frame.message_type) {
                    messages.push(TcMessage::decode(frame.message_type, frame.payload)?);
                }
            }
            if !messages.is_empty() {
                return Ok(messages);
            }
        }
    }

    fn interface_index(&self, name: &str) -> Result<u32, ChannelError> {
        interface::index_of(name)
    }

    fn interface_name(&self, index: u32) -> Option<String> {
        interface::name_of(index)
    }

    fn close(self: Box<Self>) {
        debug!(target: "tc::netlink", "rtnetlink socket closed");
        drop(self);
    }
}

fn acknowledgement(payload: &[u8]) -> Result<(), ChannelError> {
    let code = read_i32(payload).ok_or(ChannelError::Malformed {
        reason: "truncated error message",
    })?;
    if code == 0 {
        Ok(())
    } else {
        Err(ChannelError::Kernel(io::Error::from_raw_os_error(
            code.saturating_neg(),
        )))
    }
}

fn netlink_address() -> SockAddr {
    // SAFETY: an all-zero sockaddr_storage is a valid value, and
    // sockaddr_nl fits inside it.
    let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
    let nl = std::ptr::from_mut(&mut storage).cast::<libc::sockaddr_nl>();
    // SAFETY: `nl` points into `storage`, which is large enough and aligned
    // for any socket address type.
    unsafe {
        (*nl).nl_family = libc::sa_family_t::try_from(libc::AF_NETLINK).unwrap_or_default();
        (*nl).nl_pid = 0;
        (*nl).nl_groups = 0;
    }
    // SAFETY: the storage holds an initialised sockaddr_nl of the given size.
    unsafe { SockAddr::new(storage, socklen_of::<libc::sockaddr_nl>()) }
}

fn socklen_of<T>() -> libc::socklen_t {
    libc::socklen_t::try_from(std::mem::size_of::<T>()).unwrap_or_default()
}
