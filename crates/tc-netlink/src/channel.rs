//! The control-channel seam between command routines and the kernel.
//!
//! Routines never touch sockets directly; they talk to a boxed
//! [`ControlChannel`] owned by the session. Tests substitute in-memory
//! implementations that record requests and replay canned replies.

use std::fmt;

use crate::error::ChannelError;
use crate::message::{TcMessage, TcRequest};

/// A bidirectional kernel control channel.
pub trait ControlChannel: fmt::Debug {
    /// Sends a modification request and waits for the kernel acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Kernel`] when the kernel rejects the request
    /// and a transport error when the exchange itself fails.
    fn talk(&mut self, request: &TcRequest) -> Result<(), ChannelError>;

    /// Sends a dump request and collects every reply until the kernel marks
    /// the end of the dump.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] when the exchange fails.
    fn dump(&mut self, request: &TcRequest) -> Result<Vec<TcMessage>, ChannelError>;

    /// Joins the traffic-control multicast group.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Subscribe`] when the group cannot be joined.
    fn subscribe(&mut self) -> Result<(), ChannelError>;

    /// Blocks for the next batch of events. An empty batch marks the end of
    /// the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] when reading fails.
    fn receive(&mut self) -> Result<Vec<TcMessage>, ChannelError>;

    /// Resolves an interface name to its index.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::UnknownDevice`] when no such interface exists.
    fn interface_index(&self, name: &str) -> Result<u32, ChannelError>;

    /// Resolves an interface index to its name.
    fn interface_name(&self, index: u32) -> Option<String>;

    /// Releases the channel.
    fn close(self: Box<Self>);
}
