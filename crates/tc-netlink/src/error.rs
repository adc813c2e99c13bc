//! Error types for the control channel.

use std::io;

use thiserror::Error;

/// Errors raised by a [`crate::ControlChannel`].
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The rtnetlink socket could not be created or bound.
    #[error("Cannot open rtnetlink: {0}")]
    Open(#[source] io::Error),
    /// Writing a request to the socket failed.
    #[error("Cannot talk to rtnetlink: {0}")]
    Send(#[source] io::Error),
    /// Reading a reply from the socket failed.
    #[error("Cannot receive from rtnetlink: {0}")]
    Receive(#[source] io::Error),
    /// The kernel rejected a request.
    #[error("RTNETLINK answers: {0}")]
    Kernel(#[source] io::Error),
    /// The kernel sent a frame that could not be decoded.
    #[error("malformed netlink message: {reason}")]
    Malformed {
        /// What was wrong with the frame.
        reason: &'static str,
    },
    /// The named network interface does not exist.
    #[error("Cannot find device \"{name}\"")]
    UnknownDevice {
        /// Interface name as given by the user.
        name: String,
    },
    /// Joining the multicast group failed.
    #[error("Cannot subscribe to traffic-control events: {0}")]
    Subscribe(#[source] io::Error),
}

impl ChannelError {
    /// Convenience constructor for [`ChannelError::UnknownDevice`].
    #[must_use]
    pub fn unknown_device(name: impl Into<String>) -> Self {
        Self::UnknownDevice { name: name.into() }
    }
}
