//! Control-channel plumbing for the `tc` frontend.
//!
//! The crate owns everything that touches the kernel's rtnetlink interface:
//! the [`TcRequest`] message-build context that handlers fill in, decoding of
//! kernel replies into [`TcMessage`] values, the [`TcHandle`] `major:minor`
//! notation, and the [`ControlChannel`] seam with its socket-backed
//! implementation, [`NetlinkChannel`].
//!
//! Netlink uses host byte order throughout; attribute payloads are laid out
//! exactly as the kernel's UAPI structures.

#![expect(
    clippy::host_endian_bytes,
    reason = "netlink payloads are laid out in host byte order"
)]

pub mod attr;
pub mod channel;
pub mod consts;
mod error;
pub mod handle;
mod interface;
pub mod message;
mod socket;

pub use self::attr::{AttrIter, attributes, build_attr};
pub use self::channel::ControlChannel;
pub use self::error::ChannelError;
pub use self::handle::{HandleError, TcHandle};
pub use self::message::{NestToken, TcMessage, TcMsg, TcRequest, TcStats};
pub use self::socket::NetlinkChannel;
