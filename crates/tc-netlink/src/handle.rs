//! TC handle parsing and formatting.
//!
//! TC handles are 32-bit values split into major:minor (16:16 bits), written
//! in hexadecimal. Qdiscs are addressed by major number alone (`1:`), classes
//! by both halves (`1:10`), and a few reserved values have keywords.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::consts::{TC_H_INGRESS, TC_H_ROOT, TC_H_UNSPEC};

/// A traffic-control object identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TcHandle(u32);

/// Errors raised while parsing a handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// The text is not a handle at all.
    #[error("invalid handle \"{text}\"")]
    Invalid {
        /// Offending text.
        text: String,
    },
    /// One half of the handle does not fit in 16 bits.
    #[error("handle \"{text}\" is out of range")]
    OutOfRange {
        /// Offending text.
        text: String,
    },
}

impl TcHandle {
    /// The root of the egress hierarchy.
    pub const ROOT: Self = Self(TC_H_ROOT);
    /// The ingress/clsact attach point.
    pub const INGRESS: Self = Self(TC_H_INGRESS);
    /// No handle; lets the kernel choose.
    pub const UNSPEC: Self = Self(TC_H_UNSPEC);

    /// Builds a handle from its halves.
    #[must_use]
    pub fn new(major: u16, minor: u16) -> Self {
        Self((u32::from(major) << 16) | u32::from(minor))
    }

    /// Wraps a raw 32-bit value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw 32-bit value as carried in `struct tcmsg`.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Upper 16 bits.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "shifted into 16 bits")]
    pub const fn major(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Lower 16 bits.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "masked to 16 bits")]
    pub const fn minor(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// Parses a class identifier: `root`, `none`, `M:N`, `M:`, `:N`, or a
    /// bare hexadecimal 32-bit value.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError`] when the text is not a valid identifier.
    pub fn parse_classid(text: &str) -> Result<Self, HandleError> {
        match text {
            "root" => return Ok(Self::ROOT),
            "none" => return Ok(Self::UNSPEC),
            _ => {}
        }
        let Some((major, minor)) = text.split_once(':') else {
            return u32::from_str_radix(text, 16)
                .map(Self)
                .map_err(|_| invalid(text));
        };
        let major = parse_half(major, text, true)?;
        let minor = parse_half(minor, text, true)?;
        Ok(Self::new(major, minor))
    }

    /// Parses a qdisc handle: `none`, `M:` or `M`. The minor half is always
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError`] when the text is not a valid qdisc handle.
    pub fn parse_qdisc(text: &str) -> Result<Self, HandleError> {
        if text == "none" {
            return Ok(Self::UNSPEC);
        }
        let major = text.strip_suffix(':').unwrap_or(text);
        let major = parse_half(major, text, false)?;
        Ok(Self::new(major, 0))
    }
}

fn parse_half(half: &str, text: &str, allow_empty: bool) -> Result<u16, HandleError> {
    if half.is_empty() {
        return if allow_empty {
            Ok(0)
        } else {
            Err(invalid(text))
        };
    }
    let value = u32::from_str_radix(half, 16).map_err(|_| invalid(text))?;
    u16::try_from(value).map_err(|_| HandleError::OutOfRange {
        text: text.to_owned(),
    })
}

fn invalid(text: &str) -> HandleError {
    HandleError::Invalid {
        text: text.to_owned(),
    }
}

impl FromStr for TcHandle {
    type Err = HandleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse_classid(text)
    }
}

impl From<u32> for TcHandle {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TcHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ROOT => f.write_str("root"),
            Self::UNSPEC => f.write_str("none"),
            handle if handle.major() == 0 => write!(f, ":{:x}", handle.minor()),
            handle if handle.minor() == 0 => write!(f, "{:x}:", handle.major()),
            handle => write!(f, "{:x}:{:x}", handle.major(), handle.minor()),
        }
    }
}
