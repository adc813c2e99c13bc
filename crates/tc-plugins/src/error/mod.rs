//! Domain errors raised by handlers and extension loading.
//!
//! The `Display` text of [`OptionError`] is what the user sees, so it follows
//! the wording of the classic `tc` diagnostics.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while a handler parses its option words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// No handler exists for the kind, so no option can be understood.
    #[error("Unknown {family} \"{kind}\", hence option \"{option}\" is unparsable")]
    UnknownKind {
        /// Handler family name (`qdisc` or `filter`).
        family: &'static str,
        /// Requested kind.
        kind: String,
        /// First option word that was rejected.
        option: String,
    },

    /// A filter handle could not be parsed.
    #[error("Unparsable filter ID \"{handle}\"")]
    InvalidHandle {
        /// Handle text as given.
        handle: String,
    },

    /// Class options were given for a qdisc without classes.
    #[error("Qdisc \"{kind}\" is classless.")]
    Classless {
        /// Qdisc kind.
        kind: String,
    },

    /// An option keyword was not followed by its value.
    #[error("Option \"{option}\" requires an argument")]
    MissingValue {
        /// Option keyword.
        option: String,
    },

    /// An option value could not be parsed or is out of range.
    #[error("Illegal \"{option}\"")]
    InvalidValue {
        /// Option keyword.
        option: String,
    },

    /// An option keyword is not recognised by the handler.
    #[error("What is \"{option}\"?")]
    UnknownOption {
        /// Unrecognised word.
        option: String,
    },

    /// The user asked for the handler's usage text.
    #[error("{usage}")]
    Usage {
        /// Usage text.
        usage: &'static str,
    },
}

impl OptionError {
    pub(crate) fn missing(option: &str) -> Self {
        Self::MissingValue {
            option: option.to_owned(),
        }
    }

    pub(crate) fn invalid(option: &str) -> Self {
        Self::InvalidValue {
            option: option.to_owned(),
        }
    }

    pub(crate) fn unknown(option: &str) -> Self {
        Self::UnknownOption {
            option: option.to_owned(),
        }
    }
}

/// Errors raised while opening an extension unit or the process image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No extension unit exists at the path.
    #[error("extension unit {path} not found")]
    NotFound {
        /// Path that was probed.
        path: Utf8PathBuf,
    },

    /// The process image could not be opened.
    #[error("cannot open process image: {message}")]
    Image {
        /// Human-readable failure description.
        message: String,
    },
}

#[cfg(test)]
mod tests;
