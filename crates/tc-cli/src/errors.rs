//! Error types and diagnostics for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tc_netlink::ChannelError;
use tc_plugins::OptionError;

use crate::logging::LoggingError;
use crate::netns::NetnsError;
use crate::options::OptionsError;
use crate::session::SessionError;
use crate::tokenizer::TokenizeError;

/// Errors that end the process before or around command execution.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("argument \"{argument}\" is not valid UTF-8")]
    NonUtf8Argument { argument: String },
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Netns(#[from] NetnsError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Failure of a single `tc` command.
///
/// The `Display` text is the diagnostic printed on standard error.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The object keyword matched nothing.
    #[error("Object \"{keyword}\" is unknown, try \"tc help\".")]
    UnknownObject {
        /// Keyword as typed.
        keyword: String,
    },
    /// The object exists but has no routine in this build.
    #[error("Object \"{object}\" is not supported by this build.")]
    Unsupported {
        /// Canonical object keyword.
        object: &'static str,
    },
    /// The subcommand after the object keyword matched nothing.
    #[error("Command \"{command}\" is unknown, try \"tc {object} help\".")]
    UnknownCommand {
        /// Canonical object keyword.
        object: &'static str,
        /// Subcommand as typed.
        command: String,
    },
    /// A keyword that takes a value ended the line.
    #[error("Command line is not complete. Try option \"help\"")]
    Incomplete,
    /// A keyword's value could not be understood.
    #[error("Error: argument \"{value}\" is wrong: {what}")]
    InvalidArgument {
        /// Value as typed.
        value: String,
        /// What the value was meant to be.
        what: &'static str,
    },
    /// A keyword was given twice.
    #[error("Error: duplicate \"{option}\": \"{value}\" is the second value.")]
    Duplicate {
        /// The repeated keyword.
        option: &'static str,
        /// The second value.
        value: String,
    },
    /// Listing needs an interface.
    #[error("Error: \"{object} show\" requires \"dev\".")]
    MissingDevice {
        /// Canonical object keyword.
        object: &'static str,
    },
    /// `handle` was given to `class`.
    #[error("Error: try \"classid\" instead of \"handle\"")]
    ClassHandle,
    /// A filter `handle` was given without a filter kind.
    #[error("Must specify filter type when using \"handle\"")]
    HandleWithoutKind,
    /// A listing or monitor argument matched nothing.
    #[error("What is \"{argument}\"? Try \"tc {object} help\".")]
    UnknownArgument {
        /// Canonical object keyword.
        object: &'static str,
        /// Word as typed.
        argument: String,
    },
    /// The object's help text was requested.
    #[error("{usage}")]
    Usage {
        /// Usage text.
        usage: &'static str,
    },
    /// A batch line could not be split into words.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// A handler rejected its options.
    #[error(transparent)]
    Options(#[from] OptionError),
    /// The control channel failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// Writing to the output streams failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
