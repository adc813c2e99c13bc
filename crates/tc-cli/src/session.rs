//! Session lifecycle: everything a command needs, set up once and torn down
//! once.
//!
//! [`SessionLifecycle::start`] builds the handler resolver, opens the control
//! channel and loads the class names database; [`SessionLifecycle::stop`]
//! closes the channel. A [`Session`] owns the channel exclusively, so the
//! channel is closed exactly once whenever it was opened, including when a
//! later start step fails.

use std::fmt;

use camino::Utf8PathBuf;
use tc_netlink::{ChannelError, ControlChannel, NetlinkChannel, TcHandle};
use tc_plugins::PluginResolver;
use thiserror::Error;
use tracing::debug;

use crate::names::{ClassNames, NamesError};
use crate::options::DisplayOptions;

/// Opens control channels.
#[cfg_attr(test, mockall::automock)]
pub trait ChannelOpener {
    /// Opens a fresh channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Open`] when the channel cannot be created.
    fn open(&self) -> Result<Box<dyn ControlChannel>, ChannelError>;
}

/// Opens rtnetlink sockets.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetlinkOpener;

impl ChannelOpener for NetlinkOpener {
    fn open(&self) -> Result<Box<dyn ControlChannel>, ChannelError> {
        let channel = NetlinkChannel::open()?;
        Ok(Box::new(channel))
    }
}

/// Failure to start a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The control channel could not be opened.
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// The class names database could not be loaded.
    #[error(transparent)]
    Names(#[from] NamesError),
}

/// Per-process context shared by every command of an invocation.
pub struct Session {
    pub(crate) channel: Box<dyn ControlChannel>,
    pub(crate) resolver: PluginResolver,
    pub(crate) display: DisplayOptions,
    pub(crate) names: Option<ClassNames>,
}

impl Session {
    /// Printing switches in effect.
    #[must_use]
    pub const fn display(&self) -> DisplayOptions {
        self.display
    }

    /// Renders a class handle, substituting its name under `-nm`.
    #[must_use]
    pub fn format_class(&self, handle: TcHandle) -> String {
        self.names
            .as_ref()
            .map_or_else(|| handle.to_string(), |names| names.format(handle))
    }

    /// Name of interface `index`, or `if<index>` when it has vanished.
    #[must_use]
    pub fn interface_name(&self, index: i32) -> String {
        u32::try_from(index)
            .ok()
            .and_then(|raw| self.channel.interface_name(raw))
            .unwrap_or_else(|| format!("if{index}"))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("channel", &self.channel)
            .field("display", &self.display)
            .field("names", &self.names.as_ref().map(ClassNames::len))
            .finish_non_exhaustive()
    }
}

/// Starts and stops sessions.
#[derive(Debug)]
pub struct SessionLifecycle<O = NetlinkOpener> {
    opener: O,
    lib_dir: Utf8PathBuf,
    display: DisplayOptions,
    names: Option<NamesSource>,
}

/// Where the class names database comes from.
#[derive(Debug, Clone)]
struct NamesSource {
    path: Utf8PathBuf,
    /// Named with `-cf`; a missing file is then an error.
    explicit: bool,
}

impl<O: ChannelOpener> SessionLifecycle<O> {
    /// Creates a lifecycle whose sessions resolve handlers from `lib_dir`.
    #[must_use]
    pub fn new(opener: O, lib_dir: impl Into<Utf8PathBuf>, display: DisplayOptions) -> Self {
        Self {
            opener,
            lib_dir: lib_dir.into(),
            display,
            names: None,
        }
    }

    /// Loads the class names database at `path` on every start; the file must
    /// exist.
    #[must_use]
    pub fn with_names(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.names = Some(NamesSource {
            path: path.into(),
            explicit: true,
        });
        self
    }

    /// Loads the class names database at the default `path` when it exists;
    /// without it, class handles print numerically.
    #[must_use]
    pub fn with_default_names(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.names = Some(NamesSource {
            path: path.into(),
            explicit: false,
        });
        self
    }

    /// Builds the resolver, opens the channel and loads class names.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Channel`] when the channel cannot be opened and
    /// [`SessionError::Names`] when the names database cannot be loaded; the
    /// channel is already closed in the latter case. A missing default
    /// database is not an error.
    pub fn start(&self) -> Result<Session, SessionError> {
        let resolver = PluginResolver::with_bundled(self.lib_dir.clone());
        let channel = self.opener.open()?;
        debug!(target: "tc::session", lib_dir = %self.lib_dir, "control channel opened");

        let names = match self.load_names() {
            Ok(names) => names,
            Err(error) => {
                channel.close();
                return Err(error.into());
            }
        };

        Ok(Session {
            channel,
            resolver,
            display: self.display,
            names,
        })
    }

    fn load_names(&self) -> Result<Option<ClassNames>, NamesError> {
        let Some(source) = &self.names else {
            return Ok(None);
        };
        match ClassNames::load(&source.path) {
            Ok(names) => Ok(Some(names)),
            Err(error) if !source.explicit && error.is_missing_file() => {
                debug!(target: "tc::session", path = %source.path, "no class names database");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Closes the session's channel.
    pub fn stop(&self, session: Session) {
        let Session { channel, .. } = session;
        channel.close();
        debug!(target: "tc::session", "control channel closed");
    }
}
