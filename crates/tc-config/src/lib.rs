//! Shared configuration for the `tc` traffic-control frontend.
//!
//! Values are layered by `ortho_config`: built-in defaults first, then an
//! optional TOML file named by `--config-path` or `TC_CONFIG_PATH`, then
//! `TC_*` environment variables, and finally the leading `--` flags of the
//! command line. `TC_LIB_DIR` therefore keeps its traditional meaning as the
//! extension directory override.

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_LIB_DIR, DEFAULT_LOG_FILTER, DEFAULT_NAMES_PATH, DEFAULT_NETNS_DIR, default_lib_dir,
    default_log_filter, default_log_filter_string, default_log_format, default_names_path,
    default_netns_dir,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the `tc` binary and its libraries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "TC")]
pub struct Config {
    /// Directory holding handler extension units (`q_<kind>.so`, `f_<kind>.so`).
    #[serde(default = "default_lib_dir")]
    #[ortho_config(default = default_lib_dir())]
    lib_dir: Utf8PathBuf,
    /// Class names database consulted when `-nm` is given without `-cf`.
    #[serde(default = "default_names_path")]
    #[ortho_config(default = default_names_path())]
    names_path: Utf8PathBuf,
    /// Directory holding named network namespaces for `-netns`.
    #[serde(default = "default_netns_dir")]
    #[ortho_config(default = default_netns_dir())]
    netns_dir: Utf8PathBuf,
    /// `tracing` filter directive applied to diagnostics.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    log_filter: String,
    /// Output format of diagnostics written to standard error.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lib_dir: default_lib_dir(),
            names_path: default_names_path(),
            netns_dir: default_netns_dir(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Directory searched for extension units.
    #[must_use]
    pub fn lib_dir(&self) -> &Utf8Path {
        &self.lib_dir
    }

    /// Default location of the class names database.
    #[must_use]
    pub fn names_path(&self) -> &Utf8Path {
        &self.names_path
    }

    /// Directory containing bind-mounted network namespaces.
    #[must_use]
    pub fn netns_dir(&self) -> &Utf8Path {
        &self.netns_dir
    }

    /// Log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Diagnostic output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns a copy pointing at a different extension directory.
    #[must_use]
    pub fn with_lib_dir(mut self, lib_dir: impl Into<Utf8PathBuf>) -> Self {
        self.lib_dir = lib_dir.into();
        self
    }

    /// Returns a copy pointing at a different class names database.
    #[must_use]
    pub fn with_names_path(mut self, names_path: impl Into<Utf8PathBuf>) -> Self {
        self.names_path = names_path.into();
        self
    }

    /// Returns a copy pointing at a different namespace directory.
    #[must_use]
    pub fn with_netns_dir(mut self, netns_dir: impl Into<Utf8PathBuf>) -> Self {
        self.netns_dir = netns_dir.into();
        self
    }

    /// Returns a copy using a different log filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, log_filter: impl Into<String>) -> Self {
        self.log_filter = log_filter.into();
        self
    }

    /// Returns a copy using a different diagnostic format.
    #[must_use]
    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }
}
