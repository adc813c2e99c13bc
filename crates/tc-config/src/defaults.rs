use camino::Utf8PathBuf;

/// Extension directory used when `TC_LIB_DIR` is not set.
pub const DEFAULT_LIB_DIR: &str = "/usr/lib/tc";

/// Class names database read by `-nm` when no `-cf` path is given.
pub const DEFAULT_NAMES_PATH: &str = "/etc/iproute2/tc_cls";

/// Directory where `ip netns` bind-mounts named namespaces.
pub const DEFAULT_NETNS_DIR: &str = "/var/run/netns";

/// Default log filter expression. The tool is quiet unless asked otherwise.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default extension directory.
pub fn default_lib_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_LIB_DIR)
}

/// Default class names database path.
pub fn default_names_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_NAMES_PATH)
}

/// Default named namespace directory.
pub fn default_netns_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_NETNS_DIR)
}

/// Default log filter expression.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default diagnostic format: a single human-readable line per event.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}
