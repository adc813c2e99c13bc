//! Switching into a named network namespace for `-netns`.
//!
//! Named namespaces are bind mounts under the configured namespace directory,
//! `/var/run/netns` by default. Switching happens before the control channel
//! is opened so that the channel talks to the namespace's kernel tables.

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure to enter a named network namespace.
#[derive(Debug, Error)]
pub enum NetnsError {
    /// The name cannot denote an entry of the namespace directory.
    #[error("Invalid netns name \"{name}\"")]
    InvalidName {
        /// Name as given.
        name: String,
    },
    /// The namespace handle could not be opened.
    #[error("Cannot open network namespace \"{name}\": {source}")]
    Open {
        /// Name as given.
        name: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The kernel refused the switch.
    #[error("setting the network namespace \"{name}\" failed: {source}")]
    Switch {
        /// Name as given.
        name: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

/// Location of the namespace handle for `name` under `dir`.
pub(crate) fn namespace_path(dir: &Utf8Path, name: &str) -> Result<Utf8PathBuf, NetnsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(NetnsError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(dir.join(name))
}

/// Moves the calling thread into the network namespace `name`.
pub(crate) fn switch(dir: &Utf8Path, name: &str) -> Result<(), NetnsError> {
    let path = namespace_path(dir, name)?;
    let handle = File::open(&path).map_err(|source| NetnsError::Open {
        name: name.to_owned(),
        source,
    })?;
    // SAFETY: the descriptor stays open for the duration of the call.
    let result = unsafe { libc::setns(handle.as_raw_fd(), libc::CLONE_NEWNET) };
    if result != 0 {
        return Err(NetnsError::Switch {
            name: name.to_owned(),
            source: io::Error::last_os_error(),
        });
    }
    debug!(target: "tc::netns", namespace = name, path = %path, "switched network namespace");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    fn rejects_names_outside_the_directory(#[case] name: &str) {
        let error = namespace_path(Utf8Path::new("/var/run/netns"), name).expect_err("invalid");
        assert!(matches!(error, NetnsError::InvalidName { .. }));
    }

    #[test]
    fn joins_plain_names() {
        let path = namespace_path(Utf8Path::new("/var/run/netns"), "blue").expect("valid");
        assert_eq!(path.as_str(), "/var/run/netns/blue");
    }

    #[test]
    fn missing_namespace_reports_open_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 path");
        let error = switch(root, "absent").expect_err("should fail");
        assert!(error.to_string().starts_with("Cannot open network namespace \"absent\""));
    }
}
