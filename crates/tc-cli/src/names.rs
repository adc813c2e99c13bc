//! Class names database used by `-nm`.
//!
//! Each non-comment line maps a class id to a symbolic name:
//!
//! ```text
//! # id     name
//! 1:10     interactive
//! 1:20     bulk
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tc_netlink::TcHandle;
use thiserror::Error;

/// Failure to load the class names database.
#[derive(Debug, Error)]
pub enum NamesError {
    /// The file could not be read.
    #[error("Cannot read class names file \"{path}\": {source}")]
    Read {
        /// Database location.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// A line is not `<classid> <name>`.
    #[error("{path}:{line}: invalid class names entry \"{text}\"")]
    Parse {
        /// Database location.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },
}

impl NamesError {
    /// True when the database file does not exist.
    #[must_use]
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Symbolic names for class handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: HashMap<u32, String>,
}

impl ClassNames {
    /// Reads the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NamesError`] when the file cannot be read or a line is
    /// malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, NamesError> {
        let text = fs::read_to_string(path).map_err(|source| NamesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    fn parse(path: &Utf8Path, text: &str) -> Result<Self, NamesError> {
        let mut names = HashMap::new();
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let malformed = || NamesError::Parse {
                path: path.to_path_buf(),
                line: index.saturating_add(1),
                text: line.to_owned(),
            };
            let mut fields = trimmed.split_whitespace();
            let (Some(id), Some(name), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed());
            };
            let handle = TcHandle::parse_classid(id).map_err(|_| malformed())?;
            names.insert(handle.raw(), name.to_owned());
        }
        Ok(Self { names })
    }

    /// The name registered for `handle`.
    #[must_use]
    pub fn name_of(&self, handle: TcHandle) -> Option<&str> {
        self.names.get(&handle.raw()).map(String::as_str)
    }

    /// `handle` rendered as its name when one is known.
    #[must_use]
    pub fn format(&self, handle: TcHandle) -> String {
        self.name_of(handle)
            .map_or_else(|| handle.to_string(), str::to_owned)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no entries were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
