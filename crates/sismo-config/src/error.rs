//! Configuration and arrival-table errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a pipeline configuration or arrival table could not be loaded, saved
/// or accepted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or arrival file could not be opened or read.
    #[error("cannot read '{path}': {source}")]
    ReadFile {
        /// File that was being read.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be written.
    #[error("cannot write '{path}': {source}")]
    WriteFile {
        /// File that was being written.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// The parent directory of a configuration file could not be created.
    #[error("cannot create directory '{path}': {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// The document is not valid TOML or does not match the expected tables.
    #[error("malformed TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("cannot render TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A processing parameter is outside its usable range.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted key of the parameter, e.g. `response.damping`.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::Invalid`] for the parameter at `field`.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
