//! Error taxonomy shared by every component of the navigator.
//!
//! Only the configuration variants are fatal, and only at startup. All
//! the others are reported to the operator at the point where they occur
//! and the menu loop carries on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Error, Debug)]
pub enum NavError {
    /// A required configuration document does not exist.
    #[error("configuration file not found: {}", .path.display())]
    ConfigMissing { path: PathBuf },

    /// A configuration document exists but is not valid JSON for its schema.
    #[error("failed to parse {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but cannot be navigated (e.g. no root menu).
    #[error("invalid configuration in {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("no input given")]
    EmptyInput,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("failed to launch {program}: {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("raw keyboard input unavailable: {0}")]
    RawModeUnavailable(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
