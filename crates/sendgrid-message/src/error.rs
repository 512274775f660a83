//! Error types for message composition.

use std::io;
use std::path::PathBuf;

/// Result type alias for message operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message composition error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or empty email address.
    #[error("Invalid email address: {0:?}")]
    InvalidAddress(String),

    /// No body was supplied and no template is set.
    #[error(
        "Missing message body. Provide one with --html and/or --plain, \
         or as positional arguments"
    )]
    MissingBody,

    /// More positional body arguments than the tool understands.
    #[error("Too many positional arguments: got {0}, at most 2 are accepted")]
    TooManyArguments(usize),

    /// Subject line missing or empty.
    #[error("The subject is required")]
    MissingSubject,

    /// No `to` recipient.
    #[error("At least one recipient is required (use -t/--to)")]
    MissingRecipient,

    /// Template substitution not in `key=value` form.
    #[error("Incorrect substitution {0:?}, expected key=value")]
    InvalidSubstitution(String),

    /// Body or attachment file could not be read.
    #[error("Failed to read {path:?}: {source}")]
    FileRead {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

impl Error {
    /// Creates a file read error for `path`.
    #[must_use]
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by invalid user input.
    ///
    /// These are raised before anything is sent.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress(_)
                | Self::MissingBody
                | Self::TooManyArguments(_)
                | Self::MissingSubject
                | Self::MissingRecipient
                | Self::InvalidSubstitution(_)
        )
    }
}
