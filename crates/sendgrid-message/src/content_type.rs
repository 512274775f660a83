//! MIME content type handling.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Content type used when the extension gives no hint.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME content type, `type/subtype`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "application").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "pdf").
    pub sub_type: String,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html")
    }

    /// Creates an application/octet-stream content type.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Infers the content type from a file extension.
    ///
    /// Unknown or missing extensions yield `application/octet-stream`.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        mime_guess::from_path(path).first().map_or_else(Self::octet_stream, |mime| {
            Self::new(mime.type_().as_str(), mime.subtype().as_str())
        })
    }

    /// Returns `type/subtype`.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Checks if this is text/html.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("text") && self.sub_type.eq_ignore_ascii_case("html")
    }

    /// Checks if this is text/plain.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("text") && self.sub_type.eq_ignore_ascii_case("plain")
    }

    /// Parses a content type string such as `text/html; charset=utf-8`.
    ///
    /// Names are lowercased. Anything after the first `;` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the `type/subtype` part is malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        essence
            .split_once('/')
            .map(|(main, sub)| (main.trim().to_lowercase(), sub.trim().to_lowercase()))
            .filter(|(main, sub)| !main.is_empty() && !sub.is_empty())
            .map(|(main, sub)| Self::new(main, sub))
            .ok_or_else(|| Error::InvalidContentType(s.to_string()))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)
    }
}

impl std::str::FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
