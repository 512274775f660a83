//! Email address parsing.
//!
//! Accepts the two forms people type on a command line:
//! `"Full Name <name@domain>"` and a bare `"name@domain"`. This is a narrow
//! heuristic, not RFC 5322 parsing; the address part is passed to the
//! provider as-is and validated there.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Separator between the display name and the bracketed address.
const NAME_SEPARATOR: &str = " <";

/// Email address with a display name.
///
/// When no display name is given the name equals the address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    name: String,
    email: String,
}

impl Address {
    /// Creates an address from already separated parts.
    ///
    /// An empty `name` falls back to `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if `email` is empty.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        if email.is_empty() {
            return Err(Error::InvalidAddress(email));
        }
        let name = name.into();
        let name = if name.is_empty() { email.clone() } else { name };
        Ok(Self { name, email })
    }

    /// Parses `"Name <email>"` or `"email"`.
    ///
    /// The input is split on `" <"` and every token is trimmed of spaces and
    /// angle brackets. With one token it is both name and address; otherwise
    /// token 0 is the name and token 1 the address. Any further tokens are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or leaves an empty address.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::InvalidAddress(raw.to_string()));
        }

        let tokens: Vec<&str> = raw.split(NAME_SEPARATOR).map(trim_token).collect();
        let (name, email) = match tokens.as_slice() {
            [single] => (*single, *single),
            [name, email, rest @ ..] => {
                if !rest.is_empty() {
                    tracing::warn!(address = raw, dropped = ?rest, "Ignoring extra address tokens");
                }
                (*name, *email)
            }
            [] => ("", ""),
        };

        if email.is_empty() {
            return Err(Error::InvalidAddress(raw.to_string()));
        }

        Self::new(name, email)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns true if a display name distinct from the address was given.
    #[must_use]
    pub fn has_display_name(&self) -> bool {
        self.name != self.email
    }
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| c == ' ' || c == '<' || c == '>')
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_display_name() {
            write!(f, "{} <{}>", self.name, self.email)
        } else {
            write!(f, "{}", self.email)
        }
    }
}
