//! Provider endpoint configuration.

use crate::error::Result;
use url::Url;

/// Production API base URL.
pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com";

/// Path of the v3 JSON mail-send endpoint.
const V3_MAIL_SEND: &str = "v3/mail/send";

/// Path of the legacy v2 form mail-send endpoint.
const LEGACY_MAIL_SEND: &str = "api/mail.send.json";

/// Base URL the mail-send endpoints are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: Url,
}

impl Endpoint {
    /// Creates an endpoint rooted at `base_url`.
    ///
    /// A trailing slash is added so paths under the base are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    /// The production SendGrid endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn sendgrid() -> Result<Self> {
        Self::new(SENDGRID_API_URL)
    }

    /// URL of `POST /v3/mail/send`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn mail_send(&self) -> Result<Url> {
        Ok(self.base_url.join(V3_MAIL_SEND)?)
    }

    /// URL of `POST /api/mail.send.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn legacy_mail_send(&self) -> Result<Url> {
        Ok(self.base_url.join(LEGACY_MAIL_SEND)?)
    }
}
