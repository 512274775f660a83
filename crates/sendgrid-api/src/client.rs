//! HTTP client that submits a message to the provider.

use crate::credentials::Credentials;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::legacy::LegacyForm;
use crate::v3::MailSend;
use reqwest::Response;
use sendgrid_message::Message;
use serde::Serialize;

/// The provider's answer to a send request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in the order received.
    pub headers: Vec<(String, String)>,
    /// Full response body.
    pub body: String,
}

impl Delivery {
    /// Reads status, headers, and the whole body from a response.
    async fn read(response: Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Provider client.
///
/// Sends exactly one request per call. There are no retries; a failed
/// attempt is returned to the caller as is.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Endpoint,
    credentials: Credentials,
    http_client: reqwest::Client,
}

impl Client {
    /// Creates a client for `endpoint`.
    #[must_use]
    pub fn new(credentials: Credentials, endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            credentials,
            http_client: reqwest::Client::new(),
        }
    }

    /// Returns the credentials in use.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sends `message` through the API selected by the credentials.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the request cannot be completed.
    /// - [`Error::Provider`] if the provider answers with a non-2xx status.
    /// - [`Error::Message`] if an attachment cannot be encoded.
    pub async fn send(&self, message: &Message) -> Result<Delivery> {
        let response = match &self.credentials {
            Credentials::ApiKey(key) => self.send_v3(key, message).await?,
            Credentials::Legacy { user, password } => {
                self.send_legacy(user, password, message).await?
            }
        };

        let delivery = Delivery::read(response).await?;
        tracing::debug!(status = delivery.status, "Provider responded");

        if delivery.is_success() {
            Ok(delivery)
        } else {
            Err(Error::provider(delivery.status, delivery.body))
        }
    }

    async fn send_v3(&self, key: &str, message: &Message) -> Result<Response> {
        let url = self.endpoint.mail_send()?;
        let payload = MailSend::from(message);
        tracing::debug!(%url, recipients = message.to().len() + message.cc().len(), "Sending v3 mail");

        Ok(self
            .http_client
            .post(url)
            .bearer_auth(key)
            .json(&payload)
            .send()
            .await?)
    }

    async fn send_legacy(&self, user: &str, password: &str, message: &Message) -> Result<Response> {
        let url = self.endpoint.legacy_mail_send()?;
        let form = LegacyForm::new(message, user, password)?;
        tracing::debug!(%url, multipart = form.is_multipart(), "Sending legacy mail");

        let request = self.http_client.post(url);
        let request = if form.is_multipart() {
            request.multipart(form.into_multipart()?)
        } else {
            request.form(form.fields())
        };

        Ok(request.send().await?)
    }
}
