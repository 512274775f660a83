//! v3 mail-send JSON payload.
//!
//! Every recipient goes into a single personalization, so all of them see the
//! same content and substitutions.

use crate::error::Result;
use sendgrid_message::{
    ATTACHMENT_DISPOSITION, Address, Attachment, Bodies, ContentPart, ContentType, Message,
    Substitution,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /v3/mail/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSend {
    /// Recipient groups; always exactly one here.
    pub personalizations: Vec<Personalization>,
    /// Sender.
    pub from: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Body parts, plain text first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,
    /// File attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentPayload>,
    /// Provider-hosted template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// Recipients sharing one content set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personalization {
    /// Primary recipients.
    pub to: Vec<EmailAddress>,
    /// Carbon-copy recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<EmailAddress>,
    /// Template placeholders (`[%key%]`) and their values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, String>,
}

/// Address object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Body part object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// `text/plain` or `text/html`.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Body text.
    pub value: String,
}

/// Attachment object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPayload {
    /// Base64-encoded file content.
    pub content: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub content_type: String,
    /// File name shown to the recipient.
    pub filename: String,
    /// `attachment` or `inline`.
    pub disposition: String,
}

impl From<&Address> for EmailAddress {
    fn from(address: &Address) -> Self {
        Self {
            email: address.email().to_string(),
            name: address.name().to_string(),
        }
    }
}

impl TryFrom<&EmailAddress> for Address {
    type Error = sendgrid_message::Error;

    fn try_from(address: &EmailAddress) -> sendgrid_message::Result<Self> {
        Self::new(address.name.clone(), address.email.clone())
    }
}

impl From<&ContentPart> for Content {
    fn from(part: &ContentPart) -> Self {
        Self {
            content_type: part.content_type().essence(),
            value: part.value().to_string(),
        }
    }
}

impl From<&Attachment> for AttachmentPayload {
    fn from(attachment: &Attachment) -> Self {
        Self {
            content: attachment.content().to_string(),
            content_type: attachment.content_type().essence(),
            filename: attachment.filename().to_string(),
            disposition: ATTACHMENT_DISPOSITION.to_string(),
        }
    }
}

impl From<&Message> for MailSend {
    fn from(message: &Message) -> Self {
        let substitutions = message
            .substitutions()
            .iter()
            .map(|sub| (sub.placeholder(), sub.value().to_string()))
            .collect();

        let personalization = Personalization {
            to: message.to().iter().map(EmailAddress::from).collect(),
            cc: message.cc().iter().map(EmailAddress::from).collect(),
            substitutions,
        };

        Self {
            personalizations: vec![personalization],
            from: message.from().into(),
            subject: message.subject().to_string(),
            content: message
                .contents()
                .iter()
                .filter(|part| !part.value().is_empty())
                .map(Content::from)
                .collect(),
            attachments: message.attachments().iter().map(Into::into).collect(),
            template_id: message.template_id().map(str::to_string),
        }
    }
}

impl MailSend {
    /// Serializes the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a payload from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuilds the message this payload describes.
    ///
    /// Only the first personalization is read.
    ///
    /// # Errors
    ///
    /// Returns an error if an address, content type, or attachment is
    /// malformed, or the result fails message validation.
    pub fn to_message(&self) -> Result<Message> {
        let mut builder = Message::builder(Address::try_from(&self.from)?)
            .subject(self.subject.clone());

        if let Some(personalization) = self.personalizations.first() {
            for to in &personalization.to {
                builder = builder.to(Address::try_from(to)?);
            }
            for cc in &personalization.cc {
                builder = builder.cc(Address::try_from(cc)?);
            }
            for (placeholder, value) in &personalization.substitutions {
                let key = placeholder
                    .strip_prefix("[%")
                    .and_then(|p| p.strip_suffix("%]"))
                    .unwrap_or(placeholder);
                builder = builder.substitution(Substitution::new(key, value.clone()));
            }
        }

        let mut bodies = Bodies::default();
        for content in &self.content {
            let content_type = ContentType::parse(&content.content_type)?;
            if content_type.is_html() {
                bodies.html.clone_from(&content.value);
            } else if content_type.is_plain() {
                bodies.plain.clone_from(&content.value);
            }
        }
        builder = builder.bodies(bodies);

        for payload in &self.attachments {
            let data = sendgrid_message::encoding::decode_base64(&payload.content)?;
            let attachment = Attachment::new(payload.filename.clone(), &data)
                .with_content_type(ContentType::parse(&payload.content_type)?);
            builder = builder.attach(attachment);
        }

        if let Some(template_id) = &self.template_id {
            builder = builder.template_id(template_id.clone());
        }

        Ok(builder.build()?)
    }
}
