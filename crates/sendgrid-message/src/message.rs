//! The outgoing message and its parts.

use crate::address::Address;
use crate::body::Bodies;
use crate::content_type::ContentType;
use crate::encoding::{decode_base64, encode_base64};
use crate::error::{Error, Result};
use std::path::Path;

/// A body part of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPart {
    content_type: ContentType,
    value: String,
}

impl ContentPart {
    /// Creates a content part.
    #[must_use]
    pub const fn new(content_type: ContentType, value: String) -> Self {
        Self {
            content_type,
            value,
        }
    }

    /// Creates a text/plain part.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(ContentType::text_plain(), value.into())
    }

    /// Creates a text/html part.
    #[must_use]
    pub fn html(value: impl Into<String>) -> Self {
        Self::new(ContentType::text_html(), value.into())
    }

    /// Returns the content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Returns the body text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Disposition sent with every attachment.
pub const ATTACHMENT_DISPOSITION: &str = "attachment";

/// A file attached to the message, held base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content_type: ContentType,
    content: String,
}

impl Attachment {
    /// Creates an attachment from raw bytes.
    ///
    /// The content type is inferred from the filename extension.
    #[must_use]
    pub fn new(filename: impl Into<String>, data: &[u8]) -> Self {
        let filename = filename.into();
        Self {
            content_type: ContentType::from_path(&filename),
            content: encode_base64(data),
            filename,
        }
    }

    /// Reads a file from disk and attaches it under its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
        let filename = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
            .into_owned();

        let attachment = Self::new(filename, &data);
        tracing::debug!(
            path = %path.display(),
            filename = attachment.filename(),
            content_type = %attachment.content_type,
            size = data.len(),
            "Adding attachment"
        );
        Ok(attachment)
    }

    /// Overrides the inferred content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Returns the file name.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Returns the base64-encoded content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Decodes the content back into bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored content is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64(&self.content)
    }
}

/// A template placeholder and its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    key: String,
    value: String,
}

impl Substitution {
    /// Creates a substitution for `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses `key=value`, splitting at the first `=`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the key is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self::new(key, value)),
            _ => Err(Error::InvalidSubstitution(raw.to_string())),
        }
    }

    /// Returns the bare key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the placeholder as it appears in the template, `[%key%]`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("[%{}%]", self.key)
    }

    /// Returns the replacement value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::str::FromStr for Substitution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An email ready to be handed to the provider.
///
/// Built with [`MessageBuilder`], which enforces that there is at least one
/// recipient, a subject, and either some content or a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    from: Address,
    to: Vec<Address>,
    cc: Vec<Address>,
    subject: String,
    contents: Vec<ContentPart>,
    attachments: Vec<Attachment>,
    template_id: Option<String>,
    substitutions: Vec<Substitution>,
}

impl Message {
    /// Starts building a message from `from`.
    #[must_use]
    pub fn builder(from: Address) -> MessageBuilder {
        MessageBuilder::new(from)
    }

    /// Returns the sender.
    #[must_use]
    pub const fn from(&self) -> &Address {
        &self.from
    }

    /// Returns the `to` recipients, never empty.
    #[must_use]
    pub fn to(&self) -> &[Address] {
        &self.to
    }

    /// Returns the `cc` recipients.
    #[must_use]
    pub fn cc(&self) -> &[Address] {
        &self.cc
    }

    /// Returns the subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the body parts, plain text before HTML.
    #[must_use]
    pub fn contents(&self) -> &[ContentPart] {
        &self.contents
    }

    /// Returns the HTML body, if any.
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.contents
            .iter()
            .find(|part| part.content_type().is_html())
            .map(ContentPart::value)
    }

    /// Returns the plain-text body, if any.
    #[must_use]
    pub fn plain(&self) -> Option<&str> {
        self.contents
            .iter()
            .find(|part| part.content_type().is_plain())
            .map(ContentPart::value)
    }

    /// Returns the attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the provider template identifier.
    #[must_use]
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    /// Returns the template substitutions.
    ///
    /// Always empty when no template is set.
    #[must_use]
    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }
}

/// Builder for [`Message`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    from: Address,
    to: Vec<Address>,
    cc: Vec<Address>,
    subject: String,
    contents: Vec<ContentPart>,
    attachments: Vec<Attachment>,
    template_id: Option<String>,
    substitutions: Vec<Substitution>,
}

impl MessageBuilder {
    /// Creates a builder for a message sent by `from`.
    #[must_use]
    pub const fn new(from: Address) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            subject: String::new(),
            contents: Vec::new(),
            attachments: Vec::new(),
            template_id: None,
            substitutions: Vec::new(),
        }
    }

    /// Adds a `to` recipient.
    #[must_use]
    pub fn to(mut self, address: Address) -> Self {
        self.to.push(address);
        self
    }

    /// Adds a `cc` recipient.
    #[must_use]
    pub fn cc(mut self, address: Address) -> Self {
        self.cc.push(address);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the body parts from negotiated bodies.
    #[must_use]
    pub fn bodies(mut self, bodies: Bodies) -> Self {
        self.contents = bodies.into_parts();
        self
    }

    /// Appends a body part.
    #[must_use]
    pub fn content(mut self, part: ContentPart) -> Self {
        self.contents.push(part);
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets the provider template. Empty identifiers are ignored.
    #[must_use]
    pub fn template_id(mut self, template_id: impl Into<String>) -> Self {
        let template_id = template_id.into();
        self.template_id = (!template_id.is_empty()).then_some(template_id);
        self
    }

    /// Adds a template substitution.
    #[must_use]
    pub fn substitution(mut self, substitution: Substitution) -> Self {
        tracing::debug!(
            placeholder = %substitution.placeholder(),
            value = substitution.value(),
            "Adding substitution"
        );
        self.substitutions.push(substitution);
        self
    }

    /// Validates and builds the message.
    ///
    /// Substitutions are dropped when no template is set.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingRecipient`] without a `to` address.
    /// - [`Error::MissingSubject`] with an empty subject.
    /// - [`Error::MissingBody`] without content and without a template.
    pub fn build(self) -> Result<Message> {
        if self.to.is_empty() {
            return Err(Error::MissingRecipient);
        }
        if self.subject.is_empty() {
            return Err(Error::MissingSubject);
        }
        if self.contents.is_empty() && self.template_id.is_none() {
            return Err(Error::MissingBody);
        }

        let substitutions = if self.template_id.is_some() {
            self.substitutions
        } else {
            if !self.substitutions.is_empty() {
                tracing::warn!(
                    count = self.substitutions.len(),
                    "Ignoring substitutions without a template"
                );
            }
            Vec::new()
        };

        Ok(Message {
            from: self.from,
            to: self.to,
            cc: self.cc,
            subject: self.subject,
            contents: self.contents,
            attachments: self.attachments,
            template_id: self.template_id,
            substitutions,
        })
    }
}
