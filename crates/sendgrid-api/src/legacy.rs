//! Legacy v2 `mail.send.json` form request.
//!
//! The v2 API takes flat form fields and account credentials. Without
//! attachments the form is URL-encoded; with attachments it becomes
//! `multipart/form-data` with one `files[<name>]` part per file.

use crate::error::Result;
use reqwest::multipart::{Form, Part};
use sendgrid_message::{Address, Message};
use serde_json::json;
use std::collections::BTreeMap;

/// A file part of a multipart legacy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFile {
    /// Form field name, `files[<filename>]`.
    pub field: String,
    /// File name.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Raw file content.
    pub data: Vec<u8>,
}

/// Flattened legacy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyForm {
    fields: Vec<(String, String)>,
    files: Vec<LegacyFile>,
}

fn push_addresses(
    fields: &mut Vec<(String, String)>,
    field: &str,
    name_field: &str,
    addresses: &[Address],
) {
    for address in addresses {
        fields.push((field.to_string(), address.email().to_string()));
    }
    for address in addresses {
        fields.push((name_field.to_string(), address.name().to_string()));
    }
}

/// Builds the `x-smtpapi` header that enables a template and carries its
/// substitutions. The v2 API expects one value per recipient.
fn smtpapi_header(message: &Message, template_id: &str) -> String {
    let recipients = message.to().len();
    let sub: BTreeMap<String, Vec<&str>> = message
        .substitutions()
        .iter()
        .map(|s| (s.placeholder(), vec![s.value(); recipients]))
        .collect();

    let mut header = json!({
        "filters": {
            "templates": {
                "settings": { "enable": 1, "template_id": template_id }
            }
        }
    });
    if !sub.is_empty() {
        header["sub"] = json!(sub);
    }
    header.to_string()
}

impl LegacyForm {
    /// Flattens `message` into legacy form fields.
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment's content cannot be decoded.
    pub fn new(message: &Message, user: &str, password: &str) -> Result<Self> {
        let mut fields = vec![
            ("api_user".to_string(), user.to_string()),
            ("api_key".to_string(), password.to_string()),
            ("subject".to_string(), message.subject().to_string()),
            ("from".to_string(), message.from().email().to_string()),
            ("fromname".to_string(), message.from().name().to_string()),
        ];

        push_addresses(&mut fields, "to[]", "toname[]", message.to());
        if !message.cc().is_empty() {
            push_addresses(&mut fields, "cc[]", "ccname[]", message.cc());
        }

        if let Some(html) = message.html().filter(|v| !v.is_empty()) {
            fields.push(("html".to_string(), html.to_string()));
        }
        if let Some(text) = message.plain().filter(|v| !v.is_empty()) {
            fields.push(("text".to_string(), text.to_string()));
        }

        if let Some(template_id) = message.template_id() {
            fields.push(("x-smtpapi".to_string(), smtpapi_header(message, template_id)));
        }

        let files = message
            .attachments()
            .iter()
            .map(|attachment| {
                Ok(LegacyFile {
                    field: format!("files[{}]", attachment.filename()),
                    filename: attachment.filename().to_string(),
                    content_type: attachment.content_type().essence(),
                    data: attachment.decode()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { fields, files })
    }

    /// Returns the form fields in request order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns all values of `name`.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the file parts.
    #[must_use]
    pub fn files(&self) -> &[LegacyFile] {
        &self.files
    }

    /// Returns true if the request must be sent as `multipart/form-data`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }

    /// Converts into a multipart form: file parts first, then text fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a file's MIME type is rejected.
    pub fn into_multipart(self) -> Result<Form> {
        let mut form = Form::new();
        for file in self.files {
            let part = Part::bytes(file.data)
                .file_name(file.filename)
                .mime_str(&file.content_type)?;
            form = form.part(file.field, part);
        }
        for (key, value) in self.fields {
            form = form.text(key, value);
        }
        Ok(form)
    }
}
