//! Deciding which argument is the HTML body and which the plain-text body.
//!
//! Bodies come either from files (`--html` / `--plain`) or from up to two
//! positional arguments. Positional arguments carry no type, so a
//! [`Classifier`] guesses which of them is HTML. The default classifier,
//! [`looks_like_html`], only looks for something tag-shaped: plain text that
//! happens to contain `<word ...>` is treated as HTML, and HTML without any
//! tag-like sequence is treated as plain text.

use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::message::ContentPart;
use htmd::{Element, HtmlToMarkdown};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Maximum number of positional body arguments.
pub const MAX_POSITIONAL: usize = 2;

/// Inert body sent when a provider template supplies the real content.
pub const TEMPLATE_PLACEHOLDER: &str = "<!-- Dummy Content -->";

/// Decides whether a positional argument is HTML.
pub type Classifier = fn(&str) -> bool;

#[allow(clippy::expect_used)]
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][^>]*>").expect("tag pattern is valid"));

/// Returns true if `text` contains a tag: `<`, a letter-led name, anything
/// but `>`, then `>`.
#[must_use]
pub fn looks_like_html(text: &str) -> bool {
    HTML_TAG.is_match(text)
}

/// Characters the Markdown converter escapes in text nodes.
const MARKDOWN_ESCAPED: &str = "\\*_`[]=~>-+#.";

fn inline(element: Element) -> Option<String> {
    Some(element.content.to_string())
}

fn block(element: Element) -> Option<String> {
    Some(format!("\n\n{}\n\n", element.content.trim()))
}

fn rule(_: Element) -> Option<String> {
    Some("\n\n--------\n\n".to_string())
}

fn attribute<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element
        .attrs
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.trim())
        .filter(|value| !value.is_empty())
}

/// Links render as `text ( url )`, or just the text when it already is the
/// URL or the link is page-local.
fn link(element: Element) -> Option<String> {
    let text = element.content.trim();
    let text = match attribute(&element, "href") {
        Some(href) if href.starts_with('#') || href == text => text.to_string(),
        Some(href) if text.is_empty() => href.to_string(),
        Some(href) => format!("{text} ( {href} )"),
        None => text.to_string(),
    };
    Some(text)
}

fn image(element: Element) -> Option<String> {
    Some(attribute(&element, "alt").unwrap_or_default().to_string())
}

fn cell(element: Element) -> Option<String> {
    let text = element.content.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(format!("{text} | "))
}

fn row(element: Element) -> Option<String> {
    let cells = element.content.trim().trim_end_matches('|').trim_end();
    Some(format!("\n{cells}\n"))
}

/// Drops the backslash the Markdown converter puts in front of special
/// characters.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match chars.next_if(|next| ch == '\\' && MARKDOWN_ESCAPED.contains(*next)) {
            Some(escaped) => out.push(escaped),
            None => out.push(ch),
        }
    }
    out
}

/// Strips trailing spaces and collapses runs of blank lines.
fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank = false;
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            if blank {
                continue;
            }
            blank = true;
        } else {
            blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Converts HTML into readable plain text.
///
/// Paragraphs, headings and lists keep their line structure, table rows
/// become `cell | cell` lines, links become `text ( url )`, and emphasis
/// is dropped. Script and style contents are removed.
///
/// # Errors
///
/// Returns an error if the converter fails on the input.
pub fn html_to_text(html: &str) -> std::io::Result<String> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "head"])
        .add_handler(vec!["strong", "b", "em", "i", "code"], inline)
        .add_handler(vec!["h1", "h2", "h3", "h4", "h5", "h6", "pre"], block)
        .add_handler(vec!["hr"], rule)
        .add_handler(vec!["a"], link)
        .add_handler(vec!["img"], image)
        .add_handler(vec!["th", "td"], cell)
        .add_handler(vec!["tr"], row)
        .build();
    let markdown = converter.convert(html)?;
    Ok(tidy(&unescape(&markdown)))
}

/// Like [`html_to_text`], but a failed conversion is logged and yields an
/// empty string.
fn derive_plain(html: &str) -> String {
    html_to_text(html).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to convert HTML body into plain text");
        String::new()
    })
}

fn read_body(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "Reading body file");
    std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))
}

/// Negotiated message bodies. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bodies {
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub plain: String,
}

impl Bodies {
    /// Creates bodies from HTML and plain text.
    #[must_use]
    pub fn new(html: impl Into<String>, plain: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            plain: plain.into(),
        }
    }

    /// Returns true if both bodies are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.plain.is_empty()
    }

    /// Converts into content parts ordered plain text first, then HTML.
    /// Empty bodies are skipped.
    #[must_use]
    pub fn into_parts(self) -> Vec<ContentPart> {
        [
            (ContentType::text_plain(), self.plain),
            (ContentType::text_html(), self.html),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(content_type, value)| ContentPart::new(content_type, value))
        .collect()
    }
}

/// Content negotiator.
#[derive(Debug, Clone, Copy)]
pub struct Negotiator {
    classifier: Classifier,
    template: bool,
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl Negotiator {
    /// Creates a negotiator using [`looks_like_html`] and no template.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classifier: looks_like_html,
            template: false,
        }
    }

    /// Replaces the HTML classifier.
    #[must_use]
    pub const fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Marks that a provider template is in use.
    ///
    /// With a template and no content, the placeholder body is used instead
    /// of failing with [`Error::MissingBody`].
    #[must_use]
    pub const fn with_template(mut self, template: bool) -> Self {
        self.template = template;
        self
    }

    /// Decides the HTML and plain-text bodies.
    ///
    /// Body files take priority over positional arguments. Without files,
    /// the first positional argument the classifier accepts is the HTML body
    /// and the other one, if any and non-empty, the plain-text body. A lone
    /// HTML argument gets a plain-text body derived from it. If nothing looks
    /// like HTML the first argument is the plain-text body.
    ///
    /// # Errors
    ///
    /// - [`Error::TooManyArguments`] for more than two positional arguments.
    /// - [`Error::MissingBody`] when there is no content and no template.
    /// - [`Error::FileRead`] when a body file cannot be read.
    pub fn negotiate(
        &self,
        positional: &[String],
        html_file: Option<&Path>,
        plain_file: Option<&Path>,
    ) -> Result<Bodies> {
        if positional.len() > MAX_POSITIONAL {
            return Err(Error::TooManyArguments(positional.len()));
        }

        if html_file.is_some() || plain_file.is_some() {
            return Self::from_files(html_file, plain_file);
        }

        if !self.template || !positional.is_empty() {
            return self.from_positional(positional);
        }

        tracing::debug!("Using placeholder body for template");
        Ok(Bodies::new(TEMPLATE_PLACEHOLDER, ""))
    }

    fn from_files(html_file: Option<&Path>, plain_file: Option<&Path>) -> Result<Bodies> {
        let html = html_file.map(read_body).transpose()?.unwrap_or_default();
        let plain = match plain_file {
            Some(path) => read_body(path)?,
            None => derive_plain(&html),
        };
        Ok(Bodies { html, plain })
    }

    fn from_positional(&self, positional: &[String]) -> Result<Bodies> {
        let first = positional.first().ok_or(Error::MissingBody)?;

        let html_index = positional.iter().position(|arg| (self.classifier)(arg));
        if let Some(index) = html_index {
            let html = positional[index].clone();
            if positional.len() == 1 {
                let plain = derive_plain(&html);
                return Ok(Bodies { html, plain });
            }
            let plain = positional
                .iter()
                .enumerate()
                .find(|(i, arg)| *i != index && !arg.is_empty())
                .map(|(_, arg)| arg.clone())
                .unwrap_or_default();
            return Ok(Bodies { html, plain });
        }

        if first.is_empty() {
            return Err(Error::MissingBody);
        }
        Ok(Bodies::new("", first.clone()))
    }
}

/// Negotiates bodies with the default classifier and no template.
///
/// See [`Negotiator::negotiate`].
///
/// # Errors
///
/// See [`Negotiator::negotiate`].
pub fn negotiate(
    positional: &[String],
    html_file: Option<&Path>,
    plain_file: Option<&Path>,
) -> Result<Bodies> {
    Negotiator::new().negotiate(positional, html_file, plain_file)
}
