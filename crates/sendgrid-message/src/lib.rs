//! # sendgrid-message
//!
//! Composition of outgoing email for `sendgrid-cli`: address parsing, body
//! negotiation, attachments, and template substitutions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sendgrid_message::{Address, Attachment, Message, Negotiator, Substitution};
//!
//! let bodies = Negotiator::new().negotiate(&["<p>Hello</p>".to_string()], None, None)?;
//!
//! let message = Message::builder(Address::parse("Sender <sender@example.com>")?)
//!     .to(Address::parse("recipient@example.com")?)
//!     .subject("Greetings")
//!     .bodies(bodies)
//!     .attach(Attachment::from_file("report.pdf")?)
//!     .build()?;
//!
//! assert_eq!(message.html(), Some("<p>Hello</p>"));
//! assert_eq!(message.plain(), Some("Hello"));
//! ```
//!
//! ## Modules
//!
//! - [`body`]: HTML/plain-text body negotiation and HTML-to-text conversion
//! - [`encoding`]: Base64 helpers for attachment content

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
pub mod body;
mod content_type;
pub mod encoding;
mod error;
mod message;

pub use address::Address;
pub use body::{Bodies, Classifier, Negotiator, looks_like_html, negotiate};
pub use content_type::{ContentType, OCTET_STREAM};
pub use error::{Error, Result};
pub use message::{
    ATTACHMENT_DISPOSITION, Attachment, ContentPart, Message, MessageBuilder, Substitution,
};
