//! # sendgrid-api
//!
//! Request building and dispatch for the SendGrid mail-send APIs.
//!
//! ## Features
//!
//! - **v3 JSON API**: API-key authentication, one personalization holding
//!   every recipient, attachments, templates and `[%key%]` substitutions
//! - **Legacy v2 form API**: username/password authentication, URL-encoded
//!   or `multipart/form-data` when files are attached
//! - **Single attempt**: one request per send, the full response is returned
//!
//! ## Quick Start
//!
//! ```ignore
//! use sendgrid_api::{Client, Credentials, Endpoint};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::resolve(None, None, None, Some("SG.xxxx"))?;
//!     let client = Client::new(credentials, Endpoint::sendgrid()?);
//!
//!     let delivery = client.send(&message).await?;
//!     println!("Status: {}", delivery.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`v3`]: JSON payload for `POST /v3/mail/send`
//! - [`legacy`]: Form payload for `POST /api/mail.send.json`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod credentials;
mod endpoint;
mod error;
pub mod legacy;
pub mod v3;

pub use client::{Client, Delivery};
pub use credentials::Credentials;
pub use endpoint::{Endpoint, SENDGRID_API_URL};
pub use error::{Error, Result};
pub use legacy::LegacyForm;
pub use v3::MailSend;
