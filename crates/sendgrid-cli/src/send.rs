//! Composes the message from arguments and sends it.

use crate::args::Args;
use crate::config::Settings;
use crate::error::Result;
use sendgrid_api::{Client, Credentials, Delivery, Endpoint};
use sendgrid_message::body::MAX_POSITIONAL;
use sendgrid_message::{Address, Attachment, Error, Message, Negotiator, Substitution};
use std::io::Write;
use tracing::{debug, info, warn};

/// Builds the message described by `args`.
///
/// The sender comes from `settings`, which already holds any `--from`.
///
/// # Errors
///
/// Returns the first validation or file error encountered.
pub fn compose(args: &Args, settings: &Settings) -> sendgrid_message::Result<Message> {
    if args.bodies.len() > MAX_POSITIONAL {
        return Err(Error::TooManyArguments(args.bodies.len()));
    }

    let mut builder = Message::builder(Address::parse(&settings.from)?).subject(&args.subject);
    for raw in &args.to {
        builder = builder.to(Address::parse(raw)?);
    }
    for raw in &args.cc {
        builder = builder.cc(Address::parse(raw)?);
    }

    let template_id = args.template_id();
    let bodies = Negotiator::new()
        .with_template(template_id.is_some())
        .negotiate(&args.bodies, args.html.as_deref(), args.plain.as_deref())?;
    builder = builder.bodies(bodies);

    for path in &args.att {
        builder = builder.attach(Attachment::from_file(path)?);
    }

    match template_id {
        Some(id) => {
            builder = builder.template_id(id);
            for raw in &args.sub {
                builder = builder.substitution(Substitution::parse(raw)?);
            }
        }
        None if !args.sub.is_empty() => {
            warn!(count = args.sub.len(), "Ignoring substitutions without a template ID");
        }
        None => {}
    }

    builder.build()
}

/// Picks credentials from flags, then settings.
///
/// # Errors
///
/// Returns [`sendgrid_api::Error::MissingCredentials`] when none apply.
pub fn credentials(args: &Args, settings: &Settings) -> sendgrid_api::Result<Credentials> {
    Credentials::resolve(
        args.key.as_deref(),
        settings.user.as_deref(),
        settings.password.as_deref(),
        settings.key.as_deref(),
    )
}

/// Runs one send. `settings` must already include the flag overrides.
///
/// # Errors
///
/// Returns validation, file, transport and provider errors.
pub async fn run(args: &Args, settings: &Settings) -> Result<Delivery> {
    let message = compose(args, settings)?;
    let credentials = credentials(args, settings)?;
    let endpoint = Endpoint::new(&settings.api_url)?;
    let legacy = credentials.is_legacy();

    debug!(
        from = message.from().email(),
        to = message.to().len(),
        cc = message.cc().len(),
        attachments = message.attachments().len(),
        legacy,
        "Sending message"
    );

    let result = Client::new(credentials, endpoint).send(&message).await;
    match &result {
        Ok(delivery) => {
            if legacy {
                info!(status = delivery.status, "Legacy send accepted");
            }
            if settings.verbose || settings.debug {
                log_response(delivery.status, &delivery.headers, &delivery.body);
            }
        }
        Err(sendgrid_api::Error::Provider { status, body }) => {
            if legacy || settings.verbose || settings.debug {
                log_response(*status, &[], body);
            }
        }
        Err(_) => {}
    }
    Ok(result?)
}

fn log_response(status: u16, headers: &[(String, String)], body: &str) {
    info!(status, "Response status");
    for (name, value) in headers {
        info!("{name}: {value}");
    }
    info!(body, "Response body");
}

/// Writes the delivery as a JSON document.
///
/// # Errors
///
/// Returns an I/O error if `out` cannot be written.
pub fn write_json(out: &mut impl Write, delivery: &Delivery) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, delivery)?;
    writeln!(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{AppError, EXIT_FILE, EXIT_PROVIDER, EXIT_VALIDATION};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args() -> Args {
        Args {
            to: vec!["Alice <alice@example.com>".into()],
            subject: "Hello".into(),
            bodies: vec!["<p>Hi there</p>".into()],
            ..Args::default()
        }
    }

    #[test]
    fn test_compose_defaults() {
        let message = compose(&args(), &Settings::default()).unwrap();

        assert_eq!(message.from().email(), "sendgrid-cli@nowitworks.eu");
        assert_eq!(message.to()[0].name(), "Alice");
        assert_eq!(message.html(), Some("<p>Hi there</p>"));
        assert!(message.plain().unwrap().contains("Hi there"));
    }

    #[test]
    fn test_compose_cc_and_attachment() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "attached").unwrap();

        let args = Args {
            cc: vec!["carol@example.com".into()],
            att: vec![file],
            ..args()
        };
        let message = compose(&args, &Settings::default()).unwrap();

        assert_eq!(message.cc()[0].email(), "carol@example.com");
        let attachment = &message.attachments()[0];
        assert_eq!(attachment.filename(), "notes.txt");
        assert_eq!(attachment.content_type().essence(), "text/plain");
        assert_eq!(attachment.decode().unwrap(), b"attached");
    }

    #[test]
    fn test_compose_too_many_arguments() {
        let args = Args {
            bodies: vec!["a".into(), "b".into(), "c".into()],
            ..args()
        };
        let err = compose(&args, &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::TooManyArguments(3)));
    }

    #[test]
    fn test_compose_template_without_body() {
        let args = Args {
            bodies: Vec::new(),
            template_id: Some("tmpl-1".into()),
            sub: vec!["name=John Doe".into(), "price=$42".into()],
            ..args()
        };
        let message = compose(&args, &Settings::default()).unwrap();

        assert_eq!(message.template_id(), Some("tmpl-1"));
        assert_eq!(message.substitutions().len(), 2);
        assert_eq!(message.substitutions()[1].value(), "$42");
    }

    #[test]
    fn test_compose_substitutions_ignored_without_template() {
        let args = Args {
            sub: vec!["not a substitution".into()],
            ..args()
        };
        let message = compose(&args, &Settings::default()).unwrap();
        assert!(message.substitutions().is_empty());
    }

    #[test]
    fn test_compose_invalid_substitution() {
        let args = Args {
            template_id: Some("tmpl-1".into()),
            sub: vec!["novalue".into()],
            ..args()
        };
        let err = AppError::from(compose(&args, &Settings::default()).unwrap_err());
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
    }

    #[test]
    fn test_compose_missing_body_file() {
        let args = Args {
            bodies: Vec::new(),
            html: Some(PathBuf::from("/nonexistent/body.html")),
            ..args()
        };
        let err = AppError::from(compose(&args, &Settings::default()).unwrap_err());
        assert_eq!(err.exit_code(), EXIT_FILE);
    }

    #[test]
    fn test_compose_missing_recipient() {
        let args = Args {
            to: Vec::new(),
            ..args()
        };
        let err = compose(&args, &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::MissingRecipient));
    }

    #[test]
    fn test_credential_precedence() {
        let settings = Settings {
            key: Some("SG.config".into()),
            user: Some("user".into()),
            password: Some("pw".into()),
            ..Settings::default()
        };

        let explicit = Args {
            key: Some("SG.flag".into()),
            ..Args::default()
        };
        assert!(matches!(
            credentials(&explicit, &settings).unwrap(),
            Credentials::ApiKey(key) if key == "SG.flag"
        ));
        assert!(credentials(&Args::default(), &settings).unwrap().is_legacy());

        let key_only = Settings {
            key: Some("SG.config".into()),
            ..Settings::default()
        };
        assert!(matches!(
            credentials(&Args::default(), &key_only).unwrap(),
            Credentials::ApiKey(key) if key == "SG.config"
        ));

        let user_only = Settings {
            user: Some("user".into()),
            ..key_only
        };
        assert!(credentials(&Args::default(), &user_only).is_err());
    }

    #[tokio::test]
    async fn test_run_against_mock_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer SG.flag"))
            .and(body_partial_json(serde_json::json!({
                "subject": "Hello",
                "from": {"email": "sendgrid-cli@nowitworks.eu"}
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let args = Args {
            key: Some("SG.flag".into()),
            ..args()
        };
        let settings = Settings {
            api_url: server.uri(),
            ..Settings::default()
        };

        let delivery = run(&args, &settings).await.unwrap();
        assert_eq!(delivery.status, 202);

        let mut out = Vec::new();
        write_json(&mut out, &delivery).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], 202);
    }

    #[tokio::test]
    async fn test_run_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;

        let args = Args {
            key: Some("SG.flag".into()),
            ..args()
        };
        let settings = Settings {
            api_url: server.uri(),
            ..Settings::default()
        };

        let err = run(&args, &settings).await.unwrap_err();
        assert_eq!(err.exit_code(), EXIT_PROVIDER);
    }

    #[tokio::test]
    async fn test_run_validation_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let args = Args {
            subject: String::new(),
            key: Some("SG.flag".into()),
            ..args()
        };
        let settings = Settings {
            api_url: server.uri(),
            ..Settings::default()
        };

        let err = run(&args, &settings).await.unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
    }
}
