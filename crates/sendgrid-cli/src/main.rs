//! `sendgrid-cli` - Send email through SendGrid from the command line
//!
//! Supports HTML and plain-text bodies, attachments, templates with
//! substitutions, and both the v3 and the legacy v2 mail-send APIs.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod args;
mod config;
mod error;
mod send;

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::Args;
use config::Settings;

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("warn,sendgrid_cli={level},sendgrid_api={level},sendgrid_message={level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = match Settings::load(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => {
            init_tracing(args.debug);
            error!("{err}");
            return ExitCode::from(&err);
        }
    };
    let settings = loaded.settings.with_args(&args);
    init_tracing(settings.debug);

    if let Some(path) = &loaded.source {
        info!("Using config file: {}", path.display());
    }
    debug!(args = ?args.redacted(), "Command called with flags");

    match send::run(&args, &settings).await {
        Ok(delivery) => {
            if settings.json {
                if let Err(err) = send::write_json(&mut std::io::stdout().lock(), &delivery) {
                    error!("Failed to write JSON output: {err}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(&err)
        }
    }
}
