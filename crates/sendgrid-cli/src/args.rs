//! Command-line arguments.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
Send email through SendGrid, with attachments, templates, and template
parameter substitution.

The content can be given as positional arguments or with --html / --plain:

  sendgrid-cli -k API-KEY -t recipient@domain.net -f sender@foo.bar -s \"The subject\" \"Dear recipient, <br/><p>...\"

HTML content given this way is also converted into a plain-text version.

  sendgrid-cli -k API-KEY -t recipient@domain.net -f sender@foo.bar -s \"The subject\" -b FILENAME.html
  sendgrid-cli -k API-KEY -t recipient@domain.net -f sender@foo.bar -s \"The subject\" -T TEMPLATE-ID -S \"name=John Doe\" -S \"price=$42\"

Instead of -k API-KEY you can use --user/-U with --password/-P.";

/// Placeholder shown for secrets in debug output.
const REDACTED: &str = "<redacted>";

/// Send an email through SendGrid.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "sendgrid-cli", version, about, long_about = LONG_ABOUT)]
#[command(disable_version_flag = true)]
pub struct Args {
    /// HTML content and/or plain-text content (at most two).
    #[arg(value_name = "CONTENT")]
    pub bodies: Vec<String>,

    /// FROM address, "Name <user@domain>" or "user@domain".
    #[arg(short, long)]
    pub from: Option<String>,

    /// TO address (can be repeated).
    #[arg(short, long)]
    pub to: Vec<String>,

    /// CC address (can be repeated).
    #[arg(long)]
    pub cc: Vec<String>,

    /// Email subject.
    #[arg(short, long, default_value = "")]
    pub subject: String,

    /// HTML body file name.
    #[arg(short = 'b', long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Plain-text body file name.
    #[arg(short, long, value_name = "FILE")]
    pub plain: Option<PathBuf>,

    /// Attachment file (can be repeated).
    #[arg(short, long, value_name = "FILE")]
    pub att: Vec<PathBuf>,

    /// SendGrid template ID.
    #[arg(short = 'T', long)]
    pub template_id: Option<String>,

    /// Template parameter substitution, e.g. --sub "name=John Doe" (can be repeated).
    #[arg(short = 'S', long, value_name = "KEY=VALUE")]
    pub sub: Vec<String>,

    /// SendGrid API key (can also be set with SENDGRID_API_KEY).
    #[arg(short, long)]
    pub key: Option<String>,

    /// SendGrid user name (legacy API).
    #[arg(short = 'U', long)]
    pub user: Option<String>,

    /// SendGrid user password (legacy API).
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Show debug output.
    #[arg(short, long)]
    pub debug: bool,

    /// Show more verbose details.
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Print the result as JSON.
    #[arg(short, long)]
    pub json: bool,

    /// Config file (default is $HOME/.sendgrid-cli.yaml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print version.
    #[arg(long, action = ArgAction::Version)]
    #[allow(dead_code)]
    pub version: Option<bool>,
}

impl Args {
    /// Returns a copy with the key and password masked, for logging.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| REDACTED.to_string());
        Self {
            key: mask(&self.key),
            password: mask(&self.password),
            ..self.clone()
        }
    }

    /// Template ID if one was given and is not empty.
    #[must_use]
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sendgrid-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&[
            "-f", "Me <me@example.com>",
            "-t", "a@example.com",
            "-t", "b@example.com",
            "-s", "Subject",
            "-b", "body.html",
            "-p", "body.txt",
            "-a", "one.pdf",
            "-a", "two.png",
            "-T", "tmpl",
            "-S", "name=John",
            "-k", "SG.key",
            "-U", "user",
            "-P", "pw",
            "-d", "-V", "-j",
        ]);

        assert_eq!(args.from.as_deref(), Some("Me <me@example.com>"));
        assert_eq!(args.to, ["a@example.com", "b@example.com"]);
        assert_eq!(args.subject, "Subject");
        assert_eq!(args.html, Some(PathBuf::from("body.html")));
        assert_eq!(args.plain, Some(PathBuf::from("body.txt")));
        assert_eq!(args.att, [PathBuf::from("one.pdf"), PathBuf::from("two.png")]);
        assert_eq!(args.template_id(), Some("tmpl"));
        assert_eq!(args.sub, ["name=John"]);
        assert_eq!(args.key.as_deref(), Some("SG.key"));
        assert_eq!(args.user.as_deref(), Some("user"));
        assert_eq!(args.password.as_deref(), Some("pw"));
        assert!(args.debug && args.verbose && args.json);
    }

    #[test]
    fn test_long_flags_and_positional() {
        let args = parse(&[
            "--to", "a@example.com",
            "--cc", "c@example.com",
            "--subject", "Hi",
            "--template-id", "",
            "--config", "/tmp/cfg.yaml",
            "<p>Hello</p>",
            "Hello",
        ]);

        assert_eq!(args.cc, ["c@example.com"]);
        assert_eq!(args.bodies, ["<p>Hello</p>", "Hello"]);
        assert_eq!(args.template_id(), None);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/cfg.yaml")));
        assert!(args.from.is_none());
    }

    #[test]
    fn test_positional_count_not_limited_by_parser() {
        let args = parse(&["a", "b", "c"]);
        assert_eq!(args.bodies.len(), 3);
    }

    #[test]
    fn test_version_is_long_only() {
        let err = Args::try_parse_from(["sendgrid-cli", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let args = parse(&["-V"]);
        assert!(args.verbose);
        assert!(args.version.is_none());
    }

    #[test]
    fn test_redacted() {
        let args = parse(&["-k", "SG.secret", "-U", "user", "-P", "hunter2"]);
        let redacted = format!("{:?}", args.redacted());
        assert!(!redacted.contains("SG.secret"));
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("user"));
    }
}
