//! Top-level error type and exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

/// Result type alias for the command.
pub type Result<T> = std::result::Result<T, AppError>;

/// Exit code for configuration errors.
pub const EXIT_CONFIG: u8 = 1;
/// Exit code for invalid input.
pub const EXIT_VALIDATION: u8 = 2;
/// Exit code for unreadable files.
pub const EXIT_FILE: u8 = 3;
/// Exit code for transport failures.
pub const EXIT_TRANSPORT: u8 = 4;
/// Exit code for a non-2xx provider answer.
pub const EXIT_PROVIDER: u8 = 5;

/// Everything that can stop a send.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The config file named with `--config` does not exist.
    #[error("Config file not found: {0:?}")]
    ConfigNotFound(PathBuf),

    /// A configuration layer could not be read or has bad values.
    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Message composition failed.
    #[error(transparent)]
    Message(#[from] sendgrid_message::Error),

    /// Credential resolution or delivery failed.
    #[error(transparent)]
    Api(#[from] sendgrid_api::Error),
}

impl AppError {
    /// Maps the error kind to the process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigNotFound(_) | Self::Config(_) => EXIT_CONFIG,
            Self::Message(err) | Self::Api(sendgrid_api::Error::Message(err)) => {
                message_exit_code(err)
            }
            Self::Api(err) if err.is_validation() => EXIT_VALIDATION,
            Self::Api(sendgrid_api::Error::Transport(_)) => EXIT_TRANSPORT,
            Self::Api(sendgrid_api::Error::Provider { .. }) => EXIT_PROVIDER,
            Self::Api(_) => EXIT_CONFIG,
        }
    }
}

const fn message_exit_code(err: &sendgrid_message::Error) -> u8 {
    if err.is_validation() {
        EXIT_VALIDATION
    } else if matches!(err, sendgrid_message::Error::FileRead { .. }) {
        EXIT_FILE
    } else {
        EXIT_CONFIG
    }
}

impl From<&AppError> for ExitCode {
    fn from(err: &AppError) -> Self {
        Self::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_validation_exit_codes() {
        let errors: Vec<AppError> = vec![
            sendgrid_message::Error::InvalidAddress(String::new()).into(),
            sendgrid_message::Error::MissingBody.into(),
            sendgrid_message::Error::TooManyArguments(3).into(),
            sendgrid_message::Error::MissingSubject.into(),
            sendgrid_message::Error::MissingRecipient.into(),
            sendgrid_message::Error::InvalidSubstitution("x".into()).into(),
            sendgrid_api::Error::MissingCredentials.into(),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), EXIT_VALIDATION, "{err}");
        }
    }

    #[test]
    fn test_file_read_exit_code() {
        let err: AppError = sendgrid_message::Error::file_read(
            "missing.html",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        )
        .into();
        assert_eq!(err.exit_code(), EXIT_FILE);
    }

    #[test]
    fn test_delivery_exit_codes() {
        let provider: AppError = sendgrid_api::Error::provider(400, "bad request").into();
        assert_eq!(provider.exit_code(), EXIT_PROVIDER);

        let config = AppError::ConfigNotFound(PathBuf::from("x.yaml"));
        assert_eq!(config.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_wrapped_message_error() {
        let err: AppError =
            sendgrid_api::Error::from(sendgrid_message::Error::MissingSubject).into();
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
    }
}
