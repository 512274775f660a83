//! Layered settings: defaults, YAML file, environment.

use crate::args::Args;
use crate::error::{AppError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sender used when neither the command line nor the config names one.
pub const DEFAULT_FROM: &str = "sendgrid-cli@nowitworks.eu";

/// Config file looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".sendgrid-cli.yaml";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SENDGRID_API_KEY";

/// Prefix for all other environment overrides.
pub const ENV_PREFIX: &str = "SENDGRID_CLI_";

/// Settings that can come from the config file or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API key for the v3 API.
    pub key: Option<String>,
    /// Account user for the legacy API.
    pub user: Option<String>,
    /// Account password for the legacy API.
    pub password: Option<String>,
    /// Default sender.
    pub from: String,
    /// Debug output.
    pub debug: bool,
    /// Verbose output.
    pub verbose: bool,
    /// JSON output.
    pub json: bool,
    /// Provider base URL.
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key: None,
            user: None,
            password: None,
            from: DEFAULT_FROM.to_string(),
            debug: false,
            verbose: false,
            json: false,
            api_url: sendgrid_api::SENDGRID_API_URL.to_string(),
        }
    }
}

/// Settings together with the file they were read from.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// Merged settings.
    pub settings: Settings,
    /// Config file that contributed, if any.
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Default config file location, `$HOME/.sendgrid-cli.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Builds the provider chain for an optional config file.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "key".into()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads settings from `explicit` or the default config file.
    ///
    /// A missing default file is skipped. A missing explicit file is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file does not exist or a layer
    /// holds a value of the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Loaded> {
        let source = match explicit {
            Some(path) if !path.is_file() => {
                return Err(AppError::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };

        let settings = Self::figment(source.as_deref())
            .extract()
            .map_err(Box::new)?;
        Ok(Loaded { settings, source })
    }

    /// Applies command-line flags on top of these settings.
    #[must_use]
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(from) = &args.from {
            self.from.clone_from(from);
        }
        if args.user.is_some() {
            self.user.clone_from(&args.user);
        }
        if args.password.is_some() {
            self.password.clone_from(&args.password);
        }
        self.debug |= args.debug;
        self.verbose |= args.verbose;
        self.json |= args.json;
        self
    }
}
