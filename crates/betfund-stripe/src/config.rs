//! Stripe configuration.

use serde::Deserialize;
use std::path::Path;

use crate::client::StripeClient;

/// Paths searched for a Stripe secrets file, in order.
pub const SECRET_PATHS: [&str; 3] = [
    ".secrets/stripe.json",
    "betfund/.secrets/stripe.json",
    "../.secrets/stripe.json",
];

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key in the secrets file or the environment.
    #[error("STRIPE_API_KEY is not set")]
    MissingApiKey,

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Stripe configuration loaded from a secrets file or environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeConfig {
    /// Stripe secret API key.
    pub api_key: String,

    /// API base URL (default: `<https://api.stripe.com/v1>`).
    pub api_base: String,

    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
    #[serde(default)]
    api_base: Option<String>,
}

impl StripeConfig {
    /// Configuration with the given key and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: StripeClient::BASE_URL.into(),
            timeout_seconds: StripeClient::DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Load configuration, trying the secrets file first and then the
    /// `STRIPE_API_KEY`, `STRIPE_API_BASE` and `STRIPE_TIMEOUT_SECONDS`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is available or a variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&SECRET_PATHS, |name| std::env::var(name).ok())
    }

    /// Load configuration from explicit secrets paths and a variable lookup.
    ///
    /// Values from the first readable secrets file win over the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is available or a variable is malformed.
    pub fn load<P, F>(secret_paths: &[P], var: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let secrets = secret_paths.iter().find_map(|path| {
            let path = path.as_ref();
            match load_secrets_file::<StripeSecrets>(path) {
                Ok(secrets) => {
                    tracing::info!(path = %path.display(), "Loaded Stripe secrets from file");
                    Some(secrets)
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Ignoring unreadable Stripe secrets file");
                    None
                }
            }
        });

        let (file_key, file_base) = match secrets {
            Some(secrets) => (Some(secrets.api_key), secrets.api_base),
            None => (None, None),
        };

        let api_key = file_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                tracing::debug!("No Stripe API key in secrets file, using environment variables");
                var("STRIPE_API_KEY")
            })
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_base = file_base
            .or_else(|| var("STRIPE_API_BASE"))
            .unwrap_or_else(|| StripeClient::BASE_URL.into());

        let timeout_seconds = match var("STRIPE_TIMEOUT_SECONDS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "STRIPE_TIMEOUT_SECONDS",
                value,
            })?,
            None => StripeClient::DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            api_key,
            api_base,
            timeout_seconds,
        })
    }
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
