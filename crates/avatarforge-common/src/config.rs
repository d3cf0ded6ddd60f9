//! Pipeline configuration
//!
//! Built once at startup and shared by `Arc` into every client.

use std::env;
use std::fmt;
use url::Url;

const DEFAULT_AVATAR_NAME: &str = "avatar";

/// Endpoints and credentials for the avatar services.
#[derive(Clone)]
pub struct AvatarConfig {
    /// Generation endpoint (POST `{ name, img, body_id }`)
    pub generation_url: String,

    /// Body catalog endpoint (GET)
    pub catalog_url: String,

    /// Face validation endpoint (POST `{ img }`)
    pub validation_url: String,

    /// Bearer token sent with every request
    pub api_token: String,

    /// Name submitted with each generation request
    pub avatar_name: String,
}

impl AvatarConfig {
    pub fn new(
        generation_url: impl Into<String>,
        catalog_url: impl Into<String>,
        validation_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            generation_url: generation_url.into(),
            catalog_url: catalog_url.into(),
            validation_url: validation_url.into(),
            api_token: api_token.into(),
            avatar_name: DEFAULT_AVATAR_NAME.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |var: &'static str| -> Result<String, ConfigError> {
            let value = lookup(var).ok_or(ConfigError::Missing(var))?;
            if is_http_url(&value) {
                Ok(value)
            } else {
                Err(ConfigError::InvalidUrl { var, value })
            }
        };

        Ok(Self {
            generation_url: url("AVATAR_GENERATION_URL")?,
            catalog_url: url("AVATAR_CATALOG_URL")?,
            validation_url: url("AVATAR_VALIDATION_URL")?,
            api_token: lookup("AVATAR_API_TOKEN").ok_or(ConfigError::Missing("AVATAR_API_TOKEN"))?,
            avatar_name: lookup("AVATAR_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR_NAME.into()),
        })
    }

    /// Set the name submitted with generation requests
    pub fn with_avatar_name(mut self, name: impl Into<String>) -> Self {
        self.avatar_name = name.into();
        self
    }

    /// Set the bearer token
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    /// `Authorization` header value
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.api_token)
    }
}

/// Absolute `http`/`https` URL with a host
fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

impl fmt::Debug for AvatarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarConfig")
            .field("generation_url", &self.generation_url)
            .field("catalog_url", &self.catalog_url)
            .field("validation_url", &self.validation_url)
            .field("api_token", &"<redacted>")
            .field("avatar_name", &self.avatar_name)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}
