use std::time::Duration;

use railway_api::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use serde::Serialize;
use tracing::debug;
use url::Url;

pub const TOKEN_VAR: &str = "RAILWAY_TOKEN";
pub const PROJECT_ID_VAR: &str = "RAILWAY_PROJECT_ID";
pub const SERVICE_ID_VAR: &str = "RAILWAY_SERVICE_ID";
pub const DEPLOYMENT_URL_VAR: &str = "RAILWAY_DEPLOYMENT_URL";
pub const API_URL_VAR: &str = "RAILWAY_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL {value:?}: {source}")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Platform credentials. Empty values are treated as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub project_id: Option<String>,
    /// Carried for completeness; no check reads it yet.
    pub service_id: Option<String>,
}

impl Credentials {
    /// Both a token and a project id are present.
    pub fn can_query_project(&self) -> bool {
        self.token.is_some() && self.project_id.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .field("service_id", &self.service_id)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Values given explicitly on the command line. Anything left `None` falls
/// back to the environment, then to built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub project_id: Option<String>,
    pub service_id: Option<String>,
    pub api_url: Option<String>,
    pub deployment_url: Option<String>,
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

/// Fully resolved run configuration. Built once at startup and handed to
/// the checker by value.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub api_url: Url,
    pub timeout: Duration,
    pub deployment_url: Option<String>,
    pub format: OutputFormat,
}

impl Config {
    /// Resolve against the process environment.
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for environment variables.
    pub fn resolve<F>(overrides: Overrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<String>, var: &str| {
            non_empty(explicit).or_else(|| non_empty(lookup(var)))
        };

        let credentials = Credentials {
            token: pick(overrides.token, TOKEN_VAR),
            project_id: pick(overrides.project_id, PROJECT_ID_VAR),
            service_id: pick(overrides.service_id, SERVICE_ID_VAR),
        };

        let raw_api_url =
            pick(overrides.api_url, API_URL_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_url = Url::parse(&raw_api_url).map_err(|source| ConfigError::InvalidApiUrl {
            value: raw_api_url.clone(),
            source,
        })?;

        let timeout = overrides.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let config = Self {
            credentials,
            api_url,
            timeout,
            deployment_url: pick(overrides.deployment_url, DEPLOYMENT_URL_VAR),
            format: overrides.format,
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Startup warnings for missing credentials, in display order.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.credentials.token.is_none() {
            warnings.push(format!(
                "Warning: {TOKEN_VAR} not set. API checks will be limited."
            ));
        }
        if self.credentials.project_id.is_none() {
            warnings.push(format!(
                "Warning: {PROJECT_ID_VAR} not set. Project info unavailable."
            ));
        }
        warnings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
