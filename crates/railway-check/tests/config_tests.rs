//! Environment-variable resolution against the real process environment.

use std::time::Duration;

use railway_check::{Config, ConfigError, Overrides};

const ALL_VARS: [&str; 5] = [
    "RAILWAY_TOKEN",
    "RAILWAY_PROJECT_ID",
    "RAILWAY_SERVICE_ID",
    "RAILWAY_DEPLOYMENT_URL",
    "RAILWAY_API_URL",
];

fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
    ALL_VARS.iter().map(|k| (*k, None)).collect()
}

#[test]
fn from_env_reads_every_variable() {
    temp_env::with_vars(
        [
            ("RAILWAY_TOKEN", Some("env-token")),
            ("RAILWAY_PROJECT_ID", Some("proj-9")),
            ("RAILWAY_SERVICE_ID", Some("svc-3")),
            ("RAILWAY_DEPLOYMENT_URL", Some("https://app.example.com")),
            ("RAILWAY_API_URL", Some("http://localhost:4000/graphql")),
        ],
        || {
            let config = Config::from_env(Overrides::default()).unwrap();
            assert_eq!(config.credentials.token.as_deref(), Some("env-token"));
            assert_eq!(config.credentials.project_id.as_deref(), Some("proj-9"));
            assert_eq!(config.credentials.service_id.as_deref(), Some("svc-3"));
            assert_eq!(
                config.deployment_url.as_deref(),
                Some("https://app.example.com")
            );
            assert_eq!(config.api_url.as_str(), "http://localhost:4000/graphql");
            assert!(config.warnings().is_empty());
        },
    );
}

#[test]
fn from_env_with_nothing_set_warns_twice() {
    temp_env::with_vars(unset_all(), || {
        let config = Config::from_env(Overrides::default()).unwrap();
        assert!(config.credentials.token.is_none());
        assert!(config.credentials.project_id.is_none());
        assert!(config.deployment_url.is_none());
        assert_eq!(config.api_url.as_str(), "https://backboard.railway.app/graphql");

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("RAILWAY_TOKEN"));
        assert!(warnings[1].contains("RAILWAY_PROJECT_ID"));
    });
}

#[test]
fn cli_overrides_beat_environment() {
    temp_env::with_vars(
        [
            ("RAILWAY_TOKEN", Some("env-token")),
            ("RAILWAY_DEPLOYMENT_URL", Some("https://env.example.com")),
        ],
        || {
            let overrides = Overrides {
                token: Some("cli-token".into()),
                deployment_url: Some("https://cli.example.com".into()),
                timeout: Some(Duration::from_secs(3)),
                ..Default::default()
            };
            let config = Config::from_env(overrides).unwrap();
            assert_eq!(config.credentials.token.as_deref(), Some("cli-token"));
            assert_eq!(
                config.deployment_url.as_deref(),
                Some("https://cli.example.com")
            );
            assert_eq!(config.timeout, Duration::from_secs(3));
        },
    );
}

#[test]
fn bad_api_url_in_environment_is_an_error() {
    temp_env::with_var("RAILWAY_API_URL", Some("::not-a-url::"), || {
        let err = Config::from_env(Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }), "got: {err}");
        assert!(err.to_string().contains("::not-a-url::"));
    });
}
