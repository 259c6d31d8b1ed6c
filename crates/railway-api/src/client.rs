use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::graphql::{GraphQlErrors, GraphQlRequest, GraphQlResponse};

/// Public GraphQL endpoint of the Railway backboard API.
pub const DEFAULT_ENDPOINT: &str = "https://backboard.railway.app/graphql";

/// Per-request timeout applied when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API token and project ID required")]
    MissingCredentials,
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
    #[error("API Error: {0}")]
    GraphQl(GraphQlErrors),
    #[error("API Error: null")]
    NullErrors,
    #[error("Connection error: {}", error_chain(.0))]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("API token contains invalid characters (non-visible ASCII)")]
    InvalidToken,
}

/// Render an error together with every `source()` below it, separated by `: `.
///
/// `reqwest` keeps the useful part of a failure (refused connection, DNS
/// miss, timeout) in the source chain rather than in its own message.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}

/// Async client for the Railway GraphQL API.
///
/// Every request is a `POST` of `{query, variables}` to a single endpoint.
/// When a token is configured it is sent as `Authorization: Bearer <token>`
/// on every request; without one, requests go out unauthenticated.
#[derive(Clone)]
pub struct RailwayClient {
    inner: reqwest::Client,
    endpoint: Url,
    authenticated: bool,
}

impl RailwayClient {
    /// Create a client for `endpoint` with an optional bearer token.
    pub fn new(endpoint: &str, token: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let endpoint = Url::parse(endpoint)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner,
            endpoint,
            authenticated: token.is_some(),
        })
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// POST a GraphQL document and return its `data` member.
    ///
    /// `Ok(None)` means the server answered 200 without errors but with a
    /// missing or null `data`.
    pub async fn query<T, V>(&self, query: &str, variables: Option<&V>) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        let body = GraphQlRequest { query, variables };
        debug!(endpoint = %self.endpoint, authenticated = self.authenticated, "sending graphql request");
        let resp = self
            .inner
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Option<T>, ApiError> {
        let status = resp.status();
        debug!(status = status.as_u16(), "graphql response received");
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let parsed: GraphQlResponse<T> = serde_json::from_slice(&bytes)?;
        match parsed.errors {
            Some(Some(errors)) => return Err(ApiError::GraphQl(GraphQlErrors(errors))),
            Some(None) => return Err(ApiError::NullErrors),
            None => {}
        }
        Ok(parsed.data)
    }
}

impl std::fmt::Debug for RailwayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RailwayClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.authenticated)
            .finish()
    }
}
