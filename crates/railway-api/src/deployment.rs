use std::time::Duration;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tokio::time::Instant;
use tracing::debug;

use crate::client::{ApiError, error_chain};

/// Outcome of a single GET against a deployment URL.
#[derive(Debug, Clone, PartialEq)]
pub enum DeploymentProbe {
    /// The server answered; any status code counts as accessible.
    Accessible {
        status_code: u16,
        response_time: Duration,
        ok: bool,
    },
    /// The request never produced a response.
    Unreachable { error: String },
}

impl Serialize for DeploymentProbe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Accessible {
                status_code,
                response_time,
                ok,
            } => {
                let mut state = serializer.serialize_struct("DeploymentProbe", 4)?;
                state.serialize_field("accessible", &true)?;
                state.serialize_field("status_code", status_code)?;
                state.serialize_field("response_time_seconds", &response_time.as_secs_f64())?;
                state.serialize_field("ok", ok)?;
                state.end()
            }
            Self::Unreachable { error } => {
                let mut state = serializer.serialize_struct("DeploymentProbe", 2)?;
                state.serialize_field("accessible", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

impl DeploymentProbe {
    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Accessible { .. })
    }
}

/// Whether a status counts as a non-error response (2xx and 3xx).
pub fn status_is_ok(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Plain HTTP prober for user deployments.
///
/// Requests are unauthenticated: platform credentials are never sent to
/// the probed URL.
#[derive(Debug, Clone)]
pub struct DeploymentClient {
    inner: reqwest::Client,
}

impl DeploymentClient {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }

    /// GET `url` once and time how long the response headers took to arrive.
    pub async fn probe(&self, url: &str) -> DeploymentProbe {
        let started = Instant::now();
        match self.inner.get(url).send().await {
            Ok(resp) => {
                let response_time = started.elapsed();
                let status_code = resp.status().as_u16();
                debug!(%url, status_code, ?response_time, "deployment responded");
                DeploymentProbe::Accessible {
                    status_code,
                    response_time,
                    ok: status_is_ok(status_code),
                }
            }
            Err(e) => {
                debug!(%url, error = %e, "deployment probe failed");
                DeploymentProbe::Unreachable {
                    error: error_chain(&e),
                }
            }
        }
    }
}
