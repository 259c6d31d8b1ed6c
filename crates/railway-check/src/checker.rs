use std::io::{self, Write};

use chrono::Local;
use railway_api::{ApiError, DeploymentClient, DeploymentProbe, Project, RailwayClient};
use tracing::{info, warn};

use crate::config::Config;
use crate::report::{
    self, API_HEADING, CheckResult, DEPLOYMENT_HEADING, DeploymentCheck, PROJECT_HEADING,
    ProjectCheck, Report,
};

const API_OK_MESSAGE: &str = "Railway API is accessible";

/// Runs the three health checks against one resolved [`Config`].
///
/// Every check issues at most one request and never retries. Failures are
/// returned as values; nothing here panics or bubbles up on a bad response.
#[derive(Debug)]
pub struct Checker {
    config: Config,
    api: RailwayClient,
    deployments: DeploymentClient,
}

impl Checker {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let api = RailwayClient::new(
            config.api_url.as_str(),
            config.credentials.token.as_deref(),
            config.timeout,
        )?;
        let deployments = DeploymentClient::new(config.timeout)?;
        Ok(Self {
            config,
            api,
            deployments,
        })
    }

    /// Query the caller's identity to confirm the API answers and accepts
    /// the token (if any).
    pub async fn check_api_health(&self) -> CheckResult {
        match self.api.viewer().await {
            Ok(_) => {
                info!("railway api reachable");
                CheckResult::passed(API_OK_MESSAGE)
            }
            Err(e) => {
                warn!(error = %e, "railway api check failed");
                CheckResult::failed(e.to_string())
            }
        }
    }

    /// Fetch the configured project. Needs both a token and a project id;
    /// without them no request is made.
    pub async fn get_project_info(&self) -> Result<Option<Project>, ApiError> {
        let creds = &self.config.credentials;
        let (Some(_), Some(project_id)) = (&creds.token, &creds.project_id) else {
            return Err(ApiError::MissingCredentials);
        };
        let project = self.api.project(project_id).await;
        match &project {
            Ok(Some(p)) => info!(%project_id, services = p.service_count(), "project fetched"),
            Ok(None) => warn!(%project_id, "api returned no project"),
            Err(e) => warn!(%project_id, error = %e, "project lookup failed"),
        }
        project
    }

    /// GET the deployment URL once, without platform credentials.
    pub async fn check_deployment_url(&self, url: &str) -> DeploymentProbe {
        let probe = self.deployments.probe(url).await;
        match &probe {
            DeploymentProbe::Accessible {
                status_code, ok, ..
            } => info!(%url, status_code, ok, "deployment probed"),
            DeploymentProbe::Unreachable { error } => warn!(%url, %error, "deployment unreachable"),
        }
        probe
    }

    /// Run every applicable check in order: API, project (only with both
    /// credentials), deployment (only for a non-empty URL).
    pub async fn run(&self, deployment_url: Option<&str>) -> Report {
        let timestamp = Local::now();
        let api = self.check_api_health().await;
        let mut report = Report::new(timestamp, api);

        if self.config.credentials.can_query_project() {
            report.project = Some(ProjectCheck::from(self.get_project_info().await));
        }

        if let Some(url) = deployment_url.filter(|u| !u.is_empty()) {
            let probe = self.check_deployment_url(url).await;
            report.deployment = Some(DeploymentCheck {
                url: url.to_string(),
                probe,
            });
        }

        report
    }

    /// Run all checks, writing the text report to `out` as it goes, and
    /// return whether the API check passed.
    ///
    /// Each section heading is flushed before its request is sent, so a slow
    /// endpoint shows up under the heading that is waiting on it.
    pub async fn run_full_check<W: Write>(
        &self,
        deployment_url: Option<&str>,
        out: &mut W,
    ) -> io::Result<bool> {
        report::write_banner(out, &Local::now())?;

        heading(out, API_HEADING)?;
        let api = self.check_api_health().await;
        report::write_api(out, &api)?;

        if self.config.credentials.can_query_project() {
            heading(out, PROJECT_HEADING)?;
            let project = ProjectCheck::from(self.get_project_info().await);
            report::write_project(out, &project)?;
        }

        if let Some(url) = deployment_url.filter(|u| !u.is_empty()) {
            heading(out, DEPLOYMENT_HEADING)?;
            let deployment = DeploymentCheck {
                url: url.to_string(),
                probe: self.check_deployment_url(url).await,
            };
            report::write_deployment(out, &deployment)?;
        }

        report::write_rule(out)?;
        out.flush()?;
        Ok(api.success)
    }
}

fn heading<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")?;
    out.flush()
}
