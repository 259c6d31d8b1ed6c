use std::io::{self, Write};

use chrono::{DateTime, Local};
use railway_api::{ApiError, DeploymentProbe, Project};
use serde::{Serialize, Serializer};

const RULE_WIDTH: usize = 60;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of the API connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub success: bool,
    pub message: String,
}

impl CheckResult {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of the project lookup.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectCheck {
    Found {
        project: Project,
    },
    /// The API answered cleanly but returned no project.
    NotReturned,
    Failed {
        #[serde(serialize_with = "display")]
        error: ApiError,
    },
}

impl From<Result<Option<Project>, ApiError>> for ProjectCheck {
    fn from(result: Result<Option<Project>, ApiError>) -> Self {
        match result {
            Ok(Some(project)) => Self::Found { project },
            Ok(None) => Self::NotReturned,
            Err(error) => Self::Failed { error },
        }
    }
}

/// Outcome of the deployment probe, with the URL that was probed.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentCheck {
    pub url: String,
    #[serde(flatten)]
    pub probe: DeploymentProbe,
}

/// Everything one run produced, ready to be rendered as text or JSON.
#[derive(Debug, Serialize)]
pub struct Report {
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    api: CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentCheck>,
    success: bool,
}

fn display<T: std::fmt::Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

impl Report {
    pub fn new(timestamp: DateTime<Local>, api: CheckResult) -> Self {
        let success = api.success;
        Self {
            timestamp,
            warnings: Vec::new(),
            api,
            project: None,
            deployment: None,
            success,
        }
    }

    pub fn api(&self) -> &CheckResult {
        &self.api
    }

    /// The run succeeded iff the API check did; the other sections are
    /// informational.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Write the human-readable report. Warnings are not part of it.
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_banner(out, &self.timestamp)?;
        writeln!(out, "{API_HEADING}")?;
        write_api(out, &self.api)?;
        if let Some(project) = &self.project {
            writeln!(out, "{PROJECT_HEADING}")?;
            write_project(out, project)?;
        }
        if let Some(deployment) = &self.deployment {
            writeln!(out, "{DEPLOYMENT_HEADING}")?;
            write_deployment(out, deployment)?;
        }
        write_rule(out)
    }

    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        let _ = self.render_text(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

// --- Text sections ---
//
// Each heading is written on its own so a caller can print it before the
// request behind it starts.

pub const API_HEADING: &str = "1. Checking Railway API connectivity...";
pub const PROJECT_HEADING: &str = "2. Checking project information...";
pub const DEPLOYMENT_HEADING: &str = "3. Checking deployment URL...";

pub fn write_rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Title block and timestamp, followed by a blank line.
pub fn write_banner<W: Write>(out: &mut W, timestamp: &DateTime<Local>) -> io::Result<()> {
    write_rule(out)?;
    writeln!(out, "Railway Instance Health Check")?;
    write_rule(out)?;
    writeln!(out, "Timestamp: {}", timestamp.format(TIMESTAMP_FORMAT))?;
    writeln!(out)
}

pub fn write_api<W: Write>(out: &mut W, api: &CheckResult) -> io::Result<()> {
    writeln!(out, "   {}", api.message)?;
    writeln!(out)
}

pub fn write_project<W: Write>(out: &mut W, check: &ProjectCheck) -> io::Result<()> {
    match check {
        ProjectCheck::Found { project } => {
            writeln!(out, "   Project: {}", project.name.as_deref().unwrap_or("N/A"))?;
            writeln!(out, "   ID: {}", project.id.as_deref().unwrap_or("N/A"))?;
            writeln!(out, "   Services: {}", project.service_count())?;
            for service in project.services() {
                writeln!(out, "     - {}", service.name.as_deref().unwrap_or("Unknown"))?;
            }
        }
        ProjectCheck::NotReturned => writeln!(out, "   No project data returned")?,
        ProjectCheck::Failed { error } => writeln!(out, "   {error}")?,
    }
    writeln!(out)
}

pub fn write_deployment<W: Write>(out: &mut W, check: &DeploymentCheck) -> io::Result<()> {
    match &check.probe {
        DeploymentProbe::Accessible {
            status_code,
            response_time,
            ok,
        } => {
            writeln!(out, "   URL: {}", check.url)?;
            writeln!(out, "   Status: {status_code}")?;
            writeln!(out, "   Response Time: {:.2}s", response_time.as_secs_f64())?;
            writeln!(out, "   OK: {}", if *ok { "True" } else { "False" })?;
        }
        DeploymentProbe::Unreachable { error } => writeln!(out, "   Failed: {error}")?,
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 15)
            .single()
            .unwrap()
    }

    fn project(names: &[Option<&str>]) -> Project {
        let edges: Vec<_> = names
            .iter()
            .map(|n| serde_json::json!({"node": {"name": n}}))
            .collect();
        serde_json::from_value(serde_json::json!({
            "id": "proj-1",
            "name": "storefront",
            "services": {"edges": edges}
        }))
        .unwrap()
    }

    #[test]
    fn api_only_layout() {
        let report = Report::new(fixed_time(), CheckResult::passed("Railway API is accessible"));
        let expected = "\
============================================================
Railway Instance Health Check
============================================================
Timestamp: 2024-05-01 09:30:15

1. Checking Railway API connectivity...
   Railway API is accessible

============================================================
";
        assert_eq!(report.to_text(), expected);
    }

    #[test]
    fn full_layout() {
        let mut report = Report::new(fixed_time(), CheckResult::failed("HTTP 401"));
        report.project = Some(ProjectCheck::Found {
            project: project(&[Some("api"), None]),
        });
        report.deployment = Some(DeploymentCheck {
            url: "https://shop.example.com".into(),
            probe: DeploymentProbe::Accessible {
                status_code: 200,
                response_time: Duration::from_millis(1234),
                ok: true,
            },
        });
        let expected = "\
============================================================
Railway Instance Health Check
============================================================
Timestamp: 2024-05-01 09:30:15

1. Checking Railway API connectivity...
   HTTP 401

2. Checking project information...
   Project: storefront
   ID: proj-1
   Services: 2
     - api
     - Unknown

3. Checking deployment URL...
   URL: https://shop.example.com
   Status: 200
   Response Time: 1.23s
   OK: True

============================================================
";
        assert_eq!(report.to_text(), expected);
    }

    #[test]
    fn ok_flag_renders_capitalized() {
        let mut report = Report::new(fixed_time(), CheckResult::passed("ok"));
        report.deployment = Some(DeploymentCheck {
            url: "https://shop.example.com/missing".into(),
            probe: DeploymentProbe::Accessible {
                status_code: 404,
                response_time: Duration::from_millis(5),
                ok: false,
            },
        });
        let text = report.to_text();
        assert!(text.contains("   Status: 404\n"), "{text}");
        assert!(text.contains("   Response Time: 0.01s\n"), "{text}");
        assert!(text.contains("   OK: False\n"), "{text}");
    }

    #[test]
    fn success_follows_api_result() {
        let report = Report::new(fixed_time(), CheckResult::failed("HTTP 500"));
        assert!(!report.success());
        assert_eq!(report.success(), report.api().success);

        let report = Report::new(fixed_time(), CheckResult::passed("Railway API is accessible"));
        assert!(report.success());
        assert_eq!(serde_json::to_value(&report).unwrap()["success"], true);
    }

    #[test]
    fn failure_lines() {
        let mut report = Report::new(fixed_time(), CheckResult::passed("Railway API is accessible"));
        report.project = Some(ProjectCheck::Failed {
            error: ApiError::MissingCredentials,
        });
        report.deployment = Some(DeploymentCheck {
            url: "http://down.example.com".into(),
            probe: DeploymentProbe::Unreachable {
                error: "operation timed out".into(),
            },
        });
        let text = report.to_text();
        assert!(text.contains("\n   API token and project ID required\n"), "{text}");
        assert!(text.contains("\n   Failed: operation timed out\n"), "{text}");
        assert!(!text.contains("URL: http://down.example.com"));
    }

    #[test]
    fn missing_project_fields_use_placeholders() {
        let mut report = Report::new(fixed_time(), CheckResult::passed("ok"));
        report.project = Some(ProjectCheck::Found {
            project: serde_json::from_value(serde_json::json!({})).unwrap(),
        });
        let text = report.to_text();
        assert!(text.contains("   Project: N/A\n   ID: N/A\n   Services: 0\n"), "{text}");
    }

    #[test]
    fn null_project_has_its_own_line() {
        let mut report = Report::new(fixed_time(), CheckResult::passed("ok"));
        let result: Result<Option<Project>, ApiError> = Ok(None);
        report.project = Some(ProjectCheck::from(result));
        assert!(report.to_text().contains("   No project data returned\n"));
    }

    #[test]
    fn json_shape() {
        let mut report = Report::new(fixed_time(), CheckResult::failed("HTTP 500"));
        report.warnings.push("Warning: RAILWAY_TOKEN not set. API checks will be limited.".into());
        let result: Result<Option<Project>, ApiError> = Err(ApiError::Status {
            status: 500,
            body: String::new(),
        });
        report.project = Some(ProjectCheck::from(result));
        report.deployment = Some(DeploymentCheck {
            url: "https://shop.example.com".into(),
            probe: DeploymentProbe::Accessible {
                status_code: 404,
                response_time: Duration::from_millis(500),
                ok: false,
            },
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["api"]["message"], "HTTP 500");
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(json["project"]["status"], "failed");
        assert_eq!(json["project"]["error"], "HTTP 500");
        assert_eq!(json["deployment"]["url"], "https://shop.example.com");
        assert_eq!(json["deployment"]["accessible"], true);
        assert_eq!(json["deployment"]["status_code"], 404);
        assert_eq!(json["deployment"]["response_time_seconds"], 0.5);
        assert_eq!(json["deployment"]["ok"], false);
    }

    #[test]
    fn json_omits_sections_that_did_not_run() {
        let report = Report::new(fixed_time(), CheckResult::passed("Railway API is accessible"));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("project").is_none());
        assert!(json.get("deployment").is_none());
        assert!(json.get("warnings").is_none());
        assert_eq!(json["success"], true);
    }
}
