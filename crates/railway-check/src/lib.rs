pub mod app;
pub mod checker;
pub mod config;
pub mod report;
pub mod telemetry;

pub use checker::Checker;
pub use config::{Config, ConfigError, Credentials, OutputFormat, Overrides};
pub use report::{CheckResult, DeploymentCheck, ProjectCheck, Report};
