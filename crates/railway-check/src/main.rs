use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use railway_check::{Config, OutputFormat, Overrides, app, telemetry};

#[derive(Parser)]
#[command(
    name = "railway-check",
    version,
    about = "Railway instance health check: API connectivity, project info, deployment URL"
)]
struct Cli {
    /// Deployment URL to probe [env: RAILWAY_DEPLOYMENT_URL]
    deployment_url: Option<String>,

    /// Railway API token [env: RAILWAY_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Project to look up [env: RAILWAY_PROJECT_ID]
    #[arg(long)]
    project_id: Option<String>,

    /// Service identifier [env: RAILWAY_SERVICE_ID]
    #[arg(long)]
    service_id: Option<String>,

    /// GraphQL endpoint [env: RAILWAY_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Self {
            token: cli.token,
            project_id: cli.project_id,
            service_id: cli.service_id,
            api_url: cli.api_url,
            deployment_url: cli.deployment_url,
            timeout: cli.timeout.map(Duration::from_secs),
            format: cli.format,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();

    let outcome = match Config::from_env(Cli::parse().into()) {
        Ok(config) => app::run(config, &mut std::io::stdout().lock()).await,
        Err(e) => Err(anyhow::Error::new(e).context("invalid configuration")),
    };
    if let Err(e) = &outcome {
        eprintln!("Error: {e:#}");
    }
    ExitCode::from(app::exit_code(&outcome))
}
