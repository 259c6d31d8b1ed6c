use std::io::Write;

use anyhow::{Context, Result};

use crate::checker::Checker;
use crate::config::{Config, OutputFormat};

/// Exit status for a run that could not start (bad config, client setup).
pub const EXIT_ERROR: u8 = 2;

/// Run the configured checks and write the chosen format to `out`.
///
/// Text mode prints the credential warnings and a blank line ahead of the
/// streamed report; JSON mode folds the warnings into the document.
/// Returns whether the API check passed.
pub async fn run<W: Write>(config: Config, out: &mut W) -> Result<bool> {
    let format = config.format;
    let warnings = config.warnings();
    let deployment_url = config.deployment_url.clone();
    let checker = Checker::new(config).context("failed to build HTTP clients")?;

    match format {
        OutputFormat::Text => {
            for warning in &warnings {
                writeln!(out, "{warning}")?;
            }
            writeln!(out)?;
            let success = checker
                .run_full_check(deployment_url.as_deref(), out)
                .await?;
            Ok(success)
        }
        OutputFormat::Json => {
            let mut report = checker.run(deployment_url.as_deref()).await;
            report.warnings = warnings;
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(report.success())
        }
    }
}

/// `0` when the API check passed, `1` when it failed, [`EXIT_ERROR`] when the
/// run never got that far.
pub fn exit_code(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => EXIT_ERROR,
    }
}
