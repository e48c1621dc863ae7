pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use colored::Colorize;
use std::str::FromStr;

pub use types::TestResults;

/// Output format for a finished run. Reports go to stdout only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Junit,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "junit" => Ok(ReportFormat::Junit),
            _ => anyhow::bail!("Unknown format: {}", s),
        }
    }
}

/// Render the run in the requested format. Text output carries the totals
/// only; outcome lines are streamed by the console listener while the run
/// is in progress.
pub fn render(results: &TestResults, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_summary(results)),
        ReportFormat::Json => json::generate(results),
        ReportFormat::Junit => junit::generate_junit_xml(results),
    }
}

fn render_summary(results: &TestResults) -> String {
    let summary = &results.summary;
    format!(
        "\n  {} passed, {} failed, {} errors ({} total)\n  Duration: {}ms",
        summary.passed.to_string().green(),
        summary.failed.to_string().red(),
        summary.errors.to_string().yellow(),
        summary.total,
        summary.total_duration_ms
    )
}
