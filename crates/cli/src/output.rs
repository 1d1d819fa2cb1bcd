use crate::error::CliError;
use engine_config::report::summary::SyncSummary;

fn generate_report_json(summaries: &[SyncSummary]) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(summaries)?)
}

pub async fn write_report(summaries: &[SyncSummary], path: &str) -> Result<(), CliError> {
    let report_json = generate_report_json(summaries)?;
    tokio::fs::write(path, report_json).await?;
    Ok(())
}

pub fn print_report(summaries: &[SyncSummary]) -> Result<(), CliError> {
    let report_json = generate_report_json(summaries)?;
    println!("{report_json}");
    Ok(())
}

/// Writes to `output` when given, prints when `print` is set, else nothing.
pub async fn emit(
    summaries: &[SyncSummary],
    output: Option<&str>,
    print: bool,
) -> Result<(), CliError> {
    match output {
        Some(path) => write_report(summaries, path).await,
        None if print => print_report(summaries),
        None => Ok(()),
    }
}
