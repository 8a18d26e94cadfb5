//! Parsers for command-line option values.

use symcheck_core::models::{BackgroundSpec, SampleMode};
use symcheck_core::parse_color;
use symcheck_core::report::ReportFormat;

/// Parse a semicolon-separated list of background colors.
///
/// The list separator is ';' because individual colors may contain
/// commas (`rgb(1,2,3)`, bare `r,g,b`).
pub fn parse_backgrounds(spec: &str) -> Result<Vec<BackgroundSpec>, String> {
    let backgrounds: Vec<BackgroundSpec> = spec
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_color)
        .collect::<Result<_, _>>()?;

    if backgrounds.is_empty() {
        return Err(format!("No background colors in: {}", spec));
    }
    Ok(backgrounds)
}

/// Parse a sample mode name: "band", "all", or "stroke".
pub fn parse_sample_mode(mode: &str) -> Result<SampleMode, String> {
    match mode.trim().to_lowercase().as_str() {
        "band" => Ok(SampleMode::Band),
        "all" => Ok(SampleMode::All),
        "stroke" => Ok(SampleMode::Stroke),
        other => Err(format!(
            "Unknown sample mode: {} (expected band, all, or stroke)",
            other
        )),
    }
}

/// Resolve an on/off flag pair against a defaults-file value. Either
/// explicit flag wins over the file; with neither given, the file (or
/// built-in) default stands.
pub fn resolve_flag_override(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

/// Parse a report format name: "table", "csv", or "json".
pub fn parse_report_format(format: &str) -> Result<ReportFormat, String> {
    match format.trim().to_lowercase().as_str() {
        "table" => Ok(ReportFormat::Table),
        "csv" => Ok(ReportFormat::Csv),
        "json" => Ok(ReportFormat::Json),
        other => Err(format!(
            "Unknown report format: {} (expected table, csv, or json)",
            other
        )),
    }
}
