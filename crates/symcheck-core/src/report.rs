//! Report rendering
//!
//! Renders a batch of per-file outcomes as a human-readable table, CSV
//! rows, or pretty-printed JSON.

use crate::models::AnalysisResult;
use serde::Serialize;

/// Output format for batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Csv,
    Json,
}

/// One audited file: either a result or a per-file error. A failed
/// file never suppresses reporting on the rest of the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileRecord {
    pub fn ok(path: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            path: path.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Render records in the requested format.
pub fn render(records: &[FileRecord], format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Table => Ok(render_table(records)),
        ReportFormat::Csv => Ok(render_csv(records)),
        ReportFormat::Json => render_json(records),
    }
}

/// Human-readable summary table.
pub fn render_table(records: &[FileRecord]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(72);

    out.push_str(&rule);
    out.push('\n');
    out.push_str("CONTRAST AUDIT\n");
    out.push_str(&rule);
    out.push('\n');

    for record in records {
        out.push('\n');
        match (&record.result, &record.error) {
            (Some(result), _) => {
                let verdict = if result.overall_pass { "PASS" } else { "FAIL" };
                out.push_str(&format!("{}  [{}]\n", record.path, verdict));
                out.push_str(&format!(
                    "  {}x{}, {} background px, {} sampled px\n",
                    result.width, result.height, result.background_pixels, result.sample_pixels
                ));
                for outcome in &result.backgrounds {
                    let s = &outcome.stats;
                    if s.count == 0 {
                        out.push_str(&format!(
                            "  vs {:<12} no sampled pixels [FAIL]\n",
                            outcome.label
                        ));
                        continue;
                    }
                    out.push_str(&format!(
                        "  vs {:<12} min {:>5.2}  p-ratio {:>5.2}  median {:>5.2}  below {:>5.1}%  [{}]\n",
                        outcome.label,
                        s.min,
                        s.percentile,
                        s.median,
                        s.percent_below_threshold,
                        if s.pass { "PASS" } else { "FAIL" }
                    ));
                    if let Some(worst) = &s.worst {
                        out.push_str(&format!(
                            "     worst {:.2}:1 at ({}, {}) rgba({}, {}, {}, {})\n",
                            worst.ratio,
                            worst.x,
                            worst.y,
                            worst.rgba[0],
                            worst.rgba[1],
                            worst.rgba[2],
                            worst.rgba[3]
                        ));
                    }
                }
            }
            (None, Some(error)) => {
                out.push_str(&format!("{}  [ERROR]\n", record.path));
                out.push_str(&format!("  {}\n", error));
            }
            (None, None) => {
                out.push_str(&format!("{}  [ERROR]\n  unknown failure\n", record.path));
            }
        }
    }

    let passed = records
        .iter()
        .filter(|r| r.result.as_ref().map(|x| x.overall_pass).unwrap_or(false))
        .count();
    let errored = records.iter().filter(|r| r.error.is_some()).count();

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "  Passed: {}    Failed: {}    Errors: {}\n",
        passed,
        records.len() - passed - errored,
        errored
    ));
    out.push_str(&rule);
    out.push('\n');
    out
}

/// One CSV row per (file, background); files that errored get a single
/// row with an empty background column.
pub fn render_csv(records: &[FileRecord]) -> String {
    let mut out = String::from(
        "file,background,sample_count,min_ratio,percentile_ratio,median_ratio,percent_below,pass,overall_pass,error\n",
    );

    for record in records {
        match (&record.result, &record.error) {
            (Some(result), _) => {
                for outcome in &result.backgrounds {
                    let s = &outcome.stats;
                    out.push_str(&format!(
                        "{},{},{},{:.4},{:.4},{:.4},{:.2},{},{},\n",
                        csv_field(&record.path),
                        csv_field(&outcome.label),
                        s.count,
                        s.min,
                        s.percentile,
                        s.median,
                        s.percent_below_threshold,
                        s.pass,
                        result.overall_pass
                    ));
                }
            }
            (None, error) => {
                out.push_str(&format!(
                    "{},,,,,,,false,false,{}\n",
                    csv_field(&record.path),
                    csv_field(error.as_deref().unwrap_or("unknown failure"))
                ));
            }
        }
    }
    out
}

/// Pretty-printed JSON list of records.
pub fn render_json(records: &[FileRecord]) -> Result<String, String> {
    serde_json::to_string_pretty(records).map_err(|e| format!("Failed to serialize report: {}", e))
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
