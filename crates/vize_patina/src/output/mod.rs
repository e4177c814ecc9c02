//! Output formatters for lint diagnostics.

mod text;

pub use text::*;

use serde::Serialize;

use crate::diagnostic::Severity;
use crate::rules::scoped_css::ScopedCssLintResult;

/// Output format for lint results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per diagnostic, eslint style
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Lint result of one file, with the source its offsets refer to.
#[derive(Debug, Clone, Copy)]
pub struct FileResult<'r> {
    pub filename: &'r str,
    pub source: &'r str,
    pub result: &'r ScopedCssLintResult,
}

/// Format lint results according to the specified format
pub fn format_results(results: &[FileResult<'_>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_text(results),
        OutputFormat::Json => format_json(results),
    }
}

/// JSON output structure for a single file
#[derive(Debug, Serialize)]
pub struct JsonFileResult {
    pub file: String,
    pub messages: Vec<JsonMessage>,
    #[serde(rename = "errorCount")]
    pub error_count: usize,
    #[serde(rename = "warningCount")]
    pub warning_count: usize,
}

/// JSON output structure for a single message
#[derive(Debug, Serialize)]
pub struct JsonMessage {
    #[serde(rename = "ruleId")]
    pub rule_id: &'static str,
    pub severity: u8,
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
    pub fixable: bool,
}

/// 1-based line and column of a byte offset. Columns count characters.
pub fn line_col(source: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() as u32 + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() as u32 + 1;
    (line, column)
}

fn severity_code(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 2,
        Severity::Warning => 1,
    }
}

/// Format results as JSON
fn format_json(results: &[FileResult<'_>]) -> String {
    let json_results: Vec<JsonFileResult> = results
        .iter()
        .map(|file| JsonFileResult {
            file: file.filename.to_string(),
            messages: file
                .result
                .diagnostics
                .iter()
                .map(|d| {
                    let (line, column) = line_col(file.source, d.start);
                    let (end_line, end_column) = line_col(file.source, d.end);
                    JsonMessage {
                        rule_id: d.rule_name,
                        severity: severity_code(d.severity),
                        message: d.message.to_string(),
                        line,
                        column,
                        end_line,
                        end_column,
                        fixable: d.has_fix(),
                    }
                })
                .collect(),
            error_count: file.result.error_count,
            warning_count: file.result.warning_count,
        })
        .collect();

    serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string())
}
