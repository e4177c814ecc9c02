//! Plain terminal output.

use std::fmt::Write;

use super::{line_col, FileResult};
use crate::diagnostic::Severity;

/// Format lint results as one line per diagnostic, grouped by file
pub fn format_text(results: &[FileResult<'_>]) -> String {
    let mut output = String::new();
    let (mut errors, mut warnings) = (0, 0);

    for file in results {
        errors += file.result.error_count;
        warnings += file.result.warning_count;
        if file.result.diagnostics.is_empty() {
            continue;
        }
        let _ = writeln!(output, "{}", file.filename);
        for diagnostic in &file.result.diagnostics {
            let (line, column) = line_col(file.source, diagnostic.start);
            let severity = match diagnostic.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            let _ = writeln!(
                output,
                "  {line}:{column}  {severity}  {}  {}",
                diagnostic.message, diagnostic.rule_name
            );
            if let Some(help) = &diagnostic.help {
                let _ = writeln!(output, "    help: {help}");
            }
        }
        output.push('\n');
    }

    output.push_str(&format_summary(errors, warnings, results.len()));
    output
}

/// Format a summary line
pub fn format_summary(error_count: usize, warning_count: usize, file_count: usize) -> String {
    let mut parts = Vec::new();

    if error_count > 0 {
        parts.push(format!(
            "{} error{}",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    if warning_count > 0 {
        parts.push(format!(
            "{} warning{}",
            warning_count,
            if warning_count == 1 { "" } else { "s" }
        ));
    }

    if parts.is_empty() {
        format!("No problems found in {} file(s)", file_count)
    } else {
        format!(
            "{} in {} file{}",
            parts.join(", "),
            file_count,
            if file_count == 1 { "" } else { "s" }
        )
    }
}
