//! Diagnostic types for vize_patina linter.
//!
//! Uses `CompactString` for efficient small string storage.

use serde::Serialize;
use vize_carton::CompactString;
use vize_pochoir::Span;

/// Lint diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A text edit for auto-fixing a diagnostic.
///
/// Represents a single text replacement in the source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// Start byte offset
    pub start: u32,
    /// End byte offset
    pub end: u32,
    /// Replacement text
    pub new_text: String,
}

impl TextEdit {
    /// Create a replacement edit
    #[inline]
    pub fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: text.into(),
        }
    }

    #[inline]
    fn shifted(mut self, offset: u32) -> Self {
        self.start += offset;
        self.end += offset;
        self
    }
}

/// A fix for a diagnostic, containing one or more text edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    /// Description of the fix
    pub message: String,
    /// Text edits to apply
    pub edits: Vec<TextEdit>,
}

impl Fix {
    /// Create a new fix with a single edit
    #[inline]
    pub fn new(message: impl Into<String>, edit: TextEdit) -> Self {
        Self {
            message: message.into(),
            edits: vec![edit],
        }
    }

    /// Apply the fix to a source string
    pub fn apply(&self, source: &str) -> String {
        let mut result = source.to_string();
        // Apply edits in reverse order to preserve offsets
        let mut edits = self.edits.clone();
        edits.sort_by(|a, b| b.start.cmp(&a.start));

        for edit in edits {
            let start = edit.start as usize;
            let end = edit.end as usize;
            if start <= end && end <= result.len() {
                result.replace_range(start..end, &edit.new_text);
            }
        }
        result
    }
}

/// A lint diagnostic.
///
/// Offsets are relative to the style block until the diagnostic is added to a
/// [`ScopedCssLintResult`](crate::ScopedCssLintResult), which moves them to
/// file offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDiagnostic {
    /// Rule that triggered this diagnostic
    pub rule_name: &'static str,
    /// Severity level
    pub severity: Severity,
    /// Primary message (CompactString for efficiency)
    pub message: CompactString,
    /// Start byte offset in source
    pub start: u32,
    /// End byte offset in source
    pub end: u32,
    /// Help message for fixing (optional, CompactString)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<CompactString>,
    /// Auto-fix for this diagnostic (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl LintDiagnostic {
    #[inline]
    pub fn new(
        rule_name: &'static str,
        severity: Severity,
        message: impl Into<CompactString>,
        span: Span,
    ) -> Self {
        Self {
            rule_name,
            severity,
            message: message.into(),
            start: span.start,
            end: span.end,
            help: None,
            fix: None,
        }
    }

    /// Create a new error diagnostic
    #[inline]
    pub fn error(rule_name: &'static str, message: impl Into<CompactString>, span: Span) -> Self {
        Self::new(rule_name, Severity::Error, message, span)
    }

    /// Create a new warning diagnostic
    #[inline]
    pub fn warn(rule_name: &'static str, message: impl Into<CompactString>, span: Span) -> Self {
        Self::new(rule_name, Severity::Warning, message, span)
    }

    /// Add a help message
    #[inline]
    pub fn with_help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add a fix for this diagnostic
    #[inline]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Check if this diagnostic has a fix
    #[inline]
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    pub(crate) fn shifted(mut self, offset: u32) -> Self {
        if offset == 0 {
            return self;
        }
        self.start += offset;
        self.end += offset;
        if let Some(fix) = self.fix.as_mut() {
            fix.edits = std::mem::take(&mut fix.edits)
                .into_iter()
                .map(|edit| edit.shifted(offset))
                .collect();
        }
        self
    }
}
