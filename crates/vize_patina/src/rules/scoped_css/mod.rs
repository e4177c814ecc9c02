//! Scoped style rules for Vue.js SFC `<style scoped>` blocks.
//!
//! These rules match the selectors of a style block against the component's
//! template with `vize_pochoir`, in the spirit of
//! `eslint-plugin-vue-scoped-css`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vize_patina::ScopedCssLinter;
//! use vize_pochoir::AnalysisContext;
//!
//! let ctx = AnalysisContext::new(&stylesheet, &template, &state, &options);
//! let result = ScopedCssLinter::with_all_rules().lint(&ctx);
//! ```

mod no_deprecated_deep_combinator;
mod no_deprecated_v_enter_v_leave_class;
mod no_parsing_error;
mod no_unused_keyframes;
mod no_unused_selector;
mod require_selector_used_inside;

use serde::Serialize;
use vize_pochoir::selector::{Selector, SelectorNode};
use vize_pochoir::{AnalysisContext, StyleNode, StyleSheet};

use crate::diagnostic::{LintDiagnostic, Severity};

pub use no_deprecated_deep_combinator::NoDeprecatedDeepCombinator;
pub use no_deprecated_v_enter_v_leave_class::NoDeprecatedVEnterVLeaveClass;
pub use no_parsing_error::NoParsingError;
pub use no_unused_keyframes::NoUnusedKeyframes;
pub use no_unused_selector::NoUnusedSelector;
pub use require_selector_used_inside::RequireSelectorUsedInside;

/// Metadata for a scoped style rule
pub struct ScopedCssRuleMeta {
    /// Rule name (e.g., "scoped-css/no-unused-selector")
    pub name: &'static str,
    /// Rule description
    pub description: &'static str,
    /// Default severity
    pub default_severity: Severity,
}

/// Result of linting a style block
#[derive(Debug, Default, Serialize)]
pub struct ScopedCssLintResult {
    pub diagnostics: Vec<LintDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
    /// Position of the style block in the file.
    #[serde(skip)]
    offset: u32,
}

impl ScopedCssLintResult {
    /// Result for a style block starting at `offset` in its file.
    pub fn with_offset(offset: u32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Record a diagnostic given in style block offsets.
    pub fn add_diagnostic(&mut self, diagnostic: LintDiagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic.shifted(self.offset));
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Diagnostics of one rule.
    pub fn by_rule<'r>(&'r self, rule_name: &'r str) -> impl Iterator<Item = &'r LintDiagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.rule_name == rule_name)
    }
}

/// Trait for scoped style lint rules
pub trait ScopedCssRule: Send + Sync {
    /// Get rule metadata
    fn meta(&self) -> &'static ScopedCssRuleMeta;

    /// Check one style block against its component.
    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult);
}

pub struct ScopedCssLinter {
    rules: Vec<Box<dyn ScopedCssRule>>,
}

impl Default for ScopedCssLinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopedCssLinter {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_all_rules() -> Self {
        Self {
            rules: vec![
                Box::new(NoParsingError),
                Box::new(NoUnusedSelector),
                Box::new(RequireSelectorUsedInside),
                Box::new(NoUnusedKeyframes),
                Box::new(NoDeprecatedDeepCombinator),
                Box::new(NoDeprecatedVEnterVLeaveClass),
            ],
        }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ScopedCssRule>) {
        self.rules.push(rule);
    }

    /// Names of the enabled rules, in run order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.meta().name)
    }

    pub fn lint(&self, ctx: &AnalysisContext<'_>) -> ScopedCssLintResult {
        self.lint_at(ctx, 0)
    }

    /// Lint a style block that starts at `offset` in its file.
    pub fn lint_at(&self, ctx: &AnalysisContext<'_>, offset: u32) -> ScopedCssLintResult {
        let mut result = ScopedCssLintResult::with_offset(offset);
        for rule in &self.rules {
            rule.check(ctx, &mut result);
        }
        result.diagnostics.sort_by_key(|d| (d.start, d.end));
        tracing::debug!(
            rules = self.rules.len(),
            errors = result.error_count,
            warnings = result.warning_count,
            "linted style block"
        );
        result
    }
}

/// Every selector list written in the stylesheet: rules, `@nest` and
/// `@at-root`, in document order.
pub(crate) fn for_each_selector(sheet: &StyleSheet, mut f: impl FnMut(&Selector)) {
    sheet.walk(|node| {
        let selectors: &[Selector] = match node {
            StyleNode::Rule(rule) => &rule.selectors,
            StyleNode::AtRule(at_rule) => at_rule.selectors.as_deref().unwrap_or(&[]),
            StyleNode::Declaration(_) | StyleNode::Comment(_) => &[],
        };
        selectors.iter().for_each(&mut f);
    });
}

/// Visit selector nodes depth-first, pseudo arguments included.
pub(crate) fn for_each_node<'s>(nodes: &'s [SelectorNode], f: &mut impl FnMut(&'s SelectorNode)) {
    for node in nodes {
        f(node);
        if let SelectorNode::Pseudo(pseudo) = node {
            for arg in pseudo.selectors() {
                for_each_node(&arg.nodes, f);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use vize_pochoir::{CompiledOptions, ComponentState, StyleLang, StyleSheetBuilder};
    use vize_relief::TemplateBuilder;

    #[test]
    fn test_offset_and_order() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .rule(".a + .b", |_| {})
            .rule(".a >>> .c", |_| {})
            .build();
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "a");
                d.element("MyChild", |_| {});
            })
            .build();
        let state = ComponentState::new();
        let options = CompiledOptions::default();
        let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);

        let result = ScopedCssLinter::with_all_rules().lint_at(&ctx, 100);
        let starts: Vec<u32> = result.diagnostics.iter().map(|d| d.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert!(starts.iter().all(|&start| start >= 100));
        assert_eq!(result.by_rule("scoped-css/no-unused-selector").count(), 1);
        assert_eq!(
            result.by_rule("scoped-css/no-deprecated-deep-combinator").count(),
            1
        );
    }

    #[test]
    fn test_rule_names() {
        let linter = ScopedCssLinter::with_all_rules();
        let names: Vec<_> = linter.rule_names().collect();
        assert_eq!(names.len(), 6);
        assert!(names.iter().all(|name| name.starts_with("scoped-css/")));
    }
}
