//! # vize_patina
//!
//! Patina - The quality checker for Vize.
//! Linter for the scoped `<style>` blocks of Vue.js Single File Components.
//!
//! ## Name Origin
//!
//! **Patina** (/ˈpætɪnə/) refers to the greenish layer that forms on copper,
//! bronze, and similar metals through oxidation over time. In art and antiques,
//! patina is highly valued as it indicates authenticity, age, and quality.
//! `vize_patina` examines the styles of a Vue SFC against its template to
//! ensure their quality.
//!
//! ## Features
//!
//! - Selector usage checks backed by `vize_pochoir`
//! - eslint-plugin-vue-scoped-css compatible rules
//! - Auto-fixes for deprecated Vue 2 syntax
//! - Text and JSON output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vize_patina::{format_results, FileResult, OutputFormat, ScopedCssLinter};
//! use vize_pochoir::AnalysisContext;
//!
//! let ctx = AnalysisContext::new(&stylesheet, &template, &state, &options);
//! let result = ScopedCssLinter::with_all_rules().lint_at(&ctx, style_offset);
//!
//! let output = format_results(
//!     &[FileResult { filename: "App.vue", source, result: &result }],
//!     OutputFormat::Text,
//! );
//! println!("{}", output);
//! ```
//!
//! ## Rules
//!
//! - `scoped-css/no-parsing-error` - Report style blocks that failed to parse
//! - `scoped-css/no-unused-selector` - Disallow selectors that match nothing in the template
//! - `scoped-css/require-selector-used-inside` - Require every part of a selector to match
//!   inside the template
//! - `scoped-css/no-unused-keyframes` - Disallow `@keyframes` no animation refers to
//! - `scoped-css/no-deprecated-deep-combinator` - Disallow `>>>`, `/deep/` and `::v-deep`
//! - `scoped-css/no-deprecated-v-enter-v-leave-class` - Disallow the Vue 2 transition class names

mod diagnostic;
pub mod output;
pub mod rules;

pub use diagnostic::{Fix, LintDiagnostic, Severity, TextEdit};
pub use output::{format_results, format_summary, line_col, FileResult, OutputFormat};
pub use rules::scoped_css::{
    NoDeprecatedDeepCombinator, NoDeprecatedVEnterVLeaveClass, NoParsingError, NoUnusedKeyframes,
    NoUnusedSelector, RequireSelectorUsedInside, ScopedCssLintResult, ScopedCssLinter,
    ScopedCssRule, ScopedCssRuleMeta,
};

use vize_pochoir::AnalysisContext;

/// Lint a style block with every rule enabled
///
/// This is a convenience function for simple use cases.
/// For more control, use `ScopedCssLinter` directly.
pub fn lint(ctx: &AnalysisContext<'_>) -> ScopedCssLintResult {
    ScopedCssLinter::with_all_rules().lint(ctx)
}
