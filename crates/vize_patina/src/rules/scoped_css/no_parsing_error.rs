//! scoped-css/no-parsing-error
//!
//! Report style blocks the style parser could not read. Nothing else is
//! checked for such a block, since its selectors are not resolved.

use vize_pochoir::AnalysisContext;

use crate::diagnostic::{LintDiagnostic, Severity};

use super::{ScopedCssLintResult, ScopedCssRule, ScopedCssRuleMeta};

static META: ScopedCssRuleMeta = ScopedCssRuleMeta {
    name: "scoped-css/no-parsing-error",
    description: "Disallow parsing errors in style blocks",
    default_severity: Severity::Error,
};

/// No parsing error rule
pub struct NoParsingError;

impl ScopedCssRule for NoParsingError {
    fn meta(&self) -> &'static ScopedCssRuleMeta {
        &META
    }

    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult) {
        for error in &ctx.stylesheet().errors {
            result.add_diagnostic(LintDiagnostic::error(
                META.name,
                format!("Parsing error: {}", error.message),
                error.span,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::scoped_css::test_utils::lint_with;
    use vize_pochoir::{StyleLang, StyleSheetBuilder};
    use vize_relief::TemplateBuilder;

    #[test]
    fn test_invalid_selector() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .rule(".a >", |_| {})
            .build();
        let tree = TemplateBuilder::new().element("div", |_| {}).build();
        let result = lint_with(NoParsingError, &sheet, &tree);
        assert_eq!(result.error_count, 1);
        assert!(result.has_errors());
        assert_eq!(
            result.diagnostics[0].message,
            "Parsing error: selector ends with a combinator"
        );
    }
}
