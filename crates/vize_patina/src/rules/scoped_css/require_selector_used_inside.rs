//! scoped-css/require-selector-used-inside
//!
//! Require every part of a scoped selector to match inside the template.
//!
//! A scoped selector like `.dark .card` still works when `.dark` sits on an
//! ancestor outside the component, because only the last compound carries
//! the scope attribute. This rule reports such selectors, pointing at the
//! first compound (read right to left) that nothing in the template matches.
//! Selectors with `:global()` are skipped.

use vize_pochoir::selector::{render_nodes, SelectorNode, VuePseudo};
use vize_pochoir::{AnalysisContext, ResolvedSelector, ReverseQueryContext};

use crate::diagnostic::{LintDiagnostic, Severity};

use super::{ScopedCssLintResult, ScopedCssRule, ScopedCssRuleMeta};

static META: ScopedCssRuleMeta = ScopedCssRuleMeta {
    name: "scoped-css/require-selector-used-inside",
    description: "Require selectors to match elements inside the template",
    default_severity: Severity::Warning,
};

/// Require selector used inside rule
pub struct RequireSelectorUsedInside;

impl ScopedCssRule for RequireSelectorUsedInside {
    fn meta(&self) -> &'static ScopedCssRuleMeta {
        &META
    }

    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult) {
        if !ctx.is_target() || ctx.template().is_empty() {
            return;
        }
        let query = ReverseQueryContext::new(ctx);

        for selector in ctx.resolved_selectors() {
            if has_global(selector) {
                continue;
            }
            let Some(index) = query.query(&selector.nodes).first_unmatched else {
                continue;
            };
            let prefix = render_nodes(&selector.nodes[..=index]);
            let node_span = selector.nodes[index].span();
            let span = if !node_span.is_empty() && selector.span.contains(node_span) {
                node_span
            } else {
                selector.span
            };
            result.add_diagnostic(LintDiagnostic::new(
                META.name,
                META.default_severity,
                format!(
                    "`{prefix}` in `{}` does not match any element of the template",
                    selector.render()
                ),
                span,
            ));
        }
    }
}

fn has_global(selector: &ResolvedSelector) -> bool {
    selector.nodes.iter().any(|node| match node {
        SelectorNode::Pseudo(pseudo) => pseudo.vue_pseudo() == Some(VuePseudo::Global),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::scoped_css::test_utils::lint_with;
    use vize_pochoir::{StyleLang, StyleSheetBuilder};
    use vize_relief::{TemplateBuilder, TemplateTree};

    fn card() -> TemplateTree {
        TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "card");
                d.element("p", |p| {
                    p.attr("class", "body");
                });
            })
            .build()
    }

    #[test]
    fn test_valid_inside() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .rule(".card .body", |_| {})
            .rule(":global(.dark) .card", |_| {})
            .build();
        let result = lint_with(RequireSelectorUsedInside, &sheet, &card());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_outside_ancestor() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .rule(".dark .card .body", |_| {})
            .build();
        let result = lint_with(RequireSelectorUsedInside, &sheet, &card());
        assert_eq!(result.warning_count, 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(
            diagnostic.message,
            "`.dark` in `.dark .card .body` does not match any element of the template"
        );
        assert_eq!(
            &sheet.source[diagnostic.start as usize..diagnostic.end as usize],
            ".dark"
        );
    }

    #[test]
    fn test_deep_combinator_into_html_content() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "wrap");
                d.element("div", |inner| {
                    inner.attr("v-html", "raw");
                });
            })
            .build();
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .rule(".wrap >>> .inner", |_| {})
            .rule(".wrap :deep(.inner)", |_| {})
            .build();
        let result = lint_with(RequireSelectorUsedInside, &sheet, &tree);
        assert!(result.diagnostics.is_empty());
    }
}
