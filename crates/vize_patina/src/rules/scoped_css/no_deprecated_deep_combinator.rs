//! scoped-css/no-deprecated-deep-combinator
//!
//! Disallow the Vue 2 deep selectors `>>>`, `/deep/` and argument-less
//! `::v-deep`. Vue 3 uses `:deep(...)` instead.
//!
//! ## Examples
//!
//! ### Invalid
//! ```css
//! .a >>> .b {}
//! .a /deep/ .b {}
//! .a ::v-deep .b {}
//! ```
//!
//! ### Valid
//! ```css
//! .a :deep(.b) {}
//! ```

use vize_pochoir::selector::{Combinator, PseudoSelector, SelectorNode, VuePseudo};
use vize_pochoir::{AnalysisContext, Span};

use crate::diagnostic::{Fix, LintDiagnostic, Severity, TextEdit};

use super::{for_each_selector, ScopedCssLintResult, ScopedCssRule, ScopedCssRuleMeta};

static META: ScopedCssRuleMeta = ScopedCssRuleMeta {
    name: "scoped-css/no-deprecated-deep-combinator",
    description: "Disallow the deprecated >>>, /deep/ and ::v-deep combinators",
    default_severity: Severity::Warning,
};

/// No deprecated deep combinator rule
pub struct NoDeprecatedDeepCombinator;

impl ScopedCssRule for NoDeprecatedDeepCombinator {
    fn meta(&self) -> &'static ScopedCssRuleMeta {
        &META
    }

    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult) {
        let source = ctx.stylesheet().source.as_str();
        for_each_selector(ctx.stylesheet(), |selector| {
            check_nodes(&selector.nodes, selector.span.end, source, result);
        });
    }
}

fn check_nodes(nodes: &[SelectorNode], end: u32, source: &str, result: &mut ScopedCssLintResult) {
    for (i, node) in nodes.iter().enumerate() {
        if let SelectorNode::Pseudo(pseudo) = node {
            for arg in pseudo.selectors() {
                check_nodes(&arg.nodes, arg.span.end, source, result);
            }
        }
        let Some(written) = deprecated_deep(node) else {
            continue;
        };
        let span = node.span();
        let mut diagnostic = LintDiagnostic::new(
            META.name,
            META.default_severity,
            format!("The deep selector `{written}` is deprecated"),
            span,
        )
        .with_help("Use `:deep()` instead");

        // Only the last deprecated selector of a list can be rewritten in place.
        let later = nodes[i + 1..].iter().any(|n| deprecated_deep(n).is_some());
        if !later {
            if let Some(fix) = deep_fix(source, span, end) {
                diagnostic = diagnostic.with_fix(fix);
            }
        }
        result.add_diagnostic(diagnostic);
    }
}

/// The deprecated spelling, if the node is one.
fn deprecated_deep(node: &SelectorNode) -> Option<&str> {
    match node {
        SelectorNode::Combinator(c) if matches!(c.kind, Combinator::Deep(_)) => {
            Some(c.kind.as_str())
        }
        SelectorNode::Pseudo(pseudo) if is_bare_v_deep(pseudo) => Some(pseudo.name.as_str()),
        _ => None,
    }
}

fn is_bare_v_deep(pseudo: &PseudoSelector) -> bool {
    pseudo.vue_pseudo() == Some(VuePseudo::Deep)
        && !pseudo.has_selector_args()
        && pseudo.bare_name() == "v-deep"
}

/// Wrap everything after the deprecated selector in `:deep()`.
fn deep_fix(source: &str, span: Span, end: u32) -> Option<Fix> {
    let rest = Span::new(span.end, end).source_text(source)?.trim();
    if rest.is_empty() {
        return None;
    }
    Some(Fix::new(
        "Replace with `:deep()`",
        TextEdit::replace(span.start, end, format!(":deep({rest})")),
    ))
}
