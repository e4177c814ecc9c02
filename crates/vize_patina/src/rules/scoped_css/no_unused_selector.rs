//! scoped-css/no-unused-selector
//!
//! Report selectors of a scoped style block that cannot match any element
//! the component renders.
//!
//! Nested rules are resolved first, so `.list { &-item {} }` is checked as
//! `.list-item`. Bound classes, transition classes, slots and child
//! components are taken into account; anything that cannot be decided
//! statically counts as a match.
//!
//! ## Examples
//!
//! ### Invalid
//! ```vue
//! <template><li class="bar" /></template>
//! <style scoped>
//! .foo {}
//! </style>
//! ```
//!
//! ### Valid
//! ```vue
//! <template><li class="foo" /></template>
//! <style scoped>
//! .foo {}
//! </style>
//! ```

use vize_carton::FxHashSet;
use vize_pochoir::{AnalysisContext, QueryContext};

use crate::diagnostic::{LintDiagnostic, Severity};

use super::{ScopedCssLintResult, ScopedCssRule, ScopedCssRuleMeta};

static META: ScopedCssRuleMeta = ScopedCssRuleMeta {
    name: "scoped-css/no-unused-selector",
    description: "Disallow selectors that match nothing in the template",
    default_severity: Severity::Warning,
};

/// No unused selector rule
pub struct NoUnusedSelector;

impl ScopedCssRule for NoUnusedSelector {
    fn meta(&self) -> &'static ScopedCssRuleMeta {
        &META
    }

    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult) {
        if !ctx.is_target() || ctx.template().is_empty() {
            return;
        }
        let query = QueryContext::new(ctx);
        let mut reported = FxHashSet::default();

        for selector in ctx.resolved_selectors() {
            if query.query(&selector.nodes).is_used() {
                continue;
            }
            let rendered = selector.render();
            if !reported.insert((selector.span, rendered.clone())) {
                continue;
            }
            result.add_diagnostic(
                LintDiagnostic::new(
                    META.name,
                    META.default_severity,
                    format!("The selector `{rendered}` is unused"),
                    selector.span,
                )
                .with_help("Remove the selector, or check which element it was meant to style"),
            );
        }
    }
}
