//! scoped-css/no-deprecated-v-enter-v-leave-class
//!
//! Vue 3 renamed the `v-enter`, `v-leave` and `v-appear` transition classes
//! to `v-enter-from`, `v-leave-from` and `v-appear-from`. The old names still
//! count as used by `no-unused-selector`; this rule reports them.
//!
//! ## Examples
//!
//! ### Invalid
//! ```vue
//! <template><Transition name="fade"><p v-if="show" /></Transition></template>
//! <style scoped>
//! .fade-enter {}
//! </style>
//! ```
//!
//! ### Valid
//! ```vue
//! <template><Transition name="fade"><p v-if="show" /></Transition></template>
//! <style scoped>
//! .fade-enter-from {}
//! </style>
//! ```

use vize_carton::{CompactString, FxHashSet};
use vize_pochoir::selector::SelectorNode;
use vize_pochoir::{AnalysisContext, AttrValue, BuiltIn, Span, Template};

use crate::diagnostic::{Fix, LintDiagnostic, Severity, TextEdit};

use super::{for_each_node, ScopedCssLintResult, ScopedCssRule, ScopedCssRuleMeta};

static META: ScopedCssRuleMeta = ScopedCssRuleMeta {
    name: "scoped-css/no-deprecated-v-enter-v-leave-class",
    description: "Disallow the Vue 2 v-enter, v-leave and v-appear transition class names",
    default_severity: Severity::Warning,
};

const DEPRECATED_STAGES: &[&str] = &["enter", "leave", "appear"];

/// No deprecated v-enter / v-leave class rule
pub struct NoDeprecatedVEnterVLeaveClass;

impl ScopedCssRule for NoDeprecatedVEnterVLeaveClass {
    fn meta(&self) -> &'static ScopedCssRuleMeta {
        &META
    }

    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult) {
        let names = transition_names(ctx);
        if names.is_empty() {
            return;
        }
        let source = ctx.stylesheet().source.as_str();
        let mut reported: FxHashSet<(Span, CompactString)> = FxHashSet::default();

        for selector in ctx.resolved_selectors() {
            for_each_node(&selector.nodes, &mut |node| {
                let SelectorNode::Class(class) = node else { return };
                let Some(value) = class.value.as_str() else { return };
                let Some(stage) = deprecated_stage(value, &names) else {
                    return;
                };
                let span = if selector.span.contains(class.span) {
                    class.span
                } else {
                    selector.span
                };
                if !reported.insert((span, CompactString::new(value))) {
                    return;
                }

                let replacement = format!("{value}-from");
                let mut diagnostic = LintDiagnostic::new(
                    META.name,
                    META.default_severity,
                    format!("The `{value}` class is deprecated"),
                    span,
                )
                .with_help(format!(
                    "Vue 3 renamed the `{stage}` transition class to `{stage}-from`, \
                     use `{replacement}`"
                ));
                let written = class.span.source_text(source).and_then(|t| t.strip_prefix('.'));
                if written == Some(value) {
                    diagnostic = diagnostic.with_fix(Fix::new(
                        format!("Rename to `{replacement}`"),
                        TextEdit::replace(
                            class.span.start,
                            class.span.end,
                            format!(".{replacement}"),
                        ),
                    ));
                }
                result.add_diagnostic(diagnostic);
            });
        }
    }
}

/// Names given to transitions of the template, `v` when unnamed.
fn transition_names(ctx: &AnalysisContext<'_>) -> Vec<AttrValue> {
    let mut names = Vec::new();
    for el in ctx.template().ids().filter_map(|id| ctx.element(id)) {
        if !el.builtin().is_some_and(BuiltIn::is_transition) {
            continue;
        }
        let values = el.attribute_values("name", ctx.state());
        if values.is_empty() {
            names.push(AttrValue::Static(Template::of("v")));
        } else {
            names.extend(values);
        }
    }
    names
}

/// The deprecated stage a class name stands for, if any.
fn deprecated_stage(class: &str, names: &[AttrValue]) -> Option<&'static str> {
    DEPRECATED_STAGES.iter().copied().find(|stage| {
        class
            .strip_suffix(stage)
            .and_then(|prefix| prefix.strip_suffix('-'))
            .is_some_and(|prefix| names.iter().any(|name| name.matches(&Template::of(prefix))))
    })
}
