//! scoped-css/no-unused-keyframes
//!
//! Report `@keyframes` of a scoped style block that no `animation` or
//! `animation-name` declaration in the block refers to.
//!
//! Scoped keyframe names are rewritten per component, so animations from
//! other files cannot use them. Names built with interpolation are compared
//! permissively, and a block using `var()` or `v-bind()` in an animation is
//! not checked at all.

use vize_pochoir::{AnalysisContext, StyleNode, Template};

use crate::diagnostic::{LintDiagnostic, Severity};

use super::{ScopedCssLintResult, ScopedCssRule, ScopedCssRuleMeta};

static META: ScopedCssRuleMeta = ScopedCssRuleMeta {
    name: "scoped-css/no-unused-keyframes",
    description: "Disallow @keyframes that are never used",
    default_severity: Severity::Warning,
};

/// No unused keyframes rule
pub struct NoUnusedKeyframes;

impl ScopedCssRule for NoUnusedKeyframes {
    fn meta(&self) -> &'static ScopedCssRuleMeta {
        &META
    }

    fn check(&self, ctx: &AnalysisContext<'_>, result: &mut ScopedCssLintResult) {
        if !ctx.is_target() {
            return;
        }
        let sheet = ctx.stylesheet();
        let syntax = sheet.lang.selector_syntax().interpolation();
        let mut keyframes = Vec::new();
        let mut animations = Vec::new();
        let mut dynamic = false;

        sheet.walk(|node| match node {
            StyleNode::AtRule(at_rule) if at_rule.is_keyframes() => {
                let name = at_rule.params.trim();
                if !name.is_empty() {
                    keyframes.push((Template::parse(name, syntax), at_rule.params_span));
                }
            }
            StyleNode::Declaration(decl) if is_animation_property(&decl.property) => {
                for token in decl
                    .value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                {
                    // Functions and preprocessor variables hide the name.
                    if token.contains('(') || token.starts_with('$') || token.starts_with('@') {
                        dynamic = true;
                    } else {
                        animations.push(Template::parse(token, syntax));
                    }
                }
            }
            _ => {}
        });

        if dynamic {
            tracing::trace!("animation names are dynamic, skipping keyframes check");
            return;
        }
        for (name, span) in keyframes {
            if animations.iter().any(|animation| animation.matches(&name)) {
                continue;
            }
            result.add_diagnostic(LintDiagnostic::new(
                META.name,
                META.default_severity,
                format!("The @keyframes `{name}` is unused"),
                span,
            ));
        }
    }
}

fn is_animation_property(property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    let unprefixed = ["-webkit-", "-moz-", "-o-", "-ms-"]
        .iter()
        .find_map(|prefix| property.strip_prefix(prefix))
        .unwrap_or(&property);
    matches!(unprefixed, "animation" | "animation-name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::scoped_css::test_utils::lint_with;
    use vize_pochoir::{StyleLang, StyleSheetBuilder};
    use vize_relief::TemplateBuilder;

    fn lint(sheet: &vize_pochoir::StyleSheet) -> ScopedCssLintResult {
        let tree = TemplateBuilder::new().element("div", |_| {}).build();
        lint_with(NoUnusedKeyframes, sheet, &tree)
    }

    #[test]
    fn test_valid_used_keyframes() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .at_rule("keyframes", "spin", |frames| {
                frames.rule("to", |r| {
                    r.decl("transform", "rotate(360deg)");
                });
            })
            .at_rule("-webkit-keyframes", "fade", |_| {})
            .rule(".a", |r| {
                r.decl("animation", "spin 1s linear infinite");
                r.decl("-webkit-animation-name", "fade");
            })
            .build();
        assert!(lint(&sheet).diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_unused_keyframes() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .at_rule("keyframes", "spin", |_| {})
            .at_rule("keyframes", "pulse", |_| {})
            .rule(".a", |r| {
                r.decl("animation", "spin 1s, bounce 2s");
            })
            .build();
        let result = lint(&sheet);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.diagnostics[0].message, "The @keyframes `pulse` is unused");
    }

    #[test]
    fn test_interpolated_names() {
        let sheet = StyleSheetBuilder::new(StyleLang::Scss)
            .scoped(true)
            .at_rule("keyframes", "slide-#{$dir}", |_| {})
            .rule(".a", |r| {
                r.decl("animation-name", "slide-left");
            })
            .build();
        assert!(lint(&sheet).diagnostics.is_empty());

        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .at_rule("keyframes", "spin", |_| {})
            .rule(".a", |r| {
                r.decl("animation", "var(--anim)");
            })
            .build();
        assert!(lint(&sheet).diagnostics.is_empty());
    }
}
