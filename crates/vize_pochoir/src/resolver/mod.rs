//! Nesting resolution.
//!
//! Expands `&`, `@nest`, SCSS `@at-root` and Stylus ancestor references so every
//! rule ends up with plain selector paths that can be matched against a template.
//!
//! The walk carries the resolved selectors of every ancestor rule. For each
//! selector of a rule:
//!
//! - without a marker, the selector is joined to each parent path with a
//!   descendant combinator (or directly when it starts with a combinator);
//! - otherwise the first marker is replaced by each path it refers to, repeating
//!   until no marker remains, so `& + &` under two parents yields four paths.
//!
//! Where the dialect allows it, a marker touching a type selector is
//! concatenated with it (`&-item` under `.list` becomes `.list-item`).
//!
//! Dialects differ only in where concatenation applies and which ancestor
//! levels a marker can address; see [`NestingDialect`].

mod css;
mod scss;
mod stylus;

use std::fmt;
use std::sync::Arc;

use crate::selector::{
    first_nesting, render_nodes, Combinator, CombinatorNode, NestingReference, PseudoArgs,
    PseudoSelector, Selector, SelectorNode, SimpleSelector,
};
use crate::span::Span;
use crate::stylesheet::{RuleId, StyleLang, StyleNode, StyleSheet};

pub use css::CssNesting;
pub use scss::ScssNesting;
pub use stylus::StylusNesting;

/// A selector path with nesting expanded, tied to the rule declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelector {
    pub nodes: Vec<SelectorNode>,
    /// Rule or at-rule that declares the selector.
    pub rule: RuleId,
    /// Source span of the selector as written in that rule.
    pub span: Span,
    /// Number of ancestor rules.
    pub depth: usize,
}

impl ResolvedSelector {
    #[inline]
    pub fn render(&self) -> String {
        render_nodes(&self.nodes)
    }
}

impl fmt::Display for ResolvedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Where a nesting marker appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestContext {
    /// A style rule's own selector list.
    Rule,
    /// An explicit `@nest` at-rule.
    NestAtRule,
}

/// Ancestor levels a marker refers to. Level `0` is the outermost rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSelection {
    /// The resolved selectors of one level, including everything above it.
    Through(usize),
    /// Levels `start..=end` re-resolved with `start` as the root.
    Range(usize, usize),
    /// Nothing: the remainder of the selector becomes a root selector.
    Detached,
}

/// Per-dialect hooks of the resolver.
pub trait NestingDialect: Send + Sync {
    fn lang(&self) -> StyleLang;

    /// Whether a marker adjacent to a type selector is concatenated with it.
    fn concatenates(&self, context: NestContext) -> bool;

    /// Levels a reference points to, given the number of ancestor levels.
    /// `None` means the reference cannot be satisfied.
    fn reference_levels(&self, reference: NestingReference, depth: usize)
        -> Option<LevelSelection>;

    /// Whether SCSS `@at-root` is understood.
    fn supports_at_root(&self) -> bool {
        false
    }
}

/// Pick the dialect for a style language.
pub fn dialect_for(lang: StyleLang) -> &'static dyn NestingDialect {
    static CSS: CssNesting = CssNesting;
    static SCSS: ScssNesting = ScssNesting;
    static STYLUS: StylusNesting = StylusNesting;
    match lang {
        StyleLang::Css => &CSS,
        StyleLang::Scss => &SCSS,
        StyleLang::Stylus => &STYLUS,
    }
}

/// Resolve every rule of a stylesheet, in document order.
pub fn resolve_stylesheet(sheet: &StyleSheet) -> Vec<ResolvedSelector> {
    NestingResolver::new(dialect_for(sheet.lang)).resolve(sheet)
}

type Path = Vec<SelectorNode>;

/// Resolved selectors of one ancestor rule.
#[derive(Debug, Clone)]
struct Level<'s> {
    selectors: &'s [Selector],
    context: NestContext,
    paths: Vec<Path>,
}

/// Nesting resolver for one dialect.
pub struct NestingResolver<'d> {
    dialect: &'d dyn NestingDialect,
}

impl<'d> NestingResolver<'d> {
    pub fn new(dialect: &'d dyn NestingDialect) -> Self {
        Self { dialect }
    }

    pub fn resolve(&self, sheet: &StyleSheet) -> Vec<ResolvedSelector> {
        if sheet.has_errors() {
            tracing::debug!(
                errors = sheet.errors.len(),
                "stylesheet has parse errors, skipping nesting resolution"
            );
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut chain = Vec::new();
        self.walk(&sheet.nodes, &mut chain, &mut out);
        tracing::debug!(
            lang = ?self.dialect.lang(),
            count = out.len(),
            "resolved nested selectors"
        );
        out
    }

    fn walk<'s>(
        &self,
        nodes: &'s [StyleNode],
        chain: &mut Vec<Level<'s>>,
        out: &mut Vec<ResolvedSelector>,
    ) {
        for node in nodes {
            match node {
                StyleNode::Rule(rule) => {
                    let level =
                        self.emit(rule.id, &rule.selectors, NestContext::Rule, chain, out);
                    chain.push(level);
                    self.walk(&rule.nodes, chain, out);
                    chain.pop();
                }
                StyleNode::AtRule(at_rule) => {
                    let name = at_rule.normalized_name();
                    let children = at_rule.nodes.as_deref().unwrap_or(&[]);
                    match (name.as_str(), at_rule.selectors.as_deref()) {
                        ("keyframes", _) => {}
                        ("nest", Some(selectors)) => {
                            let level = self.emit(
                                at_rule.id,
                                selectors,
                                NestContext::NestAtRule,
                                chain,
                                out,
                            );
                            chain.push(level);
                            self.walk(children, chain, out);
                            chain.pop();
                        }
                        ("at-root", selectors) if self.dialect.supports_at_root() => {
                            let mut detached = Vec::new();
                            if let Some(selectors) = selectors {
                                let paths = selectors
                                    .iter()
                                    .flat_map(|sel| {
                                        let base: &[Level<'s>] =
                                            if sel.has_nesting() { &chain[..] } else { &[] };
                                        let paths =
                                            self.resolve_selector(sel, base, NestContext::Rule);
                                        emit_paths(at_rule.id, sel, base.len(), &paths, out);
                                        paths
                                    })
                                    .collect();
                                detached.push(Level {
                                    selectors,
                                    context: NestContext::Rule,
                                    paths,
                                });
                            }
                            self.walk(children, &mut detached, out);
                        }
                        _ => self.walk(children, chain, out),
                    }
                }
                StyleNode::Declaration(_) | StyleNode::Comment(_) => {}
            }
        }
    }

    fn emit<'s>(
        &self,
        rule: RuleId,
        selectors: &'s [Selector],
        context: NestContext,
        chain: &[Level<'s>],
        out: &mut Vec<ResolvedSelector>,
    ) -> Level<'s> {
        let mut paths = Vec::new();
        for sel in selectors {
            let resolved = self.resolve_selector(sel, chain, context);
            emit_paths(rule, sel, chain.len(), &resolved, out);
            paths.extend(resolved);
        }
        Level {
            selectors,
            context,
            paths,
        }
    }

    /// Resolve one selector against the ancestor chain.
    fn resolve_selector(
        &self,
        sel: &Selector,
        chain: &[Level<'_>],
        context: NestContext,
    ) -> Vec<Path> {
        if first_nesting(&sel.nodes).is_none() {
            let Some(parent) = chain.last() else {
                return vec![sel.nodes.clone()];
            };
            return parent
                .paths
                .iter()
                .map(|path| {
                    let mut joined = path.clone();
                    if !sel.starts_with_combinator() {
                        joined.push(descendant(sel.span));
                    }
                    joined.extend(sel.nodes.iter().cloned());
                    joined
                })
                .collect();
        }

        let concat = self.dialect.concatenates(context);
        let mut current = vec![sel.nodes.clone()];
        loop {
            let mut next = Vec::with_capacity(current.len());
            let mut replaced = false;
            for nodes in current {
                let Some(marker) = first_nesting(&nodes) else {
                    next.push(nodes);
                    continue;
                };
                let reference = marker.reference;
                let Some(replacements) = self.reference_paths(reference, chain) else {
                    tracing::debug!(
                        selector = %sel,
                        reference = %reference,
                        depth = chain.len(),
                        "nesting reference out of range"
                    );
                    return Vec::new();
                };
                replaced = true;
                for replacement in &replacements {
                    if let Some(spliced) = splice_first(&nodes, replacement, concat) {
                        next.push(spliced);
                    }
                }
            }
            current = next;
            if !replaced {
                break;
            }
        }

        current
            .into_iter()
            .map(trim_descendants)
            .filter(|path| !path.is_empty())
            .collect()
    }

    fn reference_paths(
        &self,
        reference: NestingReference,
        chain: &[Level<'_>],
    ) -> Option<Vec<Path>> {
        if chain.is_empty() {
            return Some(vec![Vec::new()]);
        }
        match self.dialect.reference_levels(reference, chain.len())? {
            LevelSelection::Through(level) => chain.get(level).map(|l| l.paths.clone()),
            LevelSelection::Range(start, end) => {
                let levels = chain.get(start..=end)?;
                Some(self.rebuild(levels))
            }
            LevelSelection::Detached => Some(vec![Vec::new()]),
        }
    }

    /// Re-resolve a slice of the ancestor chain with its first level as the root.
    fn rebuild(&self, levels: &[Level<'_>]) -> Vec<Path> {
        let mut sub: Vec<Level<'_>> = Vec::with_capacity(levels.len());
        for level in levels {
            let paths = level
                .selectors
                .iter()
                .flat_map(|sel| self.resolve_selector(sel, &sub, level.context))
                .collect();
            sub.push(Level {
                selectors: level.selectors,
                context: level.context,
                paths,
            });
        }
        sub.pop().map(|l| l.paths).unwrap_or_default()
    }
}

fn emit_paths(
    rule: RuleId,
    sel: &Selector,
    depth: usize,
    paths: &[Path],
    out: &mut Vec<ResolvedSelector>,
) {
    out.extend(paths.iter().map(|nodes| ResolvedSelector {
        nodes: nodes.clone(),
        rule,
        span: sel.span,
        depth,
    }));
}

#[inline]
fn descendant(span: Span) -> SelectorNode {
    SelectorNode::Combinator(CombinatorNode {
        kind: Combinator::Descendant,
        span: Span::empty(span.start),
    })
}

/// Replace the first marker (depth-first) with `replacement`, rebuilding any
/// pseudo selector that contains it.
fn splice_first(
    nodes: &[SelectorNode],
    replacement: &[SelectorNode],
    concat: bool,
) -> Option<Path> {
    for (i, node) in nodes.iter().enumerate() {
        match node {
            SelectorNode::Nesting(_) => return Some(splice_at(nodes, i, replacement, concat)),
            SelectorNode::Pseudo(pseudo)
                if pseudo.selectors().iter().any(Selector::has_nesting) =>
            {
                let mut args: Vec<Selector> = pseudo.selectors().to_vec();
                for arg in args.iter_mut() {
                    if let Some(spliced) = splice_first(&arg.nodes, replacement, concat) {
                        arg.nodes = trim_descendants(spliced);
                        break;
                    }
                }
                let mut out = nodes.to_vec();
                out[i] = SelectorNode::Pseudo(PseudoSelector {
                    name: pseudo.name.clone(),
                    args: PseudoArgs::Selectors(Arc::from(args)),
                    span: pseudo.span,
                });
                return Some(out);
            }
            _ => {}
        }
    }
    None
}

fn splice_at(nodes: &[SelectorNode], i: usize, replacement: &[SelectorNode], concat: bool) -> Path {
    let mut repl = replacement.to_vec();
    let mut start = i;
    let mut end = i + 1;

    if concat && !repl.is_empty() {
        if let Some(SelectorNode::Type(right)) = nodes.get(i + 1) {
            if let Some(last) = repl.last_mut() {
                if let Some(merged) = concat_right(last, right) {
                    *last = merged;
                    end += 1;
                }
            }
        }
        if let Some(SelectorNode::Type(left)) = i.checked_sub(1).and_then(|j| nodes.get(j)) {
            if let Some(SelectorNode::Type(first)) = repl.first() {
                repl[0] = SelectorNode::Type(SimpleSelector::new(
                    left.value.concat(&first.value),
                    left.span.merge(first.span),
                ));
                start -= 1;
            }
        }
    }

    let mut out = Vec::with_capacity(nodes.len() + repl.len());
    out.extend(nodes[..start].iter().cloned());
    out.extend(repl);
    out.extend(nodes[end..].iter().cloned());
    out
}

/// Join a type selector onto the end of the parent's last simple selector.
fn concat_right(last: &SelectorNode, right: &SimpleSelector) -> Option<SelectorNode> {
    let merge = |s: &SimpleSelector| {
        SimpleSelector::new(s.value.concat(&right.value), s.span.merge(right.span))
    };
    match last {
        SelectorNode::Type(s) => Some(SelectorNode::Type(merge(s))),
        SelectorNode::Class(s) => Some(SelectorNode::Class(merge(s))),
        SelectorNode::Id(s) => Some(SelectorNode::Id(merge(s))),
        _ => None,
    }
}

/// Drop descendant combinators left dangling by an empty replacement.
fn trim_descendants(mut path: Path) -> Path {
    let is_descendant =
        |n: &SelectorNode| n.as_combinator() == Some(Combinator::Descendant);
    while path.last().is_some_and(is_descendant) {
        path.pop();
    }
    let leading = path.iter().take_while(|n| is_descendant(n)).count();
    path.drain(..leading);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::StyleSheetBuilder;

    fn rendered(sheet: &StyleSheet) -> Vec<String> {
        resolve_stylesheet(sheet).iter().map(|r| r.render()).collect()
    }

    #[test]
    fn test_prefix_nesting() {
        let sheet = StyleSheetBuilder::new(StyleLang::Scss)
            .rule(".foo", |r| {
                r.rule("&.bar", |_| {});
                r.rule("& .bar", |_| {});
            })
            .build();
        assert_eq!(rendered(&sheet), vec![".foo", ".foo.bar", ".foo .bar"]);
    }

    #[test]
    fn test_nest_at_rule_concatenation() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .rule(".foo", |r| {
                r.at_rule("nest", ".bar&-baz", |_| {});
            })
            .build();
        assert_eq!(rendered(&sheet), vec![".foo", ".bar.foo-baz"]);
    }

    #[test]
    fn test_css_rule_does_not_concatenate() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .rule(".foo", |r| {
                r.rule("&-baz", |_| {});
            })
            .build();
        let resolved = resolve_stylesheet(&sheet);
        assert_eq!(resolved[1].nodes.len(), 2);
    }

    #[test]
    fn test_cross_product() {
        let sheet = StyleSheetBuilder::new(StyleLang::Scss)
            .rule(".a, .b", |r| {
                r.rule("& + &", |_| {});
            })
            .build();
        assert_eq!(
            rendered(&sheet)[2..],
            [".a+.a", ".a+.b", ".b+.a", ".b+.b"]
        );
    }

    #[test]
    fn test_parse_errors_yield_nothing() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .rule(".foo", |_| {})
            .parse_error("Unclosed block")
            .build();
        assert!(resolve_stylesheet(&sheet).is_empty());
    }

    #[test]
    fn test_resolved_rule_ids() {
        let sheet = StyleSheetBuilder::new(StyleLang::Scss)
            .rule(".a", |r| {
                r.rule(".b", |_| {});
            })
            .build();
        let resolved = resolve_stylesheet(&sheet);
        assert_eq!(resolved[0].rule, RuleId::new(0));
        assert_eq!(resolved[1].rule, RuleId::new(1));
        assert_eq!(resolved[1].depth, 1);
        assert_eq!(resolved[1].span.source_text(&sheet.source), Some(".b"));
    }
}
