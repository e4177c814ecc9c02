use crate::context::AnalysisContext;
use crate::selector::{Combinator, PseudoSelector, Selector, SelectorNode, VuePseudo};

use super::{
    adjacent, matches_simple, rewrite_deep, Candidate, CandidateSet, QueryResult, Relations,
};

/// Left-to-right evaluation of resolved selectors.
pub struct QueryContext<'c, 'a> {
    rel: Relations<'c, 'a>,
}

impl<'c, 'a> QueryContext<'c, 'a> {
    pub fn new(ctx: &'c AnalysisContext<'a>) -> Self {
        Self {
            rel: Relations::new(ctx),
        }
    }

    /// Evaluate from every element of the template plus `Outside`.
    pub fn query(&self, nodes: &[SelectorNode]) -> QueryResult {
        self.query_from(nodes, self.rel.everything())
    }

    /// Evaluate with the first compound tested against `start`.
    pub fn query_from(&self, nodes: &[SelectorNode], start: CandidateSet) -> QueryResult {
        let (matched, first_unmatched) = self.eval(nodes, start);
        tracing::trace!(
            matched = matched.len(),
            ?first_unmatched,
            "forward query"
        );
        QueryResult {
            matched,
            first_unmatched,
        }
    }

    fn eval(&self, nodes: &[SelectorNode], mut set: CandidateSet) -> (CandidateSet, Option<usize>) {
        let (nodes, deep_at) = rewrite_deep(nodes);
        for (i, node) in nodes.iter().enumerate() {
            set = match node {
                SelectorNode::Combinator(c) => self.step(&set, c.kind),
                SelectorNode::Pseudo(pseudo) => self.pseudo(pseudo, set),
                simple => {
                    let ctx = self.rel.ctx();
                    set.retain(|&c| matches_simple(ctx, c, simple));
                    set
                }
            };
            if set.is_empty() {
                // A rewritten deep pseudo fails on the compound after the combinator.
                let at = if deep_at == Some(i) { i + 1 } else { i };
                return (set, Some(at));
            }
        }
        (set, None)
    }

    fn eval_list(&self, selectors: &[Selector], start: &CandidateSet) -> CandidateSet {
        selectors
            .iter()
            .flat_map(|sel| self.eval(&sel.nodes, start.clone()).0)
            .collect()
    }

    fn pseudo(&self, pseudo: &PseudoSelector, set: CandidateSet) -> CandidateSet {
        let Some(kind) = pseudo.vue_pseudo().filter(|_| pseudo.has_selector_args()) else {
            return set;
        };
        let start = match kind {
            VuePseudo::Deep => self.deep_start(&set),
            VuePseudo::Slotted => self.slotted_start(&set),
            VuePseudo::Global => {
                let mut all = self.rel.everything();
                all.insert(Candidate::Foreign);
                all
            }
        };
        self.eval_list(pseudo.selectors(), &start)
    }

    /// The set, everything under it, and foreign DOM if any may appear there.
    fn deep_start(&self, set: &CandidateSet) -> CandidateSet {
        let mut out = set.clone();
        out.extend(self.descendants(set));
        if self.rel.reaches_foreign(&out) {
            out.insert(Candidate::Foreign);
        }
        out
    }

    /// Fallback content of slots under the set, and slot content from outside.
    fn slotted_start(&self, set: &CandidateSet) -> CandidateSet {
        let ctx = self.rel.ctx();
        let outside = set.contains(&Candidate::Outside);
        let mut out = CandidateSet::new();
        let mut found = set.contains(&Candidate::Foreign);
        for el in ctx.template().ids().filter_map(|id| ctx.element(id)) {
            if !el.is_slot() {
                continue;
            }
            let under_set = outside
                || el
                    .rendered_ancestors()
                    .iter()
                    .any(|a| set.contains(&Candidate::Element(a.id())));
            if !under_set {
                continue;
            }
            found = true;
            out.extend(
                el.rendered_children()
                    .iter()
                    .flat_map(|c| std::iter::once(*c).chain(c.rendered_descendants()))
                    .map(|c| Candidate::Element(c.id())),
            );
        }
        if found {
            out.insert(Candidate::Foreign);
        }
        out
    }

    fn descendants(&self, set: &CandidateSet) -> CandidateSet {
        let mut out = CandidateSet::new();
        for &candidate in set {
            match candidate {
                Candidate::Outside => out.extend(self.rel.everything()),
                Candidate::Foreign => {
                    out.insert(Candidate::Foreign);
                }
                Candidate::Element(_) => {
                    if let Some(el) = self.rel.element(candidate) {
                        out.extend(
                            el.rendered_descendants()
                                .iter()
                                .map(|d| Candidate::Element(d.id())),
                        );
                    }
                }
            }
        }
        out
    }

    fn step(&self, set: &CandidateSet, combinator: Combinator) -> CandidateSet {
        match combinator {
            // Deep combinators are rewritten to `::v-deep()` before evaluation.
            Combinator::Descendant | Combinator::Deep(_) => self.descendants(set),
            Combinator::Child => {
                let mut out = CandidateSet::new();
                for &candidate in set {
                    match candidate {
                        Candidate::Outside => {
                            out.insert(Candidate::Outside);
                            out.extend(self.rel.roots());
                        }
                        Candidate::Foreign => {
                            out.insert(Candidate::Foreign);
                        }
                        Candidate::Element(_) => {
                            if let Some(el) = self.rel.element(candidate) {
                                out.extend(
                                    el.rendered_children()
                                        .iter()
                                        .map(|c| Candidate::Element(c.id())),
                                );
                            }
                        }
                    }
                }
                out
            }
            Combinator::Adjacent | Combinator::General => {
                let mut out = CandidateSet::new();
                for &candidate in set {
                    match candidate {
                        Candidate::Outside => {
                            out.insert(Candidate::Outside);
                            out.extend(self.rel.roots());
                        }
                        Candidate::Foreign => {
                            out.insert(Candidate::Foreign);
                        }
                        Candidate::Element(_) => {
                            let Some(el) = self.rel.element(candidate) else { continue };
                            let adjacent_only = combinator == Combinator::Adjacent;
                            let (_, after) = self.rel.siblings(el);
                            let mut reached = if adjacent_only {
                                adjacent(&after)
                            } else {
                                after
                            };
                            reached.extend(self.rel.across_instances(el, true, adjacent_only));
                            out.extend(reached.iter().map(|s| Candidate::Element(s.id())));
                            let follows_itself = if adjacent_only {
                                el.repeats_alone()
                            } else {
                                el.is_repeated()
                            };
                            if follows_itself {
                                out.insert(candidate);
                            }
                            if el.is_root() {
                                out.insert(Candidate::Outside);
                            }
                        }
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompiledOptions;
    use crate::selector::{parse_selector_list, SelectorSyntax};
    use crate::state::ComponentState;
    use crate::stylesheet::{StyleLang, StyleSheetBuilder};
    use vize_relief::{TemplateBuilder, TemplateTree};

    fn used(tree: &TemplateTree, selector: &str) -> bool {
        let sheet = StyleSheetBuilder::new(StyleLang::Css).build();
        let state = ComponentState::new();
        let options = CompiledOptions::default();
        let ctx = AnalysisContext::new(&sheet, tree, &state, &options);
        let list = parse_selector_list(selector, SelectorSyntax::Css, 0).unwrap();
        QueryContext::new(&ctx).query(&list[0].nodes).is_used()
    }

    fn list_tree() -> TemplateTree {
        TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "list");
                d.element("h1", |h| {
                    h.attr("class", "title");
                });
                d.element("h2", |h| {
                    h.attr("v-if", "title");
                });
                d.element("ul", |ul| {
                    ul.element("li", |li| {
                        li.attr("v-for", "i in items").attr("class", "item");
                        li.element("span", |s| {
                            s.attr("class", "label").attr("data-kind", "primary big");
                        });
                    });
                });
                d.element("p", |p| {
                    p.attr("class", "footer");
                });
            })
            .build()
    }

    #[test]
    fn test_simple_and_compound() {
        let tree = list_tree();
        assert!(used(&tree, "div.list"));
        assert!(used(&tree, "DIV"));
        assert!(!used(&tree, "section"));
        assert!(!used(&tree, ".list.item"));
        assert!(used(&tree, "*"));
    }

    #[test]
    fn test_combinators() {
        let tree = list_tree();
        assert!(used(&tree, ".list .label"));
        assert!(used(&tree, ".list > ul > .item"));
        assert!(!used(&tree, ".list > .item"));
        assert!(used(&tree, "h2 + ul"));
        assert!(used(&tree, ".list > h2 + ul ~ p"));
        // `h2` may not render, so `ul` can directly follow the title.
        assert!(used(&tree, ".title + ul"));
        assert!(!used(&tree, ".title + p"));
        assert!(!used(&tree, "p + ul"));
        // Repeated items are siblings of themselves.
        assert!(used(&tree, ".item + .item"));
        assert!(used(&tree, ".item ~ .item"));
    }

    #[test]
    fn test_outside_ancestors() {
        let tree = list_tree();
        assert!(used(&tree, ".dark .label"));
        assert!(used(&tree, ".app > .list"));
        assert!(!used(&tree, ".app > .label"));
        assert!(!used(&tree, ".dark"));
    }

    #[test]
    fn test_attributes() {
        let tree = list_tree();
        assert!(used(&tree, "[data-kind]"));
        assert!(used(&tree, "[data-kind~=big]"));
        assert!(used(&tree, "[data-kind^=prim]"));
        assert!(used(&tree, "[data-kind$=\"BIG\" i]"));
        assert!(!used(&tree, "[data-kind=big]"));
        assert!(used(&tree, "[class=\"item\"]"));
        assert!(!used(&tree, "[title]"));
    }

    #[test]
    fn test_vue_pseudo() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "wrap");
                d.element("MyInput", |_| {});
                d.element("slot", |s| {
                    s.element("span", |sp| {
                        sp.attr("class", "fallback");
                    });
                });
            })
            .build();
        assert!(used(&tree, ".wrap ::v-deep(.inner)"));
        assert!(used(&tree, ".wrap :deep(.inner .x)"));
        assert!(used(&tree, ".wrap >>> .inner"));
        assert!(used(&tree, ":slotted(.anything)"));
        assert!(used(&tree, "::v-slotted(.fallback)"));
        assert!(used(&tree, ":global(.theme) .wrap"));
        assert!(used(&tree, ":global(.theme)"));
        assert!(used(&tree, ".wrap::v-deep"));
    }

    #[test]
    fn test_template_v_for_group_siblings() {
        let tree = TemplateBuilder::new()
            .element("dl", |dl| {
                dl.element("template", |t| {
                    t.attr("v-for", "entry in entries");
                    t.element("dt", |_| {});
                    t.element("dd", |_| {});
                });
            })
            .build();
        assert!(used(&tree, "dt + dd"));
        // The next instance starts right after this one ends.
        assert!(used(&tree, "dd + dt"));
        assert!(used(&tree, "dd ~ dt"));
        assert!(used(&tree, "dd ~ dd"));
        assert!(!used(&tree, "dt + dt"));
    }

    #[test]
    fn test_deep_combinator_over_html_content() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "wrap");
                d.element("div", |inner| {
                    inner.attr("v-html", "raw");
                });
            })
            .build();
        assert!(used(&tree, ".wrap >>> .inner"));
        assert!(used(&tree, ".wrap /deep/ .inner"));
        assert!(used(&tree, ".wrap ::v-deep(.inner)"));
        assert!(!used(&tree, ".wrap .inner"));
    }

    #[test]
    fn test_deep_scope_break() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.element("span", |s| {
                    s.attr("class", "a");
                    s.element("i", |i| {
                        i.attr("class", "b");
                    });
                });
            })
            .build();
        assert!(used(&tree, "div >>> .b"));
        assert!(used(&tree, "div .x >>> .b"));
        assert!(!used(&tree, "div > .b"));
    }

    #[test]
    fn test_determinism() {
        let tree = list_tree();
        let sheet = StyleSheetBuilder::new(StyleLang::Css).build();
        let state = ComponentState::new();
        let options = CompiledOptions::default();
        let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);
        let list = parse_selector_list(".list li ~ *", SelectorSyntax::Css, 0).unwrap();
        let query = QueryContext::new(&ctx);
        let first = query.query(&list[0].nodes);
        assert_eq!(first, query.query(&list[0].nodes));
        assert_eq!(first.first_unmatched, None);
    }
}
