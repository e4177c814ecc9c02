use vize_relief::NodeId;

use crate::context::AnalysisContext;
use crate::element::ElementRef;
use crate::selector::{Combinator, PseudoSelector, SelectorNode, VuePseudo};

use super::{
    adjacent, matches_simple, rewrite_deep, Candidate, CandidateSet, Relations,
    ReverseQueryResult,
};

/// Right-to-left evaluation of resolved selectors.
pub struct ReverseQueryContext<'c, 'a> {
    rel: Relations<'c, 'a>,
    allow_outside: bool,
}

impl<'c, 'a> ReverseQueryContext<'c, 'a> {
    pub fn new(ctx: &'c AnalysisContext<'a>) -> Self {
        Self {
            rel: Relations::new(ctx),
            allow_outside: false,
        }
    }

    /// Whether ancestors and siblings outside the template may satisfy the
    /// left part of a selector.
    pub fn allow_outside(mut self, allow: bool) -> Self {
        self.allow_outside = allow;
        self
    }

    /// Evaluate with every rendered element, and DOM the template does not
    /// own, as possible subjects.
    pub fn query(&self, nodes: &[SelectorNode]) -> ReverseQueryResult {
        let mut start: CandidateSet = self
            .rel
            .ctx()
            .elements()
            .iter()
            .map(|el| Candidate::Element(el.id()))
            .collect();
        start.insert(Candidate::Foreign);
        self.query_from(nodes, start)
    }

    /// Evaluate with the given elements as possible subjects.
    pub fn query_elements(
        &self,
        nodes: &[SelectorNode],
        elements: impl IntoIterator<Item = NodeId>,
    ) -> ReverseQueryResult {
        self.query_from(nodes, elements.into_iter().map(Candidate::Element).collect())
    }

    /// Evaluate from an explicit subject set.
    ///
    /// `Foreign` in `start` is only a subject of deep, slotted and global
    /// pseudo arguments, never of the selector's own compounds.
    pub fn query_from(
        &self,
        nodes: &[SelectorNode],
        mut start: CandidateSet,
    ) -> ReverseQueryResult {
        let foreign = start.remove(&Candidate::Foreign);
        let (matched, first_unmatched) = self.eval(nodes, start, foreign);
        tracing::trace!(
            matched = matched.len(),
            ?first_unmatched,
            "reverse query"
        );
        ReverseQueryResult {
            matched,
            first_unmatched,
        }
    }

    fn eval(
        &self,
        nodes: &[SelectorNode],
        mut set: CandidateSet,
        foreign: bool,
    ) -> (CandidateSet, Option<usize>) {
        let last = nodes.len().saturating_sub(1);
        let (nodes, deep_at) = rewrite_deep(nodes);
        for (i, node) in nodes.iter().enumerate().rev() {
            set = match node {
                SelectorNode::Combinator(c) => self.step(&set, c.kind),
                SelectorNode::Pseudo(pseudo) => self.pseudo(pseudo, set, foreign),
                simple => {
                    let ctx = self.rel.ctx();
                    set.retain(|&c| matches_simple(ctx, c, simple));
                    set
                }
            };
            if set.is_empty() {
                // A combinator leaves nothing: the compound on its left fails.
                // A rewritten deep pseudo fails on the rightmost compound.
                let at = match node {
                    _ if deep_at == Some(i) => last,
                    SelectorNode::Combinator(_) => i.saturating_sub(1),
                    _ => i,
                };
                return (set, Some(at));
            }
        }
        (set, None)
    }

    fn pseudo(&self, pseudo: &PseudoSelector, set: CandidateSet, foreign: bool) -> CandidateSet {
        let Some(kind) = pseudo.vue_pseudo().filter(|_| pseudo.has_selector_args()) else {
            return set;
        };
        let mut start = set;
        let reaches_foreign = foreign
            && match kind {
                VuePseudo::Deep => !self.rel.ctx().foreign_anchors().is_empty(),
                VuePseudo::Slotted => self.has_slots(),
                VuePseudo::Global => true,
            };
        if reaches_foreign {
            start.insert(Candidate::Foreign);
        }
        let subjects: CandidateSet = pseudo
            .selectors()
            .iter()
            .flat_map(|sel| self.eval(&sel.nodes, start.clone(), foreign).0)
            .collect();
        if subjects.is_empty() {
            return subjects;
        }
        match kind {
            // The part outside the pseudo carries the scope attribute, so it
            // is never foreign.
            VuePseudo::Deep => {
                let mut widened = self.ancestors(&subjects, true);
                widened.remove(&Candidate::Foreign);
                widened
            }
            VuePseudo::Slotted => self.slot_hosts(&subjects),
            VuePseudo::Global => self.admit_outside(self.rel.everything()),
        }
    }

    fn has_slots(&self) -> bool {
        let ctx = self.rel.ctx();
        ctx.template()
            .ids()
            .filter_map(|id| ctx.element(id))
            .any(|el| el.is_slot())
    }

    fn admit_outside(&self, mut set: CandidateSet) -> CandidateSet {
        if !self.allow_outside {
            set.remove(&Candidate::Outside);
        }
        set
    }

    fn insert_outside(&self, out: &mut CandidateSet) {
        if self.allow_outside {
            out.insert(Candidate::Outside);
        }
    }

    /// Rendered elements under which a `<slot>` holding the subjects sits.
    fn slot_hosts(&self, subjects: &CandidateSet) -> CandidateSet {
        let ctx = self.rel.ctx();
        let mut out = CandidateSet::new();
        for &subject in subjects {
            match subject {
                Candidate::Element(_) => {
                    let slot = self.rel.element(subject).and_then(|el| el.slot_ancestor());
                    if let Some(slot) = slot {
                        self.extend_slot_ancestors(slot, &mut out);
                    }
                }
                Candidate::Foreign => {
                    for slot in ctx
                        .template()
                        .ids()
                        .filter_map(|id| ctx.element(id))
                        .filter(|el| el.is_slot())
                    {
                        self.extend_slot_ancestors(slot, &mut out);
                    }
                }
                Candidate::Outside => self.insert_outside(&mut out),
            }
        }
        out
    }

    fn extend_slot_ancestors(&self, slot: ElementRef<'a>, out: &mut CandidateSet) {
        out.extend(
            slot.rendered_ancestors()
                .iter()
                .map(|a| Candidate::Element(a.id())),
        );
        self.insert_outside(out);
    }

    /// Ancestors of every candidate, optionally with the candidates themselves.
    fn ancestors(&self, set: &CandidateSet, or_self: bool) -> CandidateSet {
        let mut out = CandidateSet::new();
        for &candidate in set {
            match candidate {
                Candidate::Outside => self.insert_outside(&mut out),
                Candidate::Foreign => {
                    out.insert(Candidate::Foreign);
                    let hosts = self.foreign_hosts();
                    out.extend(self.ancestors(&hosts, true));
                }
                Candidate::Element(_) => {
                    let Some(el) = self.rel.element(candidate) else { continue };
                    if or_self {
                        out.insert(candidate);
                    }
                    out.extend(
                        el.rendered_ancestors()
                            .iter()
                            .map(|a| Candidate::Element(a.id())),
                    );
                    self.insert_outside(&mut out);
                }
            }
        }
        out
    }

    fn foreign_hosts(&self) -> CandidateSet {
        let hosts = self.rel.foreign_hosts();
        self.admit_outside(hosts)
    }

    fn step(&self, set: &CandidateSet, combinator: Combinator) -> CandidateSet {
        match combinator {
            // Deep combinators are rewritten to `::v-deep()` before evaluation.
            Combinator::Descendant | Combinator::Deep(_) => self.ancestors(set, false),
            Combinator::Child => {
                let mut out = CandidateSet::new();
                for &candidate in set {
                    match candidate {
                        Candidate::Outside => self.insert_outside(&mut out),
                        Candidate::Foreign => {
                            out.insert(Candidate::Foreign);
                            out.extend(self.foreign_hosts());
                        }
                        Candidate::Element(_) => {
                            let Some(el) = self.rel.element(candidate) else { continue };
                            match el.rendered_parent() {
                                Some(parent) => {
                                    out.insert(Candidate::Element(parent.id()));
                                }
                                None => self.insert_outside(&mut out),
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
                        Candidate::Outside => self.insert_outside(&mut out),
                        Candidate::Foreign => {
                            out.insert(Candidate::Foreign);
                        }
                        Candidate::Element(_) => {
                            let Some(el) = self.rel.element(candidate) else { continue };
                            let adjacent_only = combinator == Combinator::Adjacent;
                            let (before, _) = self.rel.siblings(el);
                            let mut reached = if adjacent_only {
                                // `p + e` holds when everything between may be absent.
                                adjacent(&before)
                            } else {
                                before
                            };
                            reached.extend(self.rel.across_instances(el, false, adjacent_only));
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
                                self.insert_outside(&mut out);
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

    fn reverse(tree: &TemplateTree, selector: &str, allow_outside: bool) -> ReverseQueryResult {
        let sheet = StyleSheetBuilder::new(StyleLang::Css).build();
        let state = ComponentState::new();
        let options = CompiledOptions::default();
        let ctx = AnalysisContext::new(&sheet, tree, &state, &options);
        let list = parse_selector_list(selector, SelectorSyntax::Css, 0).unwrap();
        ReverseQueryContext::new(&ctx)
            .allow_outside(allow_outside)
            .query(&list[0].nodes)
    }

    fn card_tree() -> TemplateTree {
        TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "card");
                d.element("header", |h| {
                    h.attr("class", "head");
                });
                d.element("p", |p| {
                    p.attr("class", "body");
                    p.element("MyLink", |_| {});
                });
            })
            .build()
    }

    #[test]
    fn test_reverse_combinators() {
        let tree = card_tree();
        assert!(reverse(&tree, ".card .body", false).is_matched());
        assert!(reverse(&tree, ".card > .head + .body", false).is_matched());
        assert!(reverse(&tree, ".head ~ p", false).is_matched());
        assert!(!reverse(&tree, ".body + .head", false).is_matched());
    }

    #[test]
    fn test_first_unmatched_prefix() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "card");
                d.element("p", |p| {
                    p.attr("class", "body");
                });
            })
            .build();
        // Nothing encloses `.card`, so `.dark` fails.
        let result = reverse(&tree, ".dark .card .body", false);
        assert_eq!(result.first_unmatched, Some(0));
        assert!(result.matched.is_empty());

        let result = reverse(&tree, ".card .missing", false);
        assert_eq!(result.first_unmatched, Some(2));
    }

    #[test]
    fn test_outside_admission() {
        let tree = card_tree();
        assert!(!reverse(&tree, ".dark .card", false).is_matched());
        let result = reverse(&tree, ".dark .card", true);
        assert!(result.is_matched());
        assert!(result.matched.contains(&Candidate::Outside));
    }

    #[test]
    fn test_reverse_deep() {
        let tree = card_tree();
        let result = reverse(&tree, ".card ::v-deep(.link-icon)", false);
        assert!(result.is_matched());
        assert!(!reverse(&tree, ".head ::v-deep(.body)", false).is_matched());
    }

    #[test]
    fn test_reverse_deep_combinator_matches_pseudo() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "wrap");
                d.element("div", |inner| {
                    inner.attr("v-html", "raw");
                });
            })
            .build();
        assert!(reverse(&tree, ".wrap ::v-deep(.inner)", false).is_matched());
        assert!(reverse(&tree, ".wrap >>> .inner", false).is_matched());
        assert!(reverse(&tree, ".wrap /deep/ .inner", false).is_matched());

        // Failing left of the combinator is still reported there.
        let result = reverse(&tree, ".page >>> .inner", false);
        assert_eq!(result.first_unmatched, Some(0));
    }

    #[test]
    fn test_reverse_template_group_siblings() {
        let tree = TemplateBuilder::new()
            .element("dl", |dl| {
                dl.element("template", |t| {
                    t.attr("v-for", "entry in entries");
                    t.element("dt", |_| {});
                    t.element("dd", |_| {});
                });
            })
            .build();
        assert!(reverse(&tree, "dt + dd", false).is_matched());
        assert!(reverse(&tree, "dd + dt", false).is_matched());
        assert!(reverse(&tree, "dd ~ dt", false).is_matched());
        assert!(!reverse(&tree, "dt + dt", false).is_matched());
    }

    #[test]
    fn test_query_elements() {
        let tree = card_tree();
        let sheet = StyleSheetBuilder::new(StyleLang::Css).build();
        let state = ComponentState::new();
        let options = CompiledOptions::default();
        let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);
        let head = ctx.elements()[1].id();
        let list = parse_selector_list(".card > *", SelectorSyntax::Css, 0).unwrap();
        let query = ReverseQueryContext::new(&ctx);
        let result = query.query_elements(&list[0].nodes, [head]);
        assert_eq!(result.elements().collect::<Vec<_>>(), vec![ctx.elements()[0].id()]);
    }
}
