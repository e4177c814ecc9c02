//! Selector queries against the virtual element tree.
//!
//! A resolved selector is evaluated over sets of [`Candidate`]s. Besides the
//! template's own elements there are two stand-ins:
//!
//! - [`Candidate::Outside`] is every ancestor the component is mounted under.
//!   Parent components may put any class on the root element, so it passes
//!   every simple selector.
//! - [`Candidate::Foreign`] is DOM that the template does not own: child
//!   component internals, slot content and `v-html`. Only deep, slotted and
//!   global selectors reach it.
//!
//! [`QueryContext`] reads a selector left to right, [`ReverseQueryContext`]
//! right to left. Both use the same relations.

mod forward;
mod matcher;
mod reverse;

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use vize_carton::CompactString;
use vize_relief::NodeId;

use crate::context::{AnalysisContext, ForeignAnchor};
use crate::element::ElementRef;
use crate::selector::{Combinator, PseudoArgs, PseudoSelector, Selector, SelectorNode};
use crate::span::Span;

pub use forward::QueryContext;
pub use matcher::matches_simple;
pub use reverse::ReverseQueryContext;

/// One member of a candidate set.
///
/// Ordered as `Outside`, elements in document order, `Foreign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Candidate {
    Outside,
    Element(NodeId),
    Foreign,
}

impl Candidate {
    #[inline]
    pub fn as_element(self) -> Option<NodeId> {
        match self {
            Self::Element(id) => Some(id),
            _ => None,
        }
    }
}

pub type CandidateSet = BTreeSet<Candidate>;

/// Result of a forward query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Candidates matched by the whole selector.
    pub matched: CandidateSet,
    /// Index of the node at which no candidate was left.
    pub first_unmatched: Option<usize>,
}

impl QueryResult {
    /// Whether the selector can style something this component renders.
    ///
    /// `Outside` alone does not count: the scope attribute is only present on
    /// the component's own elements.
    pub fn is_used(&self) -> bool {
        self.matched
            .iter()
            .any(|c| matches!(c, Candidate::Element(_) | Candidate::Foreign))
    }

    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.matched.iter().filter_map(|c| c.as_element())
    }
}

/// Result of a reverse query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseQueryResult {
    /// Candidates matched by the leftmost compound.
    pub matched: CandidateSet,
    /// Index of the node at which no candidate was left, reading right to left.
    pub first_unmatched: Option<usize>,
}

impl ReverseQueryResult {
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.first_unmatched.is_none() && !self.matched.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.matched.iter().filter_map(|c| c.as_element())
    }
}

/// Tree relations shared by both directions.
pub(crate) struct Relations<'c, 'a> {
    ctx: &'c AnalysisContext<'a>,
}

impl<'c, 'a> Relations<'c, 'a> {
    pub(crate) fn new(ctx: &'c AnalysisContext<'a>) -> Self {
        Self { ctx }
    }

    #[inline]
    pub(crate) fn ctx(&self) -> &'c AnalysisContext<'a> {
        self.ctx
    }

    pub(crate) fn element(&self, candidate: Candidate) -> Option<ElementRef<'a>> {
        candidate.as_element().and_then(|id| self.ctx.element(id))
    }

    /// Every rendered element plus `Outside`.
    pub(crate) fn everything(&self) -> CandidateSet {
        let mut out: CandidateSet = self
            .ctx
            .elements()
            .iter()
            .map(|el| Candidate::Element(el.id()))
            .collect();
        out.insert(Candidate::Outside);
        out
    }

    pub(crate) fn roots(&self) -> impl Iterator<Item = Candidate> + 'c {
        self.ctx.roots().iter().map(|el| Candidate::Element(el.id()))
    }

    /// Whether foreign DOM may appear inside the given set (descendants
    /// included).
    pub(crate) fn reaches_foreign(&self, set: &CandidateSet) -> bool {
        if set.contains(&Candidate::Foreign) {
            return true;
        }
        let outside = set.contains(&Candidate::Outside);
        self.ctx.foreign_anchors().iter().any(|anchor| match anchor {
            ForeignAnchor::Root => outside,
            ForeignAnchor::Element(el) => {
                outside
                    || set.contains(&Candidate::Element(el.id()))
                    || el
                        .rendered_ancestors()
                        .iter()
                        .any(|a| set.contains(&Candidate::Element(a.id())))
            }
        })
    }

    /// Rendered elements hosting foreign DOM, plus `Outside` for root slots.
    pub(crate) fn foreign_hosts(&self) -> CandidateSet {
        self.ctx
            .foreign_anchors()
            .iter()
            .map(|anchor| match anchor {
                ForeignAnchor::Root => Candidate::Outside,
                ForeignAnchor::Element(el) => Candidate::Element(el.id()),
            })
            .collect()
    }

    /// Members of the neighbouring instance of a repeating `<template v-for>`
    /// that a sibling combinator reaches from `el`, nearest first.
    ///
    /// `following` looks at the next instance, otherwise at the previous one.
    /// With `adjacent_only` the result is what `+` reaches: the instance edge,
    /// and only when every member between `el` and that edge may be absent.
    pub(crate) fn across_instances(
        &self,
        el: ElementRef<'a>,
        following: bool,
        adjacent_only: bool,
    ) -> Vec<ElementRef<'a>> {
        let Some(group) = el.repeating_template() else {
            return Vec::new();
        };
        let mut members = group.rendered_children();
        if !following {
            members.reverse();
        }
        if !adjacent_only {
            return members;
        }
        let Some(pos) = members.iter().position(|m| m.id() == el.id()) else {
            return Vec::new();
        };
        if members[pos + 1..].iter().all(|m| m.is_conditional()) {
            adjacent(&members)
        } else {
            Vec::new()
        }
    }

    /// Siblings of an element split around it: `(before, after)`, nearest first.
    pub(crate) fn siblings(
        &self,
        el: ElementRef<'a>,
    ) -> (Vec<ElementRef<'a>>, Vec<ElementRef<'a>>) {
        let siblings = el.rendered_siblings();
        let Some(pos) = siblings.iter().position(|s| s.id() == el.id()) else {
            return (Vec::new(), Vec::new());
        };
        let mut before = siblings[..pos].to_vec();
        before.reverse();
        (before, siblings[pos + 1..].to_vec())
    }
}

/// Rewrite the first `a >>> b` or `a /deep/ b` of a selector to
/// `a::v-deep(b)`, the form both query directions evaluate.
///
/// Vue scopes the compound left of a deep combinator and leaves everything
/// after it unscoped, exactly as it does for `::v-deep(...)`. Returns the
/// index of the rewritten combinator, which the pseudo takes over. Deep
/// combinators further right are rewritten when the pseudo argument is
/// evaluated.
pub(crate) fn rewrite_deep(nodes: &[SelectorNode]) -> (Cow<'_, [SelectorNode]>, Option<usize>) {
    let deep_at = nodes
        .iter()
        .position(|n| matches!(n.as_combinator(), Some(Combinator::Deep(_))));
    let Some(at) = deep_at.filter(|&at| at + 1 < nodes.len()) else {
        return (Cow::Borrowed(nodes), None);
    };
    let rest = &nodes[at + 1..];
    let rest_span = rest[0].span().merge(rest[rest.len() - 1].span());
    let argument = Selector::new(rest.to_vec(), rest_span);

    let mut out = nodes[..at].to_vec();
    out.push(SelectorNode::Pseudo(PseudoSelector {
        name: CompactString::new("::v-deep"),
        args: PseudoArgs::Selectors(Arc::from(vec![argument])),
        span: Span::new(nodes[at].span().start, rest_span.end),
    }));
    (Cow::Owned(out), Some(at))
}

/// Siblings reachable by `+`: the nearest one, and past it as long as the
/// skipped siblings may not be rendered.
pub(crate) fn adjacent<'a>(ordered: &[ElementRef<'a>]) -> Vec<ElementRef<'a>> {
    let mut out = Vec::new();
    for el in ordered {
        out.push(*el);
        if !el.is_conditional() {
            break;
        }
    }
    out
}
