//! Per-file analysis context.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use vize_carton::{CompactString, FxHashMap, FxHashSet};
use vize_relief::{NodeId, TemplateTree};

use crate::element::{rendered_elements, rendered_roots, AttrValue, ElementRef};
use crate::options::CompiledOptions;
use crate::resolver::{resolve_stylesheet, ResolvedSelector};
use crate::state::ComponentState;
use crate::stylesheet::StyleSheet;

/// Where DOM not written in the template may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignAnchor<'a> {
    /// Under this rendered element.
    Element(ElementRef<'a>),
    /// At the top of the component (a root-level `<slot>`).
    Root,
}

/// Everything known about one single-file component, with lazily computed
/// and memoized derived data. One context is used for exactly one file.
pub struct AnalysisContext<'a> {
    stylesheet: &'a StyleSheet,
    template: &'a TemplateTree,
    state: &'a ComponentState,
    options: &'a CompiledOptions,
    resolved: OnceCell<Vec<ResolvedSelector>>,
    elements: OnceCell<Vec<ElementRef<'a>>>,
    roots: OnceCell<Vec<ElementRef<'a>>>,
    anchors: OnceCell<Vec<ForeignAnchor<'a>>>,
    doc_classes: OnceCell<FxHashSet<CompactString>>,
    classes: RefCell<FxHashMap<NodeId, Rc<[AttrValue]>>>,
    ids: RefCell<FxHashMap<NodeId, Rc<[AttrValue]>>>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        stylesheet: &'a StyleSheet,
        template: &'a TemplateTree,
        state: &'a ComponentState,
        options: &'a CompiledOptions,
    ) -> Self {
        Self {
            stylesheet,
            template,
            state,
            options,
            resolved: OnceCell::new(),
            elements: OnceCell::new(),
            roots: OnceCell::new(),
            anchors: OnceCell::new(),
            doc_classes: OnceCell::new(),
            classes: RefCell::default(),
            ids: RefCell::default(),
        }
    }

    #[inline]
    pub fn stylesheet(&self) -> &'a StyleSheet {
        self.stylesheet
    }

    #[inline]
    pub fn template(&self) -> &'a TemplateTree {
        self.template
    }

    #[inline]
    pub fn state(&self) -> &'a ComponentState {
        self.state
    }

    #[inline]
    pub fn options(&self) -> &'a CompiledOptions {
        self.options
    }

    /// Whether the stylesheet is subject to scoped analysis.
    #[inline]
    pub fn is_target(&self) -> bool {
        self.stylesheet.scoped || self.options.check_unscoped
    }

    /// Resolved selectors of the stylesheet, in document order.
    pub fn resolved_selectors(&self) -> &[ResolvedSelector] {
        self.resolved.get_or_init(|| resolve_stylesheet(self.stylesheet))
    }

    /// Rendered elements, in document order.
    pub fn elements(&self) -> &[ElementRef<'a>] {
        self.elements.get_or_init(|| rendered_elements(self.template))
    }

    /// Top-level rendered elements.
    pub fn roots(&self) -> &[ElementRef<'a>] {
        self.roots.get_or_init(|| rendered_roots(self.template))
    }

    #[inline]
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'a>> {
        ElementRef::new(self.template, id)
    }

    /// Places under which foreign DOM may appear.
    pub fn foreign_anchors(&self) -> &[ForeignAnchor<'a>] {
        self.anchors.get_or_init(|| {
            let mut anchors: Vec<_> = self
                .template
                .ids()
                .filter_map(|id| ElementRef::new(self.template, id))
                .filter(|el| el.hosts_foreign_content())
                .map(|el| {
                    if el.is_structural() {
                        el.rendered_parent()
                            .map_or(ForeignAnchor::Root, ForeignAnchor::Element)
                    } else {
                        ForeignAnchor::Element(el)
                    }
                })
                .collect();
            anchors.dedup();
            anchors
        })
    }

    /// Classes captured from documentation comments.
    pub fn doc_classes(&self) -> &FxHashSet<CompactString> {
        self.doc_classes.get_or_init(|| {
            self.options
                .captured_classes(self.state.doc_comments().iter().map(CompactString::as_str))
        })
    }

    pub fn class_values(&self, el: ElementRef<'a>) -> Rc<[AttrValue]> {
        self.classes
            .borrow_mut()
            .entry(el.id())
            .or_insert_with(|| el.class_values(self.state, self.options).into())
            .clone()
    }

    pub fn id_values(&self, el: ElementRef<'a>) -> Rc<[AttrValue]> {
        self.ids
            .borrow_mut()
            .entry(el.id())
            .or_insert_with(|| el.id_values(self.state).into())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::{StyleLang, StyleSheetBuilder};
    use vize_relief::TemplateBuilder;

    #[test]
    fn test_memoized_values() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .scoped(true)
            .rule(".a", |_| {})
            .build();
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "a");
                d.element("slot", |_| {});
            })
            .build();
        let state = ComponentState::new();
        let options = CompiledOptions::default();
        let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);

        assert!(ctx.is_target());
        assert_eq!(ctx.resolved_selectors().len(), 1);
        let div = ctx.elements()[0];
        let first = ctx.class_values(div);
        assert!(Rc::ptr_eq(&first, &ctx.class_values(div)));
        assert_eq!(ctx.foreign_anchors(), &[ForeignAnchor::Element(div)]);
    }
}
