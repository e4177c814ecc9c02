//! Virtual element tree.
//!
//! [`ElementRef`] is a read-only view over one element of a
//! [`TemplateTree`] that answers the questions selector matching asks: which
//! element is rendered as the parent of this one, which classes it may carry,
//! whether it repeats, and so on.
//!
//! Built-in structural elements (`<template>`, `<slot>`, `<transition>`,
//! `<transition-group>` without `tag`, `<keep-alive>`, `<teleport>`,
//! `<suspense>`) do not produce DOM of their own, so they are skipped when
//! walking rendered parents and children.

use vize_carton::{camelize, hyphenate, CompactString, FxHashSet};
use vize_relief::{ElementNode, ElementType, NodeId, TemplateTree};

use crate::expression::{LogicalOp, ObjectEntry, ValueExpr};
use crate::options::CompiledOptions;
use crate::state::ComponentState;
use crate::template::Template;

/// A possible value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Static(Template),
    /// Cannot be determined; matches anything.
    Unknown,
}

impl AttrValue {
    #[inline]
    pub fn matches(&self, value: &Template) -> bool {
        match self {
            Self::Static(own) => own.matches(value),
            Self::Unknown => true,
        }
    }

    #[inline]
    pub fn as_template(&self) -> Option<&Template> {
        match self {
            Self::Static(t) => Some(t),
            Self::Unknown => None,
        }
    }
}

/// Built-in components that matter to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltIn {
    Template,
    Slot,
    Transition,
    TransitionGroup,
    KeepAlive,
    Teleport,
    Suspense,
    /// `<component :is>`
    Dynamic,
}

impl BuiltIn {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = hyphenate(tag);
        Some(match tag.as_str() {
            "template" => Self::Template,
            "slot" => Self::Slot,
            "transition" => Self::Transition,
            "transition-group" => Self::TransitionGroup,
            "keep-alive" => Self::KeepAlive,
            "teleport" => Self::Teleport,
            "suspense" => Self::Suspense,
            "component" => Self::Dynamic,
            _ => return None,
        })
    }

    #[inline]
    pub fn is_transition(self) -> bool {
        matches!(self, Self::Transition | Self::TransitionGroup)
    }
}

const TRANSITION_STAGES: &[&str] = &[
    "enter",
    "enter-from",
    "enter-active",
    "enter-to",
    "leave",
    "leave-from",
    "leave-active",
    "leave-to",
    "appear",
    "appear-from",
    "appear-active",
    "appear-to",
];

const TRANSITION_CLASS_PROPS: &[&str] = &[
    "enter-class",
    "enter-from-class",
    "enter-active-class",
    "enter-to-class",
    "leave-class",
    "leave-from-class",
    "leave-active-class",
    "leave-to-class",
    "appear-class",
    "appear-from-class",
    "appear-active-class",
    "appear-to-class",
    "move-class",
];

/// View over one element of a template tree.
#[derive(Clone, Copy)]
pub struct ElementRef<'t> {
    tree: &'t TemplateTree,
    id: NodeId,
    node: &'t ElementNode,
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for ElementRef<'_> {}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}#{}>", self.tag(), self.id.as_u32())
    }
}

impl<'t> ElementRef<'t> {
    /// `None` when `id` is not an element.
    pub fn new(tree: &'t TemplateTree, id: NodeId) -> Option<Self> {
        tree.element(id).map(|node| Self { tree, id, node })
    }

    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn node(self) -> &'t ElementNode {
        self.node
    }

    #[inline]
    pub fn tree(self) -> &'t TemplateTree {
        self.tree
    }

    #[inline]
    pub fn tag(self) -> &'t str {
        self.node.tag.as_str()
    }

    #[inline]
    pub fn builtin(self) -> Option<BuiltIn> {
        BuiltIn::from_tag(self.tag())
    }

    /// Element parent in the source tree.
    pub fn parent(self) -> Option<ElementRef<'t>> {
        self.node.parent.and_then(|p| Self::new(self.tree, p))
    }

    /// Element children in the source tree.
    pub fn children(self) -> impl Iterator<Item = ElementRef<'t>> + 't {
        let tree = self.tree;
        self.node
            .children
            .iter()
            .filter_map(move |&id| Self::new(tree, id))
    }

    #[inline]
    pub fn is_slot(self) -> bool {
        self.node.tag_type == ElementType::Slot
    }

    /// Whether the element renders no DOM of its own.
    pub fn is_structural(self) -> bool {
        match self.builtin() {
            Some(BuiltIn::TransitionGroup) => self.static_or_bound("tag").is_none(),
            Some(BuiltIn::Dynamic) | None => false,
            Some(_) => true,
        }
    }

    /// Whether the rendered root of the element is defined elsewhere.
    pub fn is_component(self) -> bool {
        self.node.tag_type == ElementType::Component
            && !matches!(
                self.builtin(),
                Some(BuiltIn::TransitionGroup | BuiltIn::Template | BuiltIn::Slot)
            )
            && !self.is_structural()
    }

    /// Tag name as rendered, `None` for structural elements.
    ///
    /// `<transition-group tag="ul">` renders `ul`.
    pub fn rendered_tag(self) -> Option<Template> {
        if self.is_structural() {
            return None;
        }
        if self.builtin() == Some(BuiltIn::TransitionGroup) {
            let values = self.static_or_bound("tag")?;
            return Some(match values {
                AttrValue::Static(t) => t,
                AttrValue::Unknown => Template::interpolation("tag"),
            });
        }
        Some(Template::of(self.tag()))
    }

    /// Nearest ancestor that renders DOM.
    pub fn rendered_parent(self) -> Option<ElementRef<'t>> {
        let mut current = self.parent();
        while let Some(el) = current {
            if !el.is_structural() {
                return Some(el);
            }
            current = el.parent();
        }
        None
    }

    /// Whether the element is at the top of the rendered component.
    #[inline]
    pub fn is_root(self) -> bool {
        self.rendered_parent().is_none()
    }

    /// Children as rendered, with structural elements flattened and slot
    /// fallback content entered.
    pub fn rendered_children(self) -> Vec<ElementRef<'t>> {
        let mut out = Vec::new();
        flatten_rendered(self.children(), &mut out);
        out
    }

    /// All strict rendered descendants, in document order.
    pub fn rendered_descendants(self) -> Vec<ElementRef<'t>> {
        let mut out = Vec::new();
        let mut stack = self.rendered_children();
        stack.reverse();
        while let Some(el) = stack.pop() {
            out.push(el);
            let mut children = el.rendered_children();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// All strict rendered ancestors, nearest first.
    pub fn rendered_ancestors(self) -> Vec<ElementRef<'t>> {
        let mut out = Vec::new();
        let mut current = self.rendered_parent();
        while let Some(el) = current {
            out.push(el);
            current = el.rendered_parent();
        }
        out
    }

    /// The rendered sibling list this element belongs to, itself included.
    pub fn rendered_siblings(self) -> Vec<ElementRef<'t>> {
        match self.rendered_parent() {
            Some(parent) => parent.rendered_children(),
            None => rendered_roots(self.tree),
        }
    }

    /// Whether the element is rendered under a `<slot>` as fallback content.
    pub fn in_slot(self) -> bool {
        self.slot_ancestor().is_some()
    }

    /// Nearest `<slot>` ancestor.
    pub fn slot_ancestor(self) -> Option<ElementRef<'t>> {
        let mut current = self.parent();
        while let Some(el) = current {
            if el.is_slot() {
                return Some(el);
            }
            current = el.parent();
        }
        None
    }

    /// Own `v-for`, or a `<template v-for>` between this element and its
    /// rendered parent.
    pub fn is_repeated(self) -> bool {
        if self.node.has_directive("for") {
            return true;
        }
        let mut current = self.parent();
        while let Some(el) = current {
            if !el.is_structural() {
                return false;
            }
            if el.node.has_directive("for") {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// Whether the element directly follows its own next copy: own `v-for`,
    /// or repeated by a wrapper that holds nothing else.
    pub fn repeats_alone(self) -> bool {
        if self.node.has_directive("for") {
            return true;
        }
        match self.repeating_template() {
            Some(group) => group.rendered_children().len() == 1,
            None => self.is_repeated(),
        }
    }

    /// Outermost `<template v-for>` between this element and its rendered
    /// parent. Its children repeat as a group.
    pub fn repeating_template(self) -> Option<ElementRef<'t>> {
        let mut found = None;
        let mut current = self.parent();
        while let Some(el) = current.filter(|el| el.is_structural()) {
            if el.builtin() == Some(BuiltIn::Template) && el.node.has_directive("for") {
                found = Some(el);
            }
            current = el.parent();
        }
        found
    }

    /// `v-if`, `v-else-if` or `v-else`, on the element or a structural
    /// wrapper up to the rendered parent.
    pub fn is_conditional(self) -> bool {
        let conditional = |el: ElementRef<'_>| {
            el.node.has_directive("if")
                || el.node.has_directive("else-if")
                || el.node.has_directive("else")
        };
        if conditional(self) {
            return true;
        }
        let mut current = self.parent();
        while let Some(el) = current.filter(|el| el.is_structural()) {
            if conditional(el) {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// Whether DOM not written in this template may appear under the element:
    /// child component internals, slot content, `v-html`.
    pub fn hosts_foreign_content(self) -> bool {
        self.is_component() || self.is_slot() || self.node.has_directive("html")
    }

    /// Nearest `<transition>` / `<transition-group>` that animates this element.
    pub fn enclosing_transition(self) -> Option<ElementRef<'t>> {
        let mut current = self.parent();
        while let Some(el) = current {
            if el.builtin().is_some_and(BuiltIn::is_transition) {
                return Some(el);
            }
            if !el.is_structural() {
                return None;
            }
            current = el.parent();
        }
        None
    }

    // =========================================================================
    // Attribute values
    // =========================================================================

    /// Possible values of an attribute. Empty when the attribute is absent.
    pub fn attribute_values(self, name: &str, state: &ComponentState) -> Vec<AttrValue> {
        let mut out = Vec::new();
        for attr in self.node.attributes() {
            if attr.name.eq_ignore_ascii_case(name) {
                out.push(AttrValue::Static(Template::of(attr.value_str())));
            }
        }
        for dir in self.node.directives().filter(|d| d.name == "bind") {
            if dir.has_dynamic_arg() {
                out.push(AttrValue::Unknown);
                continue;
            }
            let value = dir.exp_str().map(ValueExpr::parse);
            match dir.static_arg() {
                Some(arg) if arg.eq_ignore_ascii_case(name) => match &value {
                    Some(value) => {
                        collect_scalars(value, state, &mut FxHashSet::default(), &mut out)
                    }
                    // Same-name shorthand `:id`
                    None => collect_property(name, state, &mut out, collect_scalars),
                },
                Some(_) => {}
                None => {
                    if let Some(value) = &value {
                        spread_entry(value, name, state, &mut out, collect_scalars);
                    }
                }
            }
        }
        out
    }

    /// Possible `id` values.
    #[inline]
    pub fn id_values(self, state: &ComponentState) -> Vec<AttrValue> {
        self.attribute_values("id", state)
    }

    /// Possible class names, one per value.
    pub fn class_values(self, state: &ComponentState, options: &CompiledOptions) -> Vec<AttrValue> {
        let mut out = Vec::new();
        let mut names: Vec<&str> = vec!["class"];
        names.extend(options.extra_class_attributes.iter().map(CompactString::as_str));

        for name in &names {
            for attr in self.node.attributes() {
                if attr.name.eq_ignore_ascii_case(name) {
                    push_class_tokens(&Template::of(attr.value_str()), &mut out);
                }
            }
        }
        for dir in self.node.directives().filter(|d| d.name == "bind") {
            if dir.has_dynamic_arg() {
                out.push(AttrValue::Unknown);
                continue;
            }
            let value = dir.exp_str().map(ValueExpr::parse);
            match dir.static_arg() {
                Some(arg) if names.iter().any(|n| arg.eq_ignore_ascii_case(n)) => match &value {
                    Some(value) => {
                        collect_classes(value, state, &mut FxHashSet::default(), &mut out)
                    }
                    None => collect_property(arg, state, &mut out, collect_classes),
                },
                Some(_) => {}
                None => {
                    if let Some(value) = &value {
                        for name in &names {
                            spread_entry(value, name, state, &mut out, collect_classes);
                        }
                    }
                }
            }
        }

        if let Some(ref_name) = self.node.find_attribute("ref").map(|a| a.value_str()) {
            for value in state.ref_class_list(ref_name) {
                collect_classes(value, state, &mut FxHashSet::default(), &mut out);
            }
        }

        out.extend(self.transition_classes(state));
        out
    }

    /// Classes applied by an enclosing transition.
    pub fn transition_classes(self, state: &ComponentState) -> Vec<AttrValue> {
        let Some(transition) = self.enclosing_transition() else {
            return Vec::new();
        };
        let mut out = Vec::new();

        let mut names = transition.attribute_values("name", state);
        if names.is_empty() {
            names.push(AttrValue::Static(Template::of("v")));
        }
        let group = transition.builtin() == Some(BuiltIn::TransitionGroup);
        for name in &names {
            let AttrValue::Static(name) = name else {
                out.push(AttrValue::Unknown);
                continue;
            };
            let stages = TRANSITION_STAGES
                .iter()
                .chain(group.then_some(&"move"));
            for stage in stages {
                out.push(AttrValue::Static(
                    name.concat(&Template::of(&format!("-{stage}"))),
                ));
            }
        }

        for attr in transition.node.attributes() {
            if TRANSITION_CLASS_PROPS.contains(&hyphenate(&attr.name).as_str()) {
                push_class_tokens(&Template::of(attr.value_str()), &mut out);
            }
        }
        for dir in transition.node.directives().filter(|d| d.name == "bind") {
            let Some(arg) = dir.static_arg() else { continue };
            if !TRANSITION_CLASS_PROPS.contains(&hyphenate(arg).as_str()) {
                continue;
            }
            match dir.exp_str() {
                Some(exp) => collect_classes(
                    &ValueExpr::parse(exp),
                    state,
                    &mut FxHashSet::default(),
                    &mut out,
                ),
                None => out.push(AttrValue::Unknown),
            }
        }
        out
    }

    /// Static or bound single value of a prop, ignoring component state.
    fn static_or_bound(self, name: &str) -> Option<AttrValue> {
        if let Some(attr) = self.node.find_attribute(name) {
            return Some(AttrValue::Static(Template::of(attr.value_str())));
        }
        let dir = self.node.find_bind(name)?;
        Some(match dir.exp_str().map(ValueExpr::parse) {
            Some(ValueExpr::Str(t)) => AttrValue::Static(t),
            _ => AttrValue::Unknown,
        })
    }
}

/// Top-level rendered elements of a tree.
pub fn rendered_roots(tree: &TemplateTree) -> Vec<ElementRef<'_>> {
    let mut out = Vec::new();
    flatten_rendered(
        tree.roots().iter().filter_map(|&id| ElementRef::new(tree, id)),
        &mut out,
    );
    out
}

/// Every rendered element of a tree, in document order.
pub fn rendered_elements(tree: &TemplateTree) -> Vec<ElementRef<'_>> {
    tree.ids()
        .filter_map(|id| ElementRef::new(tree, id))
        .filter(|el| !el.is_structural())
        .collect()
}

fn flatten_rendered<'t>(
    elements: impl Iterator<Item = ElementRef<'t>>,
    out: &mut Vec<ElementRef<'t>>,
) {
    for el in elements {
        if el.is_structural() {
            flatten_rendered(el.children(), out);
        } else {
            out.push(el);
        }
    }
}

fn push_class_tokens(value: &Template, out: &mut Vec<AttrValue>) {
    out.extend(value.split_whitespace().into_iter().map(AttrValue::Static));
}

type Collector =
    fn(&ValueExpr, &ComponentState, &mut FxHashSet<CompactString>, &mut Vec<AttrValue>);

/// Class names produced by a `:class` value.
fn collect_classes(
    value: &ValueExpr,
    state: &ComponentState,
    visited: &mut FxHashSet<CompactString>,
    out: &mut Vec<AttrValue>,
) {
    match value {
        ValueExpr::Str(t) => push_class_tokens(t, out),
        ValueExpr::Array(items) => {
            for item in items {
                collect_classes(item, state, visited, out);
            }
        }
        ValueExpr::Object(entries) => {
            for ObjectEntry { key, value } in entries {
                match key {
                    Some(key) => push_class_tokens(key, out),
                    None if matches!(value, ValueExpr::Object(_) | ValueExpr::Identifier(_)) => {
                        collect_classes(value, state, visited, out)
                    }
                    None => out.push(AttrValue::Unknown),
                }
            }
        }
        ValueExpr::Conditional {
            consequent,
            alternate,
        } => {
            collect_classes(consequent, state, visited, out);
            collect_classes(alternate, state, visited, out);
        }
        ValueExpr::Logical { op, left, right } => {
            if *op != LogicalOp::And {
                collect_classes(left, state, visited, out);
            }
            collect_classes(right, state, visited, out);
        }
        ValueExpr::Identifier(name) => {
            follow_identifier(name, state, visited, out, collect_classes)
        }
        ValueExpr::Unknown => out.push(AttrValue::Unknown),
    }
}

/// Values of a scalar attribute binding such as `:id`.
fn collect_scalars(
    value: &ValueExpr,
    state: &ComponentState,
    visited: &mut FxHashSet<CompactString>,
    out: &mut Vec<AttrValue>,
) {
    match value {
        ValueExpr::Str(t) => out.push(AttrValue::Static(t.clone())),
        ValueExpr::Conditional {
            consequent,
            alternate,
        } => {
            collect_scalars(consequent, state, visited, out);
            collect_scalars(alternate, state, visited, out);
        }
        ValueExpr::Logical { op, left, right } => {
            if *op != LogicalOp::And {
                collect_scalars(left, state, visited, out);
            }
            collect_scalars(right, state, visited, out);
        }
        ValueExpr::Identifier(name) => {
            follow_identifier(name, state, visited, out, collect_scalars)
        }
        ValueExpr::Array(_) | ValueExpr::Object(_) | ValueExpr::Unknown => {
            out.push(AttrValue::Unknown)
        }
    }
}

fn follow_identifier(
    name: &CompactString,
    state: &ComponentState,
    visited: &mut FxHashSet<CompactString>,
    out: &mut Vec<AttrValue>,
    collect: Collector,
) {
    if !state.has_property(name) {
        out.push(AttrValue::Unknown);
        return;
    }
    if !visited.insert(name.clone()) {
        return;
    }
    for candidate in state.property(name) {
        collect(candidate, state, visited, out);
    }
}

/// Same-name shorthand bindings read the property of that name.
fn collect_property(
    name: &str,
    state: &ComponentState,
    out: &mut Vec<AttrValue>,
    collect: Collector,
) {
    // `:active-class` reads `activeClass`
    let value = ValueExpr::Identifier(camelize(name));
    collect(&value, state, &mut FxHashSet::default(), out);
}

/// The `name` entry of a `v-bind="object"` spread.
fn spread_entry(
    value: &ValueExpr,
    name: &str,
    state: &ComponentState,
    out: &mut Vec<AttrValue>,
    collect: Collector,
) {
    match value {
        ValueExpr::Object(entries) => {
            for entry in entries {
                match &entry.key {
                    Some(key) if key.match_string(name) => {
                        collect(&entry.value, state, &mut FxHashSet::default(), out)
                    }
                    Some(_) => {}
                    None => spread_entry(&entry.value, name, state, out, collect),
                }
            }
        }
        ValueExpr::Conditional {
            consequent,
            alternate,
        } => {
            spread_entry(consequent, name, state, out, collect);
            spread_entry(alternate, name, state, out, collect);
        }
        ValueExpr::Identifier(ident) => {
            if !state.has_property(ident) {
                out.push(AttrValue::Unknown);
            }
            for candidate in state.property(ident) {
                spread_entry(candidate, name, state, out, collect);
            }
        }
        _ => out.push(AttrValue::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vize_relief::TemplateBuilder;

    fn statics(values: &[AttrValue]) -> Vec<String> {
        values
            .iter()
            .map(|v| match v {
                AttrValue::Static(t) => t.to_string(),
                AttrValue::Unknown => "?".to_string(),
            })
            .collect()
    }

    fn first<'t>(tree: &'t TemplateTree, tag: &str) -> ElementRef<'t> {
        tree.elements()
            .find(|(_, el)| el.tag == tag)
            .and_then(|(id, _)| ElementRef::new(tree, id))
            .unwrap()
    }

    #[test]
    fn test_rendered_structure() {
        let tree = TemplateBuilder::new()
            .element("ul", |ul| {
                ul.element("template", |t| {
                    t.attr("v-for", "item in items");
                    t.element("li", |_| {});
                });
                ul.element("slot", |s| {
                    s.element("p", |_| {});
                });
            })
            .build();
        let ul = first(&tree, "ul");
        let li = first(&tree, "li");
        let tags: Vec<_> = ul.rendered_children().iter().map(|e| e.tag()).collect();
        assert_eq!(tags, ["li", "p"]);
        assert_eq!(li.rendered_parent(), Some(ul));
        assert!(li.is_repeated());
        assert!(ul.is_root());
        assert!(first(&tree, "p").in_slot());
        assert!(first(&tree, "slot").hosts_foreign_content());
        assert_eq!(rendered_elements(&tree).len(), 3);
    }

    #[test]
    fn test_class_sources() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr("class", "a  b")
                    .attr(":class", "[{ c: on }, ok && 'd', named, `e-${x}`]")
                    .attr("ref", "box")
                    .attr("active-class", "f");
            })
            .build();
        let state = ComponentState::new()
            .with_property("named", "flag ? 'g' : 'h'")
            .with_ref_class_list("box", "'i'");
        let options = CompiledOptions {
            extra_class_attributes: vec!["active-class".into()],
            ..Default::default()
        };
        let classes = first(&tree, "div").class_values(&state, &options);
        assert_eq!(statics(&classes), ["a", "b", "f", "c", "d", "g", "h", "e-x", "i"]);
    }

    #[test]
    fn test_unknown_class_sources() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr(":class", "classes").attr("v-bind", "attrs");
            })
            .build();
        let classes =
            first(&tree, "div").class_values(&ComponentState::new(), &CompiledOptions::default());
        assert_eq!(statics(&classes), ["?", "?"]);
    }

    #[test]
    fn test_recursive_property_terminates() {
        let tree = TemplateBuilder::new()
            .element("div", |d| {
                d.attr(":class", "a");
            })
            .build();
        let state = ComponentState::new()
            .with_property("a", "[b, 'x']")
            .with_property("b", "a");
        let classes = first(&tree, "div").class_values(&state, &CompiledOptions::default());
        assert_eq!(statics(&classes), ["x"]);
    }

    #[test]
    fn test_attribute_values() {
        let tree = TemplateBuilder::new()
            .element("input", |i| {
                i.attr("type", "text")
                    .attr(":id", "'field-' + n")
                    .attr("v-bind", "{ name: 'q', ...rest }");
            })
            .build();
        let state = ComponentState::new();
        let input = first(&tree, "input");
        // The `...rest` spread may carry any attribute.
        assert_eq!(statics(&input.attribute_values("TYPE", &state)), ["text", "?"]);
        assert_eq!(statics(&input.id_values(&state)), ["field-n", "?"]);
        assert_eq!(statics(&input.attribute_values("name", &state)), ["q", "?"]);
        assert!(input.attribute_values("placeholder", &state).len() == 1);
    }

    #[test]
    fn test_transition_classes() {
        let tree = TemplateBuilder::new()
            .element("TransitionGroup", |t| {
                t.attr("name", "fade").attr("enter-active-class", "animated");
                t.element("li", |_| {});
            })
            .build();
        let li = first(&tree, "li");
        let classes = statics(&li.transition_classes(&ComponentState::new()));
        assert!(classes.contains(&"fade-enter".to_string()));
        assert!(classes.contains(&"fade-leave-to".to_string()));
        assert!(classes.contains(&"fade-move".to_string()));
        assert!(classes.contains(&"animated".to_string()));
        assert!(li.is_root());
    }

    #[test]
    fn test_components() {
        let tree = TemplateBuilder::new()
            .element("MyButton", |_| {})
            .element("component", |c| {
                c.attr(":is", "comp");
            })
            .element("Transition", |_| {})
            .element("transition-group", |t| {
                t.attr("tag", "ul");
            })
            .build();
        assert!(first(&tree, "MyButton").is_component());
        assert!(first(&tree, "component").is_component());
        assert!(first(&tree, "Transition").is_structural());
        let group = first(&tree, "transition-group");
        assert!(!group.is_structural());
        assert!(!group.is_component());
        assert_eq!(group.rendered_tag(), Some(Template::of("ul")));
    }
}
