//! Template tree builder.
//!
//! Template parsers and tests assemble a [`TemplateTree`] through this builder.
//! Attribute names are written the way they appear in a `.vue` file, so shorthands
//! like `:class`, `@click`, `#default` and `v-bind:[key]` are normalized into
//! directives here.
//!
//! ```
//! use vize_relief::TemplateBuilder;
//!
//! let tree = TemplateBuilder::new()
//!     .element("div", |div| {
//!         div.attr("class", "list");
//!         div.element("li", |li| {
//!             li.attr("v-for", "item in items");
//!             li.attr(":class", "{ active: item.active }");
//!         });
//!     })
//!     .build();
//!
//! assert_eq!(tree.roots().len(), 1);
//! ```

use crate::ast::{
    AttributeNode, CommentNode, DirectiveNode, ElementNode, ElementType, InterpolationNode,
    NodeId, PropNode, SimpleExpressionNode, SourceLocation, TemplateNode, TextNode,
};
use crate::tree::TemplateTree;
use vize_carton::{is_native_tag, String};

/// Builds a [`TemplateTree`] in document order.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    nodes: Vec<TemplateNode>,
    roots: Vec<NodeId>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level element.
    pub fn element(mut self, tag: &str, f: impl FnOnce(&mut ElementScope<'_>)) -> Self {
        let id = self.push_element(tag, None, f);
        self.roots.push(id);
        self
    }

    /// Add a top-level text node.
    pub fn text(mut self, content: &str) -> Self {
        let id = self.push(TemplateNode::Text(TextNode::new(content, SourceLocation::STUB)));
        self.roots.push(id);
        self
    }

    pub fn build(self) -> TemplateTree {
        TemplateTree::new(self.nodes, self.roots)
    }

    fn push(&mut self, node: TemplateNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn push_element(
        &mut self,
        tag: &str,
        parent: Option<NodeId>,
        f: impl FnOnce(&mut ElementScope<'_>),
    ) -> NodeId {
        let mut el = ElementNode::new(tag, SourceLocation::STUB);
        el.parent = parent;
        let id = self.push(TemplateNode::Element(el));
        let mut scope = ElementScope { builder: self, id };
        f(&mut scope);
        if let Some(TemplateNode::Element(el)) = self.nodes.get_mut(id.index()) {
            el.tag_type = classify_element(el);
            el.is_self_closing = el.children.is_empty();
        }
        id
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        match self.nodes.get_mut(id.index()) {
            Some(TemplateNode::Element(el)) => Some(el),
            _ => None,
        }
    }
}

/// Mutable handle on the element currently being built.
pub struct ElementScope<'b> {
    builder: &'b mut TemplateBuilder,
    id: NodeId,
}

impl ElementScope<'_> {
    /// Id of the element being built.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Add an attribute or directive written as in source, e.g. `class`,
    /// `:class`, `v-if`, `v-bind:[name]`.
    pub fn attr(&mut self, raw_name: &str, value: &str) -> &mut Self {
        let prop = parse_prop(raw_name, Some(value));
        self.push_prop(prop)
    }

    /// Add a valueless attribute or directive, e.g. `disabled` or `v-else`.
    pub fn flag(&mut self, raw_name: &str) -> &mut Self {
        let prop = parse_prop(raw_name, None);
        self.push_prop(prop)
    }

    /// Add a child element.
    pub fn element(&mut self, tag: &str, f: impl FnOnce(&mut ElementScope<'_>)) -> &mut Self {
        let child = self.builder.push_element(tag, Some(self.id), f);
        self.push_child(child)
    }

    /// Add a child text node.
    pub fn text(&mut self, content: &str) -> &mut Self {
        let mut node = TextNode::new(content, SourceLocation::STUB);
        node.parent = Some(self.id);
        let child = self.builder.push(TemplateNode::Text(node));
        self.push_child(child)
    }

    /// Add a child comment node.
    pub fn comment(&mut self, content: &str) -> &mut Self {
        let mut node = CommentNode::new(content, SourceLocation::STUB);
        node.parent = Some(self.id);
        let child = self.builder.push(TemplateNode::Comment(node));
        self.push_child(child)
    }

    /// Add a child `{{ expression }}` node.
    pub fn interpolation(&mut self, expression: &str) -> &mut Self {
        let node = InterpolationNode {
            content: SimpleExpressionNode::new(expression, false, SourceLocation::STUB),
            parent: Some(self.id),
            loc: SourceLocation::STUB,
        };
        let child = self.builder.push(TemplateNode::Interpolation(node));
        self.push_child(child)
    }

    fn push_prop(&mut self, prop: PropNode) -> &mut Self {
        if let Some(el) = self.builder.element_mut(self.id) {
            el.props.push(prop);
        }
        self
    }

    fn push_child(&mut self, child: NodeId) -> &mut Self {
        if let Some(el) = self.builder.element_mut(self.id) {
            el.children.push(child);
        }
        self
    }
}

/// Normalize a raw attribute name into an attribute or directive prop.
pub fn parse_prop(raw_name: &str, value: Option<&str>) -> PropNode {
    let loc = SourceLocation::STUB;
    let (name, rest) = if let Some(rest) = raw_name.strip_prefix(':') {
        ("bind", Some(rest))
    } else if let Some(rest) = raw_name.strip_prefix('.') {
        ("bind", Some(rest))
    } else if let Some(rest) = raw_name.strip_prefix('@') {
        ("on", Some(rest))
    } else if let Some(rest) = raw_name.strip_prefix('#') {
        ("slot", Some(rest))
    } else if let Some(body) = raw_name.strip_prefix("v-") {
        match body.find([':', '.']) {
            Some(idx) if body.as_bytes()[idx] == b':' => (&body[..idx], Some(&body[idx + 1..])),
            Some(idx) => (&body[..idx], Some(&body[idx..])),
            None => (body, None),
        }
    } else {
        let mut attr = AttributeNode::new(raw_name, loc.clone());
        attr.value = value.map(|v| TextNode::new(v, loc));
        return PropNode::Attribute(attr);
    };

    let mut dir = DirectiveNode::new(name, loc.clone());
    dir.raw_name = Some(String::from(raw_name));
    dir.exp = value
        .filter(|v| !v.trim().is_empty())
        .map(|v| SimpleExpressionNode::new(v, false, loc.clone()));

    if let Some(rest) = rest {
        let (arg, modifiers) = split_arg_modifiers(rest);
        if !arg.is_empty() {
            dir.arg = Some(match arg.strip_prefix('[').and_then(|a| a.strip_suffix(']')) {
                Some(dynamic) => SimpleExpressionNode::new(dynamic, false, loc.clone()),
                None => SimpleExpressionNode::new(arg, true, loc.clone()),
            });
        }
        dir.modifiers = modifiers.into_iter().map(String::from).collect();
    }
    PropNode::Directive(dir)
}

fn split_arg_modifiers(rest: &str) -> (&str, Vec<&str>) {
    // Dynamic arguments may contain dots: `:[a.b].prop`
    let arg_end = if rest.starts_with('[') {
        rest.find(']').map(|i| i + 1).unwrap_or(rest.len())
    } else {
        rest.find('.').unwrap_or(rest.len())
    };
    let arg = &rest[..arg_end];
    let modifiers = rest[arg_end..]
        .split('.')
        .filter(|m| !m.is_empty())
        .collect();
    (arg, modifiers)
}

fn classify_element(el: &ElementNode) -> ElementType {
    let tag = el.tag.as_str();
    if tag == "slot" {
        return ElementType::Slot;
    }
    if tag == "template" {
        return ElementType::Template;
    }
    let dynamic_is = el.find_bind("is").is_some()
        || el.has_directive("is")
        || el
            .find_attribute("is")
            .is_some_and(|a| a.value_str().starts_with("vue:"));
    if tag == "component" || dynamic_is || !is_native_tag(tag) {
        ElementType::Component
    } else {
        ElementType::Element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_shorthand() {
        let PropNode::Directive(dir) = parse_prop(":class", Some("foo")) else {
            panic!("expected directive");
        };
        assert_eq!(dir.name, "bind");
        assert_eq!(dir.static_arg(), Some("class"));
        assert_eq!(dir.exp_str(), Some("foo"));
    }

    #[test]
    fn test_parse_dynamic_arg() {
        let PropNode::Directive(dir) = parse_prop("v-bind:[key].camel", Some("v")) else {
            panic!("expected directive");
        };
        assert!(dir.has_dynamic_arg());
        assert_eq!(dir.modifiers, vec![String::from("camel")]);
    }

    #[test]
    fn test_parse_plain_directive() {
        let PropNode::Directive(dir) = parse_prop("v-else", None) else {
            panic!("expected directive");
        };
        assert_eq!(dir.name, "else");
        assert!(dir.arg.is_none());
        assert!(dir.exp.is_none());
    }

    #[test]
    fn test_parse_attribute() {
        let PropNode::Attribute(attr) = parse_prop("class", Some("a b")) else {
            panic!("expected attribute");
        };
        assert_eq!(attr.value_str(), "a b");
    }

    #[test]
    fn test_builder_links() {
        let tree = TemplateBuilder::new()
            .element("div", |div| {
                div.element("span", |_| {});
                div.text("hi");
            })
            .build();
        let root = tree.roots()[0];
        let children = tree.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.parent(children[0]), Some(root));
        assert_eq!(tree.parent(children[1]), Some(root));
    }

    #[test]
    fn test_classify() {
        let tree = TemplateBuilder::new()
            .element("MyButton", |_| {})
            .element("div", |_| {})
            .element("slot", |_| {})
            .element("div", |d| {
                d.attr(":is", "tag");
            })
            .build();
        let types: Vec<_> = tree.elements().map(|(_, el)| el.tag_type).collect();
        assert_eq!(
            types,
            vec![
                ElementType::Component,
                ElementType::Element,
                ElementType::Slot,
                ElementType::Component
            ]
        );
    }
}
