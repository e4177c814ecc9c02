//! Vue template AST node types.
//!
//! This module defines the read-only template tree consumed by the scoped style
//! analysis. Nodes are owned by a [`TemplateTree`](crate::TemplateTree) and refer to
//! each other through [`NodeId`] indices, so parent and child links never alias.

use serde::{Deserialize, Serialize};
use vize_carton::String;

/// Node type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 2,
    Comment = 3,
    SimpleExpression = 4,
    Interpolation = 5,
    Attribute = 6,
    Directive = 7,
}

/// Element type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ElementType {
    #[default]
    Element = 0,
    Component = 1,
    Slot = 2,
    Template = 3,
}

/// Index of a node inside its [`TemplateTree`](crate::TemplateTree).
///
/// Ids are assigned in document order, so comparing two ids compares their
/// positions in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source position in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Byte offset from start of file
    pub offset: u32,
    /// 1-indexed line number
    pub line: u32,
    /// 1-indexed column number
    pub column: u32,
}

impl Position {
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// Source location span [start, end)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
    pub source: String,
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::STUB
    }
}

impl SourceLocation {
    /// Stub location for generated nodes
    pub const STUB: Self = Self {
        start: Position {
            offset: 0,
            line: 1,
            column: 1,
        },
        end: Position {
            offset: 0,
            line: 1,
            column: 1,
        },
        source: String::const_new(""),
    };

    pub fn new(start: Position, end: Position, source: impl Into<String>) -> Self {
        Self {
            start,
            end,
            source: source.into(),
        }
    }
}

/// A node of the template tree
#[derive(Debug, Clone)]
pub enum TemplateNode {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
    Interpolation(InterpolationNode),
}

impl TemplateNode {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Element(_) => NodeType::Element,
            Self::Text(_) => NodeType::Text,
            Self::Comment(_) => NodeType::Comment,
            Self::Interpolation(_) => NodeType::Interpolation,
        }
    }

    pub fn loc(&self) -> &SourceLocation {
        match self {
            Self::Element(n) => &n.loc,
            Self::Text(n) => &n.loc,
            Self::Comment(n) => &n.loc,
            Self::Interpolation(n) => &n.loc,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Self::Element(n) => n.parent,
            Self::Text(n) => n.parent,
            Self::Comment(n) => n.parent,
            Self::Interpolation(n) => n.parent,
        }
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Element node
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: String,
    pub tag_type: ElementType,
    pub props: Vec<PropNode>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub is_self_closing: bool,
    pub loc: SourceLocation,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            tag: tag.into(),
            tag_type: ElementType::Element,
            props: Vec::new(),
            children: Vec::new(),
            parent: None,
            is_self_closing: false,
            loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::Element
    }

    /// Find a static attribute by name.
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeNode> {
        self.props.iter().find_map(|p| match p {
            PropNode::Attribute(attr) if attr.name == name => Some(attr),
            _ => None,
        })
    }

    /// Find a directive by its normalized name (`if`, `for`, `bind`, ...).
    pub fn find_directive(&self, name: &str) -> Option<&DirectiveNode> {
        self.directives().find(|d| d.name == name)
    }

    /// Find a `v-bind` directive with a static argument.
    pub fn find_bind(&self, arg: &str) -> Option<&DirectiveNode> {
        self.directives()
            .find(|d| d.name == "bind" && d.static_arg() == Some(arg))
    }

    #[inline]
    pub fn has_directive(&self, name: &str) -> bool {
        self.find_directive(name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeNode> {
        self.props.iter().filter_map(|p| match p {
            PropNode::Attribute(attr) => Some(attr),
            PropNode::Directive(_) => None,
        })
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveNode> {
        self.props.iter().filter_map(|p| match p {
            PropNode::Directive(dir) => Some(dir),
            PropNode::Attribute(_) => None,
        })
    }
}

/// Prop node (attribute or directive)
#[derive(Debug, Clone)]
pub enum PropNode {
    Attribute(AttributeNode),
    Directive(DirectiveNode),
}

impl PropNode {
    pub fn loc(&self) -> &SourceLocation {
        match self {
            Self::Attribute(n) => &n.loc,
            Self::Directive(n) => &n.loc,
        }
    }
}

/// Attribute node
#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub name: String,
    pub value: Option<TextNode>,
    pub loc: SourceLocation,
}

impl AttributeNode {
    pub fn new(name: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            name: name.into(),
            value: None,
            loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::Attribute
    }

    /// Attribute value text, empty for valueless attributes.
    #[inline]
    pub fn value_str(&self) -> &str {
        self.value.as_ref().map(|v| v.content.as_str()).unwrap_or("")
    }
}

/// Directive node (v-if, v-for, v-bind, etc.)
#[derive(Debug, Clone)]
pub struct DirectiveNode {
    /// Normalized directive name without prefix (e.g., "if", "for", "bind")
    pub name: String,
    /// Raw attribute name including shorthand (e.g., "@click", ":class")
    pub raw_name: Option<String>,
    /// Directive expression
    pub exp: Option<SimpleExpressionNode>,
    /// Directive argument (e.g., "click" in @click). Dynamic arguments are not static.
    pub arg: Option<SimpleExpressionNode>,
    /// Directive modifiers (e.g., ["stop", "prevent"] in @click.stop.prevent)
    pub modifiers: Vec<String>,
    pub loc: SourceLocation,
}

impl DirectiveNode {
    pub fn new(name: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            name: name.into(),
            raw_name: None,
            exp: None,
            arg: None,
            modifiers: Vec::new(),
            loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::Directive
    }

    /// Argument name when it is written statically.
    #[inline]
    pub fn static_arg(&self) -> Option<&str> {
        self.arg
            .as_ref()
            .filter(|a| a.is_static)
            .map(|a| a.content.as_str())
    }

    /// Whether the argument is a `[dynamic]` expression.
    #[inline]
    pub fn has_dynamic_arg(&self) -> bool {
        self.arg.as_ref().is_some_and(|a| !a.is_static)
    }

    /// Expression source text, if any.
    #[inline]
    pub fn exp_str(&self) -> Option<&str> {
        self.exp.as_ref().map(|e| e.content.as_str())
    }
}

/// Text node
#[derive(Debug, Clone)]
pub struct TextNode {
    pub content: String,
    pub parent: Option<NodeId>,
    pub loc: SourceLocation,
}

impl TextNode {
    pub fn new(content: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            content: content.into(),
            parent: None,
            loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::Text
    }
}

/// Comment node
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub content: String,
    pub parent: Option<NodeId>,
    pub loc: SourceLocation,
}

impl CommentNode {
    pub fn new(content: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            content: content.into(),
            parent: None,
            loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::Comment
    }
}

/// Interpolation node ({{ expr }})
#[derive(Debug, Clone)]
pub struct InterpolationNode {
    pub content: SimpleExpressionNode,
    pub parent: Option<NodeId>,
    pub loc: SourceLocation,
}

impl InterpolationNode {
    pub fn node_type(&self) -> NodeType {
        NodeType::Interpolation
    }
}

/// Simple expression node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleExpressionNode {
    pub content: String,
    pub is_static: bool,
    pub loc: SourceLocation,
}

impl SimpleExpressionNode {
    pub fn new(content: impl Into<String>, is_static: bool, loc: SourceLocation) -> Self {
        Self {
            content: content.into(),
            is_static,
            loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::SimpleExpression
    }
}
