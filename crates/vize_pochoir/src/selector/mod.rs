//! Selector AST.
//!
//! A [`Selector`] is a flat list of [`SelectorNode`]s: compounds of simple
//! selectors separated by combinator nodes. Pseudo selectors own their argument
//! lists behind an [`Arc`] so resolved copies share untouched subtrees.

mod display;
pub mod parser;

use std::sync::Arc;

use vize_carton::CompactString;

use crate::span::Span;
use crate::template::Template;

pub use display::{render_nodes, write_nodes};
pub use parser::{parse_selector_list, SelectorSyntax};

/// One selector of a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub nodes: Vec<SelectorNode>,
    pub span: Span,
}

impl Selector {
    pub fn new(nodes: Vec<SelectorNode>, span: Span) -> Self {
        Self { nodes, span }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the first node is a combinator (`> .a`, `+ .b`).
    #[inline]
    pub fn starts_with_combinator(&self) -> bool {
        matches!(self.nodes.first(), Some(SelectorNode::Combinator(_)))
    }

    /// Whether a nesting marker occurs anywhere, including pseudo arguments.
    pub fn has_nesting(&self) -> bool {
        first_nesting(&self.nodes).is_some()
    }
}

/// First nesting marker in depth-first order.
pub fn first_nesting(nodes: &[SelectorNode]) -> Option<&NestingSelector> {
    nodes.iter().find_map(|node| match node {
        SelectorNode::Nesting(nesting) => Some(nesting),
        SelectorNode::Pseudo(pseudo) => pseudo
            .selectors()
            .iter()
            .find_map(|arg| first_nesting(&arg.nodes)),
        _ => None,
    })
}

/// Selector node kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    Type(SimpleSelector),
    Id(SimpleSelector),
    Class(SimpleSelector),
    Universal(UniversalSelector),
    Attribute(AttributeSelector),
    Nesting(NestingSelector),
    Pseudo(PseudoSelector),
    Combinator(CombinatorNode),
    Unknown(UnknownSelector),
}

impl SelectorNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Type(n) | Self::Id(n) | Self::Class(n) => n.span,
            Self::Universal(n) => n.span,
            Self::Attribute(n) => n.span,
            Self::Nesting(n) => n.span,
            Self::Pseudo(n) => n.span,
            Self::Combinator(n) => n.span,
            Self::Unknown(n) => n.span,
        }
    }

    #[inline]
    pub fn is_combinator(&self) -> bool {
        matches!(self, Self::Combinator(_))
    }

    #[inline]
    pub fn as_combinator(&self) -> Option<Combinator> {
        match self {
            Self::Combinator(c) => Some(c.kind),
            _ => None,
        }
    }

    /// Value of a type, id or class node.
    #[inline]
    pub fn simple_value(&self) -> Option<&Template> {
        match self {
            Self::Type(n) | Self::Id(n) | Self::Class(n) => Some(&n.value),
            _ => None,
        }
    }
}

/// Type, id and class selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    pub value: Template,
    pub span: Span,
}

impl SimpleSelector {
    pub fn new(value: Template, span: Span) -> Self {
        Self { value, span }
    }
}

/// `*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversalSelector {
    pub span: Span,
}

/// Attribute value operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttributeOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// `[name op "value" i]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: CompactString,
    pub operator: Option<AttributeOperator>,
    pub value: Option<Template>,
    pub case_insensitive: bool,
    pub span: Span,
}

/// What a nesting marker refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingReference {
    /// `&` (Stylus `^` without index)
    Parent,
    /// Stylus `^[N]`
    Index(i64),
    /// Stylus `^[N..M]`
    Range(i64, i64),
    /// Stylus `~/`
    Initial,
    /// Stylus `../`
    Relative,
    /// Stylus `/`
    Root,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingSelector {
    pub reference: NestingReference,
    pub span: Span,
}

/// Argument of a pseudo selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PseudoArgs {
    #[default]
    None,
    /// A selector list, as in `:not(.a, .b)` or `::v-deep(.c)`
    Selectors(Arc<[Selector]>),
    /// Anything else, as in `:nth-child(2n + 1)`
    Raw(CompactString),
}

/// `:name` or `::name`, with optional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoSelector {
    /// Name including its leading colons, e.g. `::v-deep`
    pub name: CompactString,
    pub args: PseudoArgs,
    pub span: Span,
}

/// Vue scoping pseudo selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VuePseudo {
    Deep,
    Slotted,
    Global,
}

impl PseudoSelector {
    /// Name without leading colons, lowercased.
    pub fn bare_name(&self) -> CompactString {
        self.name.trim_start_matches(':').to_ascii_lowercase().into()
    }

    /// Selector-list arguments, empty when there are none.
    #[inline]
    pub fn selectors(&self) -> &[Selector] {
        match &self.args {
            PseudoArgs::Selectors(list) => list,
            _ => &[],
        }
    }

    pub fn vue_pseudo(&self) -> Option<VuePseudo> {
        match self.bare_name().as_str() {
            "deep" | "v-deep" => Some(VuePseudo::Deep),
            "slotted" | "v-slotted" => Some(VuePseudo::Slotted),
            "global" | "v-global" => Some(VuePseudo::Global),
            _ => None,
        }
    }

    /// Whether this pseudo carries a selector list argument.
    #[inline]
    pub fn has_selector_args(&self) -> bool {
        matches!(&self.args, PseudoArgs::Selectors(list) if !list.is_empty())
    }
}

/// Deep combinator spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepCombinator {
    /// `>>>`
    TripleArrow,
    /// `/deep/`
    SlashDeep,
}

/// Combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    Adjacent,
    /// `~`
    General,
    /// `>>>` or `/deep/`
    Deep(DeepCombinator),
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::Adjacent => "+",
            Self::General => "~",
            Self::Deep(DeepCombinator::TripleArrow) => ">>>",
            Self::Deep(DeepCombinator::SlashDeep) => "/deep/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinatorNode {
    pub kind: Combinator,
    pub span: Span,
}

/// Placeholders (`%name`) and anything else without structural meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSelector {
    pub value: CompactString,
    pub span: Span,
}
