//! Style block tree.
//!
//! The tree a CSS / SCSS / Stylus parser hands to the analysis: rules with their
//! selector lists, at-rules, declarations and comments, each with a span into the
//! style block source. [`StyleSheetBuilder`] assembles one, writing a normalized
//! source text as it goes so spans always point at real text.

use serde::{Deserialize, Serialize};
use vize_carton::CompactString;

use crate::selector::{parse_selector_list, Selector, SelectorSyntax};
use crate::span::Span;

/// Style block language, from `<style lang="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLang {
    #[default]
    Css,
    Scss,
    Stylus,
}

impl StyleLang {
    /// Map a `lang` attribute value. Unknown languages read as plain CSS.
    pub fn from_lang_attr(lang: &str) -> Self {
        match lang.trim().to_ascii_lowercase().as_str() {
            "scss" | "sass" => Self::Scss,
            "styl" | "stylus" => Self::Stylus,
            _ => Self::Css,
        }
    }

    #[inline]
    pub fn selector_syntax(self) -> SelectorSyntax {
        match self {
            Self::Css => SelectorSyntax::Css,
            Self::Scss => SelectorSyntax::Scss,
            Self::Stylus => SelectorSyntax::Stylus,
        }
    }
}

/// Identifier of a rule or at-rule, unique within one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RuleId(u32);

impl RuleId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// A parsed `<style>` block.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    pub lang: StyleLang,
    pub scoped: bool,
    pub nodes: Vec<StyleNode>,
    pub errors: Vec<StyleParseError>,
    pub source: String,
    pub span: Span,
}

impl StyleSheet {
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every node in document order.
    pub fn walk(&self, mut f: impl FnMut(&StyleNode)) {
        fn go(nodes: &[StyleNode], f: &mut impl FnMut(&StyleNode)) {
            for node in nodes {
                f(node);
                if let Some(children) = node.children() {
                    go(children, f);
                }
            }
        }
        go(&self.nodes, &mut f);
    }

    /// Find a rule or at-rule by id.
    pub fn find(&self, id: RuleId) -> Option<&StyleNode> {
        fn go(nodes: &[StyleNode], id: RuleId) -> Option<&StyleNode> {
            nodes.iter().find_map(|node| {
                if node.rule_id() == Some(id) {
                    Some(node)
                } else {
                    node.children().and_then(|children| go(children, id))
                }
            })
        }
        go(&self.nodes, id)
    }
}

/// A parse failure reported by the style parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleParseError {
    pub message: CompactString,
    pub span: Span,
}

/// Style tree node
#[derive(Debug, Clone)]
pub enum StyleNode {
    Rule(StyleRule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

impl StyleNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Rule(n) => n.span,
            Self::AtRule(n) => n.span,
            Self::Declaration(n) => n.span,
            Self::Comment(n) => n.span,
        }
    }

    pub fn rule_id(&self) -> Option<RuleId> {
        match self {
            Self::Rule(n) => Some(n.id),
            Self::AtRule(n) => Some(n.id),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[StyleNode]> {
        match self {
            Self::Rule(n) => Some(&n.nodes),
            Self::AtRule(n) => n.nodes.as_deref(),
            _ => None,
        }
    }
}

/// `selector { ... }`
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub id: RuleId,
    pub selector_text: CompactString,
    /// Empty inside `@keyframes`, where selectors are keyframe offsets.
    pub selectors: Vec<Selector>,
    pub selector_span: Span,
    pub nodes: Vec<StyleNode>,
    pub span: Span,
}

/// `@name params { ... }` or `@name params;`
#[derive(Debug, Clone)]
pub struct AtRule {
    pub id: RuleId,
    pub name: CompactString,
    pub params: CompactString,
    pub params_span: Span,
    /// Selector list for `@nest` and SCSS `@at-root <selector>`.
    pub selectors: Option<Vec<Selector>>,
    pub nodes: Option<Vec<StyleNode>>,
    pub span: Span,
}

impl AtRule {
    /// Name without vendor prefix, lowercased: `-webkit-keyframes` is `keyframes`.
    pub fn normalized_name(&self) -> CompactString {
        let lower = self.name.to_ascii_lowercase();
        let unprefixed = ["-webkit-", "-moz-", "-o-", "-ms-"]
            .iter()
            .find_map(|prefix| lower.strip_prefix(prefix))
            .unwrap_or(&lower);
        CompactString::new(unprefixed)
    }

    #[inline]
    pub fn is_keyframes(&self) -> bool {
        self.normalized_name() == "keyframes"
    }
}

/// `property: value`
#[derive(Debug, Clone)]
pub struct Declaration {
    pub property: CompactString,
    pub value: CompactString,
    pub important: bool,
    pub value_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub text: CompactString,
    pub span: Span,
}

// ============================================================================
// Builder
// ============================================================================

/// Builds a [`StyleSheet`].
///
/// ```
/// use vize_pochoir::{StyleLang, StyleSheetBuilder};
///
/// let sheet = StyleSheetBuilder::new(StyleLang::Scss)
///     .scoped(true)
///     .rule(".card", |card| {
///         card.decl("padding", "8px");
///         card.rule("&__title", |_| {});
///     })
///     .build();
///
/// assert_eq!(sheet.source, ".card { padding: 8px; &__title { } }");
/// ```
#[derive(Debug)]
pub struct StyleSheetBuilder {
    lang: StyleLang,
    scoped: bool,
    source: String,
    nodes: Vec<StyleNode>,
    errors: Vec<StyleParseError>,
    next_id: u32,
}

impl StyleSheetBuilder {
    pub fn new(lang: StyleLang) -> Self {
        Self {
            lang,
            scoped: false,
            source: String::new(),
            nodes: Vec::new(),
            errors: Vec::new(),
            next_id: 0,
        }
    }

    pub fn scoped(mut self, scoped: bool) -> Self {
        self.scoped = scoped;
        self
    }

    pub fn rule(mut self, selector: &str, f: impl FnOnce(&mut BlockScope<'_>)) -> Self {
        let node = BlockScope::top(&mut self).build_rule(selector, f);
        self.nodes.push(node);
        self
    }

    pub fn at_rule(
        mut self,
        name: &str,
        params: &str,
        f: impl FnOnce(&mut BlockScope<'_>),
    ) -> Self {
        let node = BlockScope::top(&mut self).build_at_rule(name, params, Some(f));
        self.nodes.push(node);
        self
    }

    pub fn decl(mut self, property: &str, value: &str) -> Self {
        let node = BlockScope::top(&mut self).build_decl(property, value);
        self.nodes.push(node);
        self
    }

    /// Record a parse failure, as the style parser would.
    pub fn parse_error(mut self, message: &str) -> Self {
        let at = self.source.len() as u32;
        self.errors.push(StyleParseError {
            message: CompactString::new(message),
            span: Span::empty(at),
        });
        self
    }

    pub fn build(self) -> StyleSheet {
        let span = Span::new(0, self.source.len() as u32);
        StyleSheet {
            lang: self.lang,
            scoped: self.scoped,
            nodes: self.nodes,
            errors: self.errors,
            source: self.source,
            span,
        }
    }

    fn next_id(&mut self) -> RuleId {
        let id = RuleId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn write(&mut self, text: &str) -> Span {
        if !self.source.is_empty() && !self.source.ends_with(' ') {
            self.source.push(' ');
        }
        let start = self.source.len() as u32;
        self.source.push_str(text);
        Span::new(start, self.source.len() as u32)
    }
}

/// Block currently being built.
pub struct BlockScope<'b> {
    builder: &'b mut StyleSheetBuilder,
    nodes: Vec<StyleNode>,
    in_keyframes: bool,
}

impl<'b> BlockScope<'b> {
    fn top(builder: &'b mut StyleSheetBuilder) -> Self {
        Self {
            builder,
            nodes: Vec::new(),
            in_keyframes: false,
        }
    }

    pub fn rule(&mut self, selector: &str, f: impl FnOnce(&mut BlockScope<'_>)) -> &mut Self {
        let node = self.build_rule(selector, f);
        self.nodes.push(node);
        self
    }

    pub fn at_rule(
        &mut self,
        name: &str,
        params: &str,
        f: impl FnOnce(&mut BlockScope<'_>),
    ) -> &mut Self {
        let node = self.build_at_rule(name, params, Some(f));
        self.nodes.push(node);
        self
    }

    /// At-rule without a block, e.g. `@include mixin;`.
    pub fn at_statement(&mut self, name: &str, params: &str) -> &mut Self {
        let node = self.build_at_rule(name, params, None::<fn(&mut BlockScope<'_>)>);
        self.nodes.push(node);
        self
    }

    pub fn decl(&mut self, property: &str, value: &str) -> &mut Self {
        let node = self.build_decl(property, value);
        self.nodes.push(node);
        self
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        let span = self.builder.write(&format!("/* {text} */"));
        self.nodes.push(StyleNode::Comment(Comment {
            text: CompactString::new(text),
            span,
        }));
        self
    }

    fn child(&mut self, in_keyframes: bool) -> BlockScope<'_> {
        BlockScope {
            builder: &mut *self.builder,
            nodes: Vec::new(),
            in_keyframes,
        }
    }

    fn build_rule(&mut self, selector: &str, f: impl FnOnce(&mut BlockScope<'_>)) -> StyleNode {
        let id = self.builder.next_id();
        let selector_span = self.builder.write(selector);
        let start = selector_span.start;
        let selectors = if self.in_keyframes {
            Vec::new()
        } else {
            self.parse_selectors(selector, selector_span.start)
        };

        self.builder.write("{");
        let mut block = self.child(false);
        f(&mut block);
        let nodes = block.nodes;
        let end = self.builder.write("}").end;

        StyleNode::Rule(StyleRule {
            id,
            selector_text: CompactString::new(selector),
            selectors,
            selector_span,
            nodes,
            span: Span::new(start, end),
        })
    }

    fn build_at_rule(
        &mut self,
        name: &str,
        params: &str,
        f: Option<impl FnOnce(&mut BlockScope<'_>)>,
    ) -> StyleNode {
        let id = self.builder.next_id();
        let start = self.builder.write(&format!("@{name}")).start;
        let params_span = if params.is_empty() {
            Span::empty(self.builder.source.len() as u32)
        } else {
            self.builder.write(params)
        };

        let mut at_rule = AtRule {
            id,
            name: CompactString::new(name),
            params: CompactString::new(params),
            params_span,
            selectors: None,
            nodes: None,
            span: Span::default(),
        };

        let normalized = at_rule.normalized_name();
        let takes_selectors = normalized == "nest"
            || (normalized == "at-root"
                && self.builder.lang == StyleLang::Scss
                && !params.trim().is_empty());
        if takes_selectors {
            at_rule.selectors = Some(self.parse_selectors(params, params_span.start));
        }

        let end = match f {
            Some(f) => {
                self.builder.write("{");
                let mut block = self.child(normalized == "keyframes");
                f(&mut block);
                at_rule.nodes = Some(block.nodes);
                self.builder.write("}").end
            }
            None => {
                self.builder.source.push(';');
                self.builder.source.len() as u32
            }
        };
        at_rule.span = Span::new(start, end);
        StyleNode::AtRule(at_rule)
    }

    fn build_decl(&mut self, property: &str, value: &str) -> StyleNode {
        let (value, important) = match value.trim_end().strip_suffix("!important") {
            Some(rest) => (rest.trim_end(), true),
            None => (value, false),
        };
        let start = self.builder.write(&format!("{property}:")).start;
        let value_span = self.builder.write(value);
        if important {
            self.builder.write("!important");
        }
        self.builder.source.push(';');
        let end = self.builder.source.len() as u32;
        StyleNode::Declaration(Declaration {
            property: CompactString::new(property),
            value: CompactString::new(value),
            important,
            value_span,
            span: Span::new(start, end),
        })
    }

    fn parse_selectors(&mut self, text: &str, offset: u32) -> Vec<Selector> {
        match parse_selector_list(text, self.builder.lang.selector_syntax(), offset) {
            Ok(list) => list,
            Err(err) => {
                self.builder.errors.push(StyleParseError {
                    message: CompactString::new(err.to_string()),
                    span: err.span(),
                });
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_source_and_spans() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .rule(".foo", |r| {
                r.decl("color", "red !important");
            })
            .build();
        assert_eq!(sheet.source, ".foo { color: red !important; }");
        let StyleNode::Rule(rule) = &sheet.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.selector_span.source_text(&sheet.source), Some(".foo"));
        let StyleNode::Declaration(decl) = &rule.nodes[0] else {
            panic!("expected declaration");
        };
        assert!(decl.important);
        assert_eq!(decl.value, "red");
        assert_eq!(decl.value_span.source_text(&sheet.source), Some("red"));
    }

    #[test]
    fn test_keyframes_selectors_not_parsed() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .at_rule("-webkit-keyframes", "fade", |k| {
                k.rule("50%", |_| {});
            })
            .build();
        assert!(!sheet.has_errors());
        let StyleNode::AtRule(at) = &sheet.nodes[0] else {
            panic!("expected at-rule");
        };
        assert!(at.is_keyframes());
    }

    #[test]
    fn test_selector_errors_are_recorded() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .rule(".a >", |_| {})
            .build();
        assert_eq!(sheet.errors.len(), 1);
        assert_eq!(sheet.errors[0].message, "selector ends with a combinator");
    }

    #[test]
    fn test_nest_selectors() {
        let sheet = StyleSheetBuilder::new(StyleLang::Css)
            .rule(".foo", |r| {
                r.at_rule("nest", ".bar &", |_| {});
            })
            .build();
        let mut nest = None;
        sheet.walk(|node| {
            if let StyleNode::AtRule(at) = node {
                nest = at.selectors.clone();
            }
        });
        assert_eq!(nest.map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_lang_attr() {
        assert_eq!(StyleLang::from_lang_attr("SCSS"), StyleLang::Scss);
        assert_eq!(StyleLang::from_lang_attr("styl"), StyleLang::Stylus);
        assert_eq!(StyleLang::from_lang_attr("less"), StyleLang::Css);
    }
}
