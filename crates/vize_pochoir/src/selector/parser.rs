//! Selector text reader.
//!
//! Turns the selector text of one rule into typed [`Selector`] nodes. The reader
//! understands the nesting and interpolation forms of SCSS (`&-suffix`, `#{...}`,
//! `%placeholder`) and Stylus (`^[N]`, `^[N..M]`, `~/`, `../`, `{...}`), plus the
//! Vue deep combinators `>>>` and `/deep/`.

use std::sync::Arc;

use vize_carton::CompactString;

use super::{
    AttributeOperator, AttributeSelector, Combinator, CombinatorNode, DeepCombinator,
    NestingReference, NestingSelector, PseudoArgs, PseudoSelector, Selector, SelectorNode,
    SimpleSelector, UniversalSelector, UnknownSelector,
};
use crate::error::SelectorParseError;
use crate::span::Span;
use crate::template::{InterpolationSyntax, Template};

/// Selector dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorSyntax {
    #[default]
    Css,
    Scss,
    Stylus,
}

impl SelectorSyntax {
    #[inline]
    pub fn interpolation(self) -> InterpolationSyntax {
        match self {
            Self::Css => InterpolationSyntax::None,
            Self::Scss => InterpolationSyntax::Scss,
            Self::Stylus => InterpolationSyntax::Stylus,
        }
    }
}

/// Pseudo selectors whose argument is a selector list.
const SELECTOR_PSEUDOS: &[&str] = &[
    "not",
    "is",
    "where",
    "has",
    "matches",
    "any",
    "-webkit-any",
    "-moz-any",
    "deep",
    "v-deep",
    "slotted",
    "v-slotted",
    "global",
    "v-global",
    "host",
    "host-context",
];

type Result<T> = std::result::Result<T, SelectorParseError>;

/// Read a comma separated selector list.
///
/// `offset` is the position of `text` in the style block, used for spans.
pub fn parse_selector_list(
    text: &str,
    syntax: SelectorSyntax,
    offset: u32,
) -> Result<Vec<Selector>> {
    let mut parser = SelectorReader::new(text, syntax, offset);
    let list = parser.parse_list()?;
    if let Some(c) = parser.peek() {
        return Err(SelectorParseError::Unexpected {
            found: c,
            span: parser.span_from(parser.pos),
        });
    }
    Ok(list)
}

struct SelectorReader<'s> {
    src: &'s str,
    pos: usize,
    syntax: SelectorSyntax,
    offset: u32,
}

impl<'s> SelectorReader<'s> {
    fn new(src: &'s str, syntax: SelectorSyntax, offset: u32) -> Self {
        Self {
            src,
            pos: 0,
            syntax,
            offset,
        }
    }

    #[inline]
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    #[inline]
    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.offset + start as u32, self.offset + end as u32)
    }

    #[inline]
    fn span_from(&self, start: usize) -> Span {
        self.span(start, self.pos)
    }

    fn skip_comment(&mut self) -> Result<bool> {
        if self.rest().starts_with("/*") {
            let start = self.pos;
            match self.rest()[2..].find("*/") {
                Some(end) => {
                    self.pos += end + 4;
                    Ok(true)
                }
                None => Err(SelectorParseError::Unclosed {
                    delimiter: '/',
                    span: self.span(start, self.src.len()),
                }),
            }
        } else {
            Ok(false)
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Selector>> {
        let mut list = Vec::new();
        loop {
            list.push(self.parse_selector()?);
            if self.peek() == Some(',') {
                self.bump();
            } else {
                break;
            }
        }
        Ok(list)
    }

    fn parse_selector(&mut self) -> Result<Selector> {
        let start = self.pos;
        let mut nodes: Vec<SelectorNode> = Vec::new();
        let mut whitespace: Option<usize> = None;

        loop {
            if self.skip_comment()? {
                continue;
            }
            let Some(c) = self.peek() else { break };
            if c == ',' {
                break;
            }
            if c.is_whitespace() {
                whitespace.get_or_insert(self.pos);
                self.bump();
                continue;
            }

            if let Some(node) = self.parse_reference()? {
                self.push_descendant(&mut nodes, whitespace.take());
                nodes.push(node);
                continue;
            }

            if let Some((kind, len)) = self.combinator_at() {
                let at = self.pos;
                self.pos += len;
                if nodes.last().is_some_and(SelectorNode::is_combinator) {
                    return Err(SelectorParseError::Unexpected {
                        found: c,
                        span: self.span_from(at),
                    });
                }
                whitespace = None;
                nodes.push(SelectorNode::Combinator(CombinatorNode {
                    kind,
                    span: self.span_from(at),
                }));
                continue;
            }

            self.push_descendant(&mut nodes, whitespace.take());
            let node = self.parse_simple()?;
            nodes.push(node);
        }

        let trimmed_start = start + (self.src[start..self.pos].len()
            - self.src[start..self.pos].trim_start().len());
        let trimmed_end = start + self.src[start..self.pos].trim_end().len();
        let span = self.span(trimmed_start, trimmed_end.max(trimmed_start));

        match nodes.last() {
            None => Err(SelectorParseError::Empty { span }),
            Some(last) if last.is_combinator() => Err(SelectorParseError::DanglingCombinator {
                span: last.span(),
            }),
            Some(_) => Ok(Selector::new(nodes, span)),
        }
    }

    fn push_descendant(&self, nodes: &mut Vec<SelectorNode>, whitespace: Option<usize>) {
        let Some(at) = whitespace else { return };
        if nodes.last().is_some_and(|n| !n.is_combinator()) {
            nodes.push(SelectorNode::Combinator(CombinatorNode {
                kind: Combinator::Descendant,
                span: self.span(at, at + 1),
            }));
        }
    }

    fn combinator_at(&self) -> Option<(Combinator, usize)> {
        let rest = self.rest();
        if rest.starts_with(">>>") {
            Some((Combinator::Deep(DeepCombinator::TripleArrow), 3))
        } else if rest.starts_with("/deep/") {
            Some((Combinator::Deep(DeepCombinator::SlashDeep), 6))
        } else if rest.starts_with('>') {
            Some((Combinator::Child, 1))
        } else if rest.starts_with('+') {
            Some((Combinator::Adjacent, 1))
        } else if rest.starts_with('~') {
            Some((Combinator::General, 1))
        } else {
            None
        }
    }

    /// Nesting markers: `&` everywhere, plus the Stylus ancestor references.
    fn parse_reference(&mut self) -> Result<Option<SelectorNode>> {
        let start = self.pos;
        let rest = self.rest();
        let stylus = self.syntax == SelectorSyntax::Stylus;

        let reference = if rest.starts_with('&') {
            self.pos += 1;
            NestingReference::Parent
        } else if stylus && rest.starts_with("~/") {
            self.pos += 2;
            NestingReference::Initial
        } else if stylus && rest.starts_with("../") {
            self.pos += 3;
            NestingReference::Relative
        } else if stylus && rest.starts_with('/') && !rest.starts_with("/deep/") {
            self.pos += 1;
            NestingReference::Root
        } else if stylus && rest.starts_with('^') {
            self.pos += 1;
            if self.peek() == Some('[') {
                self.parse_ancestor_index(start)?
            } else {
                NestingReference::Parent
            }
        } else {
            return Ok(None);
        };

        Ok(Some(SelectorNode::Nesting(NestingSelector {
            reference,
            span: self.span_from(start),
        })))
    }

    fn parse_ancestor_index(&mut self, start: usize) -> Result<NestingReference> {
        // Positioned at `[`
        self.bump();
        let body_start = self.pos;
        let Some(len) = self.rest().find(']') else {
            return Err(SelectorParseError::Unclosed {
                delimiter: '[',
                span: self.span(start, self.src.len()),
            });
        };
        let body = self.src[body_start..body_start + len].trim();
        self.pos = body_start + len + 1;

        let expected = SelectorParseError::Expected {
            expected: "ancestor index",
            span: self.span_from(start),
        };
        let reference = match body.split_once("..") {
            Some((from, to)) => {
                let from = from.trim().parse::<i64>().map_err(|_| expected.clone())?;
                let to = to.trim().parse::<i64>().map_err(|_| expected.clone())?;
                NestingReference::Range(from, to)
            }
            None => NestingReference::Index(body.parse::<i64>().map_err(|_| expected)?),
        };
        Ok(reference)
    }

    fn parse_simple(&mut self) -> Result<SelectorNode> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Err(SelectorParseError::Expected {
                expected: "selector",
                span: self.span_from(start),
            });
        };

        match c {
            '.' => {
                self.bump();
                let value = self.read_template("class name", start)?;
                Ok(SelectorNode::Class(SimpleSelector::new(
                    value,
                    self.span_from(start),
                )))
            }
            '#' if !self.at_interpolation() => {
                self.bump();
                let value = self.read_template("id", start)?;
                Ok(SelectorNode::Id(SimpleSelector::new(
                    value,
                    self.span_from(start),
                )))
            }
            '*' => {
                self.bump();
                // Namespace prefix `*|div`
                if self.peek() == Some('|') {
                    self.bump();
                    return self.parse_simple();
                }
                Ok(SelectorNode::Universal(UniversalSelector {
                    span: self.span_from(start),
                }))
            }
            '[' => self.parse_attribute(),
            ':' => self.parse_pseudo(),
            '%' => {
                self.bump();
                let raw = self.read_ident();
                Ok(SelectorNode::Unknown(UnknownSelector {
                    value: CompactString::new(&self.src[start..start + 1 + raw.len()]),
                    span: self.span_from(start),
                }))
            }
            c if is_ident_char(c) || c == '\\' || self.at_interpolation() => {
                let value = self.read_template("type selector", start)?;
                Ok(SelectorNode::Type(SimpleSelector::new(
                    value,
                    self.span_from(start),
                )))
            }
            found => Err(SelectorParseError::Unexpected {
                found,
                span: self.span(start, start + found.len_utf8()),
            }),
        }
    }

    fn at_interpolation(&self) -> bool {
        let rest = self.rest();
        match self.syntax {
            SelectorSyntax::Scss => rest.starts_with("#{"),
            SelectorSyntax::Stylus => rest.starts_with('{'),
            SelectorSyntax::Css => false,
        }
    }

    fn read_template(&mut self, expected: &'static str, start: usize) -> Result<Template> {
        let raw = self.read_ident();
        if raw.is_empty() {
            return Err(SelectorParseError::Expected {
                expected,
                span: self.span_from(start),
            });
        }
        Ok(Template::parse(&unescape(raw), self.syntax.interpolation()))
    }

    /// Identifier characters, escapes and interpolation runs.
    fn read_ident(&mut self) -> &'s str {
        let start = self.pos;
        loop {
            if self.at_interpolation() {
                let open = if self.syntax == SelectorSyntax::Scss { 2 } else { 1 };
                self.pos += open;
                self.skip_balanced('{', '}');
                continue;
            }
            match self.peek() {
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some(c) if is_ident_char(c) => {
                    self.bump();
                }
                _ => break,
            }
        }
        &self.src[start..self.pos]
    }

    /// Advance past the delimiter closing an already opened group. Stops at the end
    /// of input when unbalanced.
    fn skip_balanced(&mut self, open: char, close: char) -> bool {
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        while let Some(c) = self.bump() {
            match (quote, c) {
                (_, '\\') => {
                    self.bump();
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, c) if c == open => depth += 1,
                (None, c) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn parse_attribute(&mut self) -> Result<SelectorNode> {
        let start = self.pos;
        let unclosed = |reader: &Self| SelectorParseError::Unclosed {
            delimiter: '[',
            span: reader.span(start, reader.src.len()),
        };
        self.bump();
        self.skip_whitespace();

        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| is_ident_char(c) || c == '|' || c == '\\')
        {
            self.bump();
        }
        let name = &self.src[name_start..self.pos];
        if name.is_empty() {
            return Err(SelectorParseError::Expected {
                expected: "attribute name",
                span: self.span_from(start),
            });
        }
        self.skip_whitespace();

        let mut operator = None;
        let mut value = None;
        let mut case_insensitive = false;

        if self.peek() != Some(']') {
            let rest = self.rest();
            let (op, len) = if rest.starts_with("~=") {
                (AttributeOperator::Includes, 2)
            } else if rest.starts_with("|=") {
                (AttributeOperator::DashMatch, 2)
            } else if rest.starts_with("^=") {
                (AttributeOperator::Prefix, 2)
            } else if rest.starts_with("$=") {
                (AttributeOperator::Suffix, 2)
            } else if rest.starts_with("*=") {
                (AttributeOperator::Substring, 2)
            } else if rest.starts_with('=') {
                (AttributeOperator::Equals, 1)
            } else {
                return match self.peek() {
                    Some(found) => Err(SelectorParseError::Unexpected {
                        found,
                        span: self.span(self.pos, self.pos + found.len_utf8()),
                    }),
                    None => Err(unclosed(&*self)),
                };
            };
            self.pos += len;
            self.skip_whitespace();

            let raw = match self.peek() {
                Some(q @ ('"' | '\'')) => {
                    self.bump();
                    let value_start = self.pos;
                    let Some(len) = find_unescaped(self.rest(), q) else {
                        return Err(unclosed(&*self));
                    };
                    self.pos += len + 1;
                    &self.src[value_start..value_start + len]
                }
                _ => self.read_ident(),
            };
            operator = Some(op);
            value = Some(Template::parse(&unescape(raw), self.syntax.interpolation()));
            self.skip_whitespace();

            if let Some(flag) = self.peek().filter(|c| matches!(c, 'i' | 'I' | 's' | 'S')) {
                case_insensitive = flag.eq_ignore_ascii_case(&'i');
                self.bump();
                self.skip_whitespace();
            }
        }

        if self.peek() != Some(']') {
            return Err(unclosed(&*self));
        }
        self.bump();

        Ok(SelectorNode::Attribute(AttributeSelector {
            name: CompactString::new(name),
            operator,
            value,
            case_insensitive,
            span: self.span_from(start),
        }))
    }

    fn parse_pseudo(&mut self) -> Result<SelectorNode> {
        let start = self.pos;
        self.bump();
        if self.peek() == Some(':') {
            self.bump();
        }
        let name_start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == name_start {
            return Err(SelectorParseError::Expected {
                expected: "pseudo-class name",
                span: self.span_from(start),
            });
        }
        let name = CompactString::new(&self.src[start..self.pos]);
        let bare = self.src[name_start..self.pos].to_ascii_lowercase();

        let mut args = PseudoArgs::None;
        if self.peek() == Some('(') {
            self.bump();
            let inner_start = self.pos;
            if !self.skip_balanced('(', ')') {
                return Err(SelectorParseError::Unclosed {
                    delimiter: '(',
                    span: self.span(start, self.src.len()),
                });
            }
            let inner = &self.src[inner_start..self.pos - 1];
            if !inner.trim().is_empty() {
                args = if SELECTOR_PSEUDOS.contains(&bare.as_str()) {
                    let mut nested = SelectorReader::new(
                        inner,
                        self.syntax,
                        self.offset + inner_start as u32,
                    );
                    let list = nested.parse_list()?;
                    if let Some(found) = nested.peek() {
                        return Err(SelectorParseError::Unexpected {
                            found,
                            span: nested.span_from(nested.pos),
                        });
                    }
                    PseudoArgs::Selectors(Arc::from(list))
                } else {
                    PseudoArgs::Raw(CompactString::new(inner.trim()))
                };
            }
        }

        Ok(SelectorNode::Pseudo(PseudoSelector {
            name,
            args,
            span: self.span_from(start),
        }))
    }
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn find_unescaped(text: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(i);
        }
    }
    None
}

/// Resolve CSS escapes (`\:`, `\31 `).
fn unescape(raw: &str) -> std::borrow::Cow<'_, str> {
    if !raw.contains('\\') {
        return std::borrow::Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 && chars.peek().is_some_and(char::is_ascii_hexdigit) {
            if let Some(h) = chars.next() {
                hex.push(h);
            }
        }
        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            if chars.peek() == Some(&' ') {
                chars.next();
            }
            let decoded = u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            out.push(decoded);
        }
    }
    std::borrow::Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::render_nodes;

    fn parse(text: &str, syntax: SelectorSyntax) -> Vec<Selector> {
        parse_selector_list(text, syntax, 0).unwrap()
    }

    fn render(text: &str, syntax: SelectorSyntax) -> Vec<String> {
        parse(text, syntax)
            .iter()
            .map(|s| render_nodes(&s.nodes))
            .collect()
    }

    #[test]
    fn test_compound_and_combinators() {
        assert_eq!(
            render("div.a#b > span + i ~ em  .c", SelectorSyntax::Css),
            vec!["div.a#b>span+i~em .c"]
        );
    }

    #[test]
    fn test_list_and_spans() {
        let list = parse(".a, .b", SelectorSyntax::Css);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].span, Span::new(0, 2));
        assert_eq!(list[1].span, Span::new(4, 6));
    }

    #[test]
    fn test_deep_combinators() {
        let list = parse(".a >>> .b, .a /deep/ .b", SelectorSyntax::Css);
        assert_eq!(
            list[0].nodes[1].as_combinator(),
            Some(Combinator::Deep(DeepCombinator::TripleArrow))
        );
        assert_eq!(
            list[1].nodes[1].as_combinator(),
            Some(Combinator::Deep(DeepCombinator::SlashDeep))
        );
    }

    #[test]
    fn test_pseudo_selector_args() {
        let list = parse(".a :deep(.b .c, .d):hover", SelectorSyntax::Css);
        let SelectorNode::Pseudo(pseudo) = &list[0].nodes[2] else {
            panic!("expected pseudo");
        };
        assert_eq!(pseudo.selectors().len(), 2);
        assert_eq!(pseudo.vue_pseudo(), Some(crate::selector::VuePseudo::Deep));
        assert_eq!(render_nodes(&list[0].nodes), ".a :deep(.b .c, .d):hover");
    }

    #[test]
    fn test_raw_pseudo_args() {
        let list = parse("li:nth-child(2n + 1)", SelectorSyntax::Css);
        let SelectorNode::Pseudo(pseudo) = &list[0].nodes[1] else {
            panic!("expected pseudo");
        };
        assert_eq!(pseudo.args, PseudoArgs::Raw("2n + 1".into()));
    }

    #[test]
    fn test_attribute() {
        let list = parse("[data-foo~=\"bar baz\" i]", SelectorSyntax::Css);
        let SelectorNode::Attribute(attr) = &list[0].nodes[0] else {
            panic!("expected attribute");
        };
        assert_eq!(attr.name, "data-foo");
        assert_eq!(attr.operator, Some(AttributeOperator::Includes));
        assert_eq!(attr.value.as_ref().and_then(|v| v.as_str()), Some("bar baz"));
        assert!(attr.case_insensitive);
    }

    #[test]
    fn test_scss_nesting_suffix() {
        let list = parse("&-item, &__el .x", SelectorSyntax::Scss);
        assert!(matches!(list[0].nodes[0], SelectorNode::Nesting(_)));
        assert_eq!(
            list[0].nodes[1].simple_value().and_then(|v| v.as_str()),
            Some("-item")
        );
        assert_eq!(render_nodes(&list[1].nodes), "&__el .x");
    }

    #[test]
    fn test_scss_interpolation() {
        let list = parse(".btn-#{$size}, #{$tag}.x", SelectorSyntax::Scss);
        let value = list[0].nodes[0].simple_value().unwrap();
        assert!(value.has_interpolation());
        assert!(matches!(list[1].nodes[0], SelectorNode::Type(_)));
    }

    #[test]
    fn test_scss_placeholder() {
        let list = parse("%message-shared", SelectorSyntax::Scss);
        assert!(matches!(list[0].nodes[0], SelectorNode::Unknown(_)));
    }

    #[test]
    fn test_stylus_references() {
        let list = parse("^[0]:hover ^[-1..-1], ~/ .a, ../ .b", SelectorSyntax::Stylus);
        assert_eq!(render_nodes(&list[0].nodes), "^[0]:hover ^[-1..-1]");
        assert!(matches!(
            &list[1].nodes[0],
            SelectorNode::Nesting(NestingSelector {
                reference: NestingReference::Initial,
                ..
            })
        ));
        assert!(matches!(
            &list[2].nodes[0],
            SelectorNode::Nesting(NestingSelector {
                reference: NestingReference::Relative,
                ..
            })
        ));
    }

    #[test]
    fn test_stylus_interpolation() {
        let list = parse(".a-{$b}", SelectorSyntax::Stylus);
        let value = list[0].nodes[0].simple_value().unwrap();
        assert!(value.match_string("a-anything"));
    }

    #[test]
    fn test_escapes() {
        let list = parse(".sm\\:flex", SelectorSyntax::Css);
        assert_eq!(
            list[0].nodes[0].simple_value().and_then(|v| v.as_str()),
            Some("sm:flex")
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(render(".a/* x */.b", SelectorSyntax::Css), vec![".a.b"]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_selector_list(".a >", SelectorSyntax::Css, 0),
            Err(SelectorParseError::DanglingCombinator { .. })
        ));
        assert!(matches!(
            parse_selector_list(".a,,.b", SelectorSyntax::Css, 0),
            Err(SelectorParseError::Empty { .. })
        ));
        assert!(matches!(
            parse_selector_list(":not(.a", SelectorSyntax::Css, 0),
            Err(SelectorParseError::Unclosed { delimiter: '(', .. })
        ));
        assert!(matches!(
            parse_selector_list("[href", SelectorSyntax::Css, 0),
            Err(SelectorParseError::Unclosed { delimiter: '[', .. })
        ));
        assert!(matches!(
            parse_selector_list(".a > > .b", SelectorSyntax::Css, 0),
            Err(SelectorParseError::Unexpected { found: '>', .. })
        ));
    }

    #[test]
    fn test_offset_spans() {
        let list = parse_selector_list(".a .b", SelectorSyntax::Css, 10).unwrap();
        assert_eq!(list[0].nodes[2].span(), Span::new(13, 15));
    }
}
