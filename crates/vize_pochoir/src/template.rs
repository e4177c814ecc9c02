//! Template values: strings with unresolved interpolation.
//!
//! A class name such as `.btn-#{$size}` or a bound `class` value such as
//! `` `item-${kind}` `` cannot be fully known statically. A [`Template`] keeps the
//! known literal fragments and replaces every unknown part with an opaque
//! interpolation marker. Comparisons treat each marker as "any characters", so two
//! values are considered equal whenever some concrete text could satisfy both.
//! Matching errs toward "matches": a selector must never be reported as unused when
//! it could apply.

use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::unsync::OnceCell;
use regex::Regex;
use vize_carton::{CompactString, SmallVec};

/// One run of a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateElement {
    /// Known text.
    Literal(CompactString),
    /// Unknown text. Holds the raw source only for display.
    Interpolation(CompactString),
}

/// Interpolation syntax recognized when reading raw selector text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationSyntax {
    /// Plain CSS has no interpolation.
    #[default]
    None,
    /// SCSS `#{...}`.
    Scss,
    /// Stylus `{...}`.
    Stylus,
}

/// A string made of literal fragments and opaque interpolation markers.
///
/// Adjacent literals are merged, as are adjacent interpolations, so a value with
/// a single literal element always has a known exact string.
#[derive(Clone, Default)]
pub struct Template {
    elements: SmallVec<[TemplateElement; 1]>,
    pattern: OnceCell<Option<Regex>>,
}

/// Separator accepted by [`Template::divide`].
#[derive(Debug, Clone, Copy)]
pub enum Divider<'s> {
    Str(&'s str),
    Pattern(&'s Regex),
    Whitespace,
}

impl<'s> From<&'s str> for Divider<'s> {
    fn from(value: &'s str) -> Self {
        Divider::Str(value)
    }
}

impl<'s> From<&'s Regex> for Divider<'s> {
    fn from(value: &'s Regex) -> Self {
        Divider::Pattern(value)
    }
}

impl Divider<'_> {
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self {
            Divider::Str("") => vec![text],
            Divider::Str(sep) => text.split(sep).collect(),
            Divider::Pattern(re) => re.split(text).collect(),
            Divider::Whitespace => text.split(char::is_whitespace).collect(),
        }
    }
}

impl Template {
    /// The empty string.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fully known string.
    pub fn of(text: &str) -> Self {
        let mut t = Self::empty();
        t.push_literal(text);
        t
    }

    /// A single unknown run.
    pub fn interpolation(raw: &str) -> Self {
        let mut t = Self::empty();
        t.push_interpolation(raw);
        t
    }

    /// Build from elements, applying the merge rules.
    pub fn from_elements(elements: impl IntoIterator<Item = TemplateElement>) -> Self {
        let mut t = Self::empty();
        for el in elements {
            t.push(el);
        }
        t
    }

    /// Read raw selector or value text, splitting interpolation runs.
    ///
    /// An unterminated interpolation swallows the rest of the text.
    pub fn parse(raw: &str, syntax: InterpolationSyntax) -> Self {
        let open = match syntax {
            InterpolationSyntax::None => return Self::of(raw),
            InterpolationSyntax::Scss => "#{",
            InterpolationSyntax::Stylus => "{",
        };

        let mut out = Self::empty();
        let mut rest = raw;
        while let Some(start) = rest.find(open) {
            out.push_literal(&rest[..start]);
            let body = start + open.len();
            match closing_brace(&rest[body..]) {
                Some(len) => {
                    let end = body + len + 1;
                    out.push_interpolation(&rest[start..end]);
                    rest = &rest[end..];
                }
                None => {
                    out.push_interpolation(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_literal(rest);
        out
    }

    pub fn push(&mut self, element: TemplateElement) {
        match element {
            TemplateElement::Literal(s) => self.push_literal(&s),
            TemplateElement::Interpolation(s) => self.push_interpolation(&s),
        }
    }

    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.pattern = OnceCell::new();
        if let Some(TemplateElement::Literal(last)) = self.elements.last_mut() {
            last.push_str(text);
        } else {
            self.elements
                .push(TemplateElement::Literal(CompactString::new(text)));
        }
    }

    pub fn push_interpolation(&mut self, raw: &str) {
        self.pattern = OnceCell::new();
        if let Some(TemplateElement::Interpolation(last)) = self.elements.last_mut() {
            last.push_str(raw);
        } else {
            self.elements
                .push(TemplateElement::Interpolation(CompactString::new(raw)));
        }
    }

    /// Concatenate two values.
    pub fn concat(&self, other: &Template) -> Template {
        let mut out = self.clone();
        for el in other.elements.iter().cloned() {
            out.push(el);
        }
        out
    }

    #[inline]
    pub fn elements(&self) -> &[TemplateElement] {
        &self.elements
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn has_interpolation(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, TemplateElement::Interpolation(_)))
    }

    /// The exact string, when nothing is interpolated.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self.elements.as_slice() {
            [] => Some(""),
            [TemplateElement::Literal(s)] => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether `text` could be a value of this template.
    pub fn match_string(&self, text: &str) -> bool {
        if let Some(s) = self.as_str() {
            return s == text;
        }
        match self.pattern() {
            Some(re) => re.is_match(text),
            None => true,
        }
    }

    /// Whether some concrete text could satisfy both values.
    pub fn matches(&self, other: &Template) -> bool {
        match (self.as_str(), other.as_str()) {
            (Some(a), Some(b)) => a == b,
            (Some(a), None) => other.match_string(a),
            (None, Some(b)) => self.match_string(b),
            (None, None) => wildcard_intersects(&self.tokens(), &other.tokens()),
        }
    }

    /// Whether some literal fragment contains `needle`.
    pub fn has_string(&self, needle: &str) -> bool {
        self.elements.iter().any(|e| match e {
            TemplateElement::Literal(s) => s.contains(needle),
            TemplateElement::Interpolation(_) => false,
        })
    }

    /// Whether the value could start with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        match self.elements.first() {
            None => prefix.is_empty(),
            Some(TemplateElement::Interpolation(_)) => true,
            Some(TemplateElement::Literal(lit)) => {
                if lit.len() >= prefix.len() || self.elements.len() == 1 {
                    lit.starts_with(prefix)
                } else {
                    prefix.starts_with(lit.as_str())
                }
            }
        }
    }

    /// Whether the value could end with `suffix`.
    pub fn ends_with(&self, suffix: &str) -> bool {
        match self.elements.last() {
            None => suffix.is_empty(),
            Some(TemplateElement::Interpolation(_)) => true,
            Some(TemplateElement::Literal(lit)) => {
                if lit.len() >= suffix.len() || self.elements.len() == 1 {
                    lit.ends_with(suffix)
                } else {
                    suffix.ends_with(lit.as_str())
                }
            }
        }
    }

    /// Split on a separator found in literal fragments. Interpolations are never
    /// split. Empty pieces are kept.
    pub fn divide<'s>(&self, separator: impl Into<Divider<'s>>) -> Vec<Template> {
        let separator = separator.into();
        let mut out = Vec::new();
        let mut current = Template::empty();
        for el in self.elements.iter() {
            match el {
                TemplateElement::Interpolation(raw) => current.push_interpolation(raw),
                TemplateElement::Literal(text) => {
                    let mut pieces = separator.split(text).into_iter();
                    if let Some(first) = pieces.next() {
                        current.push_literal(first);
                    }
                    for piece in pieces {
                        out.push(std::mem::take(&mut current));
                        current.push_literal(piece);
                    }
                }
            }
        }
        out.push(current);
        out
    }

    /// Whitespace separated tokens, without empty pieces.
    pub fn split_whitespace(&self) -> Vec<Template> {
        self.divide(Divider::Whitespace)
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn to_lowercase(&self) -> Template {
        Template::from_elements(self.elements.iter().map(|e| match e {
            TemplateElement::Literal(s) => TemplateElement::Literal(s.to_lowercase().into()),
            TemplateElement::Interpolation(raw) => TemplateElement::Interpolation(raw.clone()),
        }))
    }

    fn pattern(&self) -> Option<&Regex> {
        self.pattern
            .get_or_init(|| {
                let mut source = String::from("^");
                for el in self.elements.iter() {
                    match el {
                        TemplateElement::Literal(s) => source.push_str(&regex::escape(s)),
                        TemplateElement::Interpolation(_) => source.push_str("(?s:.*)"),
                    }
                }
                source.push('$');
                Regex::new(&source).ok()
            })
            .as_ref()
    }

    fn tokens(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for el in self.elements.iter() {
            match el {
                TemplateElement::Literal(s) => tokens.extend(s.chars().map(Token::Char)),
                TemplateElement::Interpolation(_) => tokens.push(Token::Any),
            }
        }
        tokens
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    Any,
}

/// Whether two wildcard patterns accept a common string.
fn wildcard_intersects(a: &[Token], b: &[Token]) -> bool {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    let mut reach = vec![false; (n + 1) * width];
    reach[n * width + m] = true;

    for i in (0..=n).rev() {
        for j in (0..=m).rev() {
            if i == n && j == m {
                continue;
            }
            let at = |i: usize, j: usize| reach[i * width + j];
            let value = match (a.get(i), b.get(j)) {
                (Some(Token::Any), _) => at(i + 1, j) || (j < m && at(i, j + 1)),
                (_, Some(Token::Any)) => at(i, j + 1) || (i < n && at(i + 1, j)),
                (Some(Token::Char(x)), Some(Token::Char(y))) => x == y && at(i + 1, j + 1),
                _ => false,
            };
            reach[i * width + j] = value;
        }
    }
    reach[0]
}

/// Offset of the `}` closing an interpolation body.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for Template {}

impl Hash for Template {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Template").field(&self.elements).finish()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for el in self.elements.iter() {
            match el {
                TemplateElement::Literal(s) | TemplateElement::Interpolation(s) => {
                    f.write_str(s)?
                }
            }
        }
        Ok(())
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::of(value)
    }
}
