//! Bound expression lowering.
//!
//! `:class`, `:id` and `v-bind` values are JavaScript expressions. Only the
//! shapes that can name a class statically are kept: strings, string
//! concatenation, template literals, arrays, object literals, ternaries and
//! logical operators. Identifiers are kept by name so they can be looked up in
//! the component state. Anything else becomes [`ValueExpr::Unknown`], which the
//! query engine treats as "may be anything".

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpressionElement, Expression, ObjectPropertyKind, PropertyKey, TemplateLiteral,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use oxc_syntax::operator::{BinaryOperator, LogicalOperator};
use vize_carton::CompactString;

use crate::template::Template;

/// Logical operators that pass one of their operands through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&`: the right operand, when it is produced at all.
    And,
    /// `||`
    Or,
    /// `??`
    Coalesce,
}

/// Owned, statically relevant shape of a bound expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExpr {
    /// String value, possibly partially unknown.
    Str(Template),
    Array(Vec<ValueExpr>),
    Object(Vec<ObjectEntry>),
    Conditional {
        consequent: Box<ValueExpr>,
        alternate: Box<ValueExpr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<ValueExpr>,
        right: Box<ValueExpr>,
    },
    /// A bare reference, `name` or `this.name`.
    Identifier(CompactString),
    Unknown,
}

/// One property of an object literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// `None` for spreads and computed keys that cannot be read.
    pub key: Option<Template>,
    pub value: ValueExpr,
}

impl ValueExpr {
    /// Parse and lower expression source. Unparsable input is `Unknown`.
    pub fn parse(source: &str) -> ValueExpr {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path("expr.ts").unwrap_or_default();
        match Parser::new(&allocator, source, source_type).parse_expression() {
            Ok(expr) => Lowering { source }.lower(&expr),
            Err(_) => {
                tracing::trace!(source, "bound expression does not parse");
                ValueExpr::Unknown
            }
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether the value may be an object with unreadable keys.
    pub fn has_unknown_keys(&self) -> bool {
        match self {
            Self::Object(entries) => entries.iter().any(|e| e.key.is_none()),
            Self::Unknown | Self::Identifier(_) => true,
            _ => false,
        }
    }
}

struct Lowering<'s> {
    source: &'s str,
}

impl Lowering<'_> {
    fn lower(&self, expr: &Expression<'_>) -> ValueExpr {
        match expr {
            Expression::StringLiteral(s) => ValueExpr::Str(Template::of(s.value.as_str())),
            Expression::TemplateLiteral(tpl) => ValueExpr::Str(self.template_literal(tpl)),
            Expression::Identifier(id) => ValueExpr::Identifier(id.name.as_str().into()),
            Expression::StaticMemberExpression(member)
                if matches!(member.object, Expression::ThisExpression(_)) =>
            {
                ValueExpr::Identifier(member.property.name.as_str().into())
            }
            Expression::ArrayExpression(arr) => ValueExpr::Array(
                arr.elements
                    .iter()
                    .filter_map(|elem| match elem {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            Some(self.lower(&spread.argument))
                        }
                        ArrayExpressionElement::Elision(_) => None,
                        _ => elem.as_expression().map(|e| self.lower(e)),
                    })
                    .collect(),
            ),
            Expression::ObjectExpression(obj) => ValueExpr::Object(
                obj.properties
                    .iter()
                    .map(|prop| match prop {
                        ObjectPropertyKind::ObjectProperty(p) => ObjectEntry {
                            key: self.property_key(&p.key, p.computed),
                            value: self.lower(&p.value),
                        },
                        ObjectPropertyKind::SpreadProperty(spread) => ObjectEntry {
                            key: None,
                            value: self.lower(&spread.argument),
                        },
                    })
                    .collect(),
            ),
            Expression::ConditionalExpression(cond) => ValueExpr::Conditional {
                consequent: Box::new(self.lower(&cond.consequent)),
                alternate: Box::new(self.lower(&cond.alternate)),
            },
            Expression::LogicalExpression(logical) => ValueExpr::Logical {
                op: match logical.operator {
                    LogicalOperator::And => LogicalOp::And,
                    LogicalOperator::Or => LogicalOp::Or,
                    LogicalOperator::Coalesce => LogicalOp::Coalesce,
                },
                left: Box::new(self.lower(&logical.left)),
                right: Box::new(self.lower(&logical.right)),
            },
            Expression::BinaryExpression(binary) if binary.operator == BinaryOperator::Addition => {
                let left = self.lower(&binary.left);
                let right = self.lower(&binary.right);
                if !matches!(left, ValueExpr::Str(_)) && !matches!(right, ValueExpr::Str(_)) {
                    return ValueExpr::Unknown;
                }
                ValueExpr::Str(
                    self.as_template(left, &binary.left)
                        .concat(&self.as_template(right, &binary.right)),
                )
            }
            Expression::ParenthesizedExpression(paren) => self.lower(&paren.expression),
            Expression::TSAsExpression(e) => self.lower(&e.expression),
            Expression::TSSatisfiesExpression(e) => self.lower(&e.expression),
            Expression::TSNonNullExpression(e) => self.lower(&e.expression),
            Expression::TSTypeAssertion(e) => self.lower(&e.expression),
            _ => ValueExpr::Unknown,
        }
    }

    fn template_literal(&self, tpl: &TemplateLiteral<'_>) -> Template {
        let mut out = Template::empty();
        for (i, quasi) in tpl.quasis.iter().enumerate() {
            let text = quasi.value.cooked.as_ref().unwrap_or(&quasi.value.raw);
            out.push_literal(text.as_str());
            if let Some(expr) = tpl.expressions.get(i) {
                let lowered = self.lower(expr);
                out = out.concat(&self.as_template(lowered, expr));
            }
        }
        out
    }

    fn property_key(&self, key: &PropertyKey<'_>, computed: bool) -> Option<Template> {
        match key {
            PropertyKey::StaticIdentifier(id) if !computed => Some(Template::of(id.name.as_str())),
            PropertyKey::StringLiteral(s) => Some(Template::of(s.value.as_str())),
            _ if computed => match self.lower(key.as_expression()?) {
                ValueExpr::Str(template) => Some(template),
                _ => None,
            },
            _ => None,
        }
    }

    /// A lowered operand as text, opaque unless it is a string.
    fn as_template(&self, value: ValueExpr, expr: &Expression<'_>) -> Template {
        match value {
            ValueExpr::Str(template) => template,
            _ => {
                let span = expr.span();
                let raw = self
                    .source
                    .get(span.start as usize..span.end as usize)
                    .unwrap_or_default();
                Template::interpolation(raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &ValueExpr) -> String {
        match value {
            ValueExpr::Str(t) => t.to_string(),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(text(&ValueExpr::parse("'foo bar'")), "foo bar");
        let concat = ValueExpr::parse("'btn-' + size");
        assert_eq!(text(&concat), "btn-size");
        let ValueExpr::Str(t) = &concat else { unreachable!() };
        assert!(t.has_interpolation());
        assert!(t.match_string("btn-large"));

        let literal = ValueExpr::parse("`item item--${kind}`");
        let ValueExpr::Str(t) = &literal else { unreachable!() };
        assert!(t.starts_with("item "));
        assert!(t.has_interpolation());
    }

    #[test]
    fn test_object_and_array() {
        let value = ValueExpr::parse("[{ active: isActive, 'is-open': open }, cls, ...rest]");
        let ValueExpr::Array(items) = value else { panic!("expected array") };
        assert_eq!(items.len(), 3);
        let ValueExpr::Object(entries) = &items[0] else { panic!("expected object") };
        assert_eq!(entries[0].key, Some(Template::of("active")));
        assert_eq!(entries[1].key, Some(Template::of("is-open")));
        assert_eq!(items[1], ValueExpr::Identifier("cls".into()));
    }

    #[test]
    fn test_computed_keys() {
        let ValueExpr::Object(entries) = ValueExpr::parse("{ [`${p}-x`]: a, [key]: b }") else {
            panic!("expected object")
        };
        assert!(entries[0].key.as_ref().is_some_and(Template::has_interpolation));
        assert_eq!(entries[1].key, None);
    }

    #[test]
    fn test_operators() {
        assert!(matches!(
            ValueExpr::parse("ok ? 'a' : 'b'"),
            ValueExpr::Conditional { .. }
        ));
        assert!(matches!(
            ValueExpr::parse("(flag && 'on') as string"),
            ValueExpr::Logical { op: LogicalOp::And, .. }
        ));
        assert_eq!(ValueExpr::parse("this.klass"), ValueExpr::Identifier("klass".into()));
        assert!(ValueExpr::parse("compute()").is_unknown());
        assert!(ValueExpr::parse("a +").is_unknown());
    }
}
