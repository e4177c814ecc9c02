//! Simple selector tests.

use crate::context::AnalysisContext;
use crate::element::{AttrValue, ElementRef};
use crate::selector::{AttributeOperator, AttributeSelector, SelectorNode, SimpleSelector};
use crate::template::Template;

use super::Candidate;

/// Whether a candidate may match one simple selector.
///
/// `Outside` and `Foreign` match everything, as do pseudo-classes and
/// anything else without a static answer.
pub fn matches_simple(
    ctx: &AnalysisContext<'_>,
    candidate: Candidate,
    node: &SelectorNode,
) -> bool {
    let Some(el) = candidate.as_element().and_then(|id| ctx.element(id)) else {
        return true;
    };
    match node {
        SelectorNode::Type(s) => matches_type(el, s),
        SelectorNode::Id(s) => {
            el.is_component() || ctx.id_values(el).iter().any(|v| v.matches(&s.value))
        }
        SelectorNode::Class(s) => el.is_component() || matches_class(ctx, el, &s.value),
        SelectorNode::Attribute(attr) => el.is_component() || matches_attribute(ctx, el, attr),
        SelectorNode::Universal(_)
        | SelectorNode::Nesting(_)
        | SelectorNode::Pseudo(_)
        | SelectorNode::Unknown(_)
        | SelectorNode::Combinator(_) => true,
    }
}

fn matches_type(el: ElementRef<'_>, s: &SimpleSelector) -> bool {
    if el.is_component() {
        return true;
    }
    match el.rendered_tag() {
        Some(tag) => tag.to_lowercase().matches(&s.value.to_lowercase()),
        None => false,
    }
}

fn matches_class<'a>(ctx: &AnalysisContext<'a>, el: ElementRef<'a>, class: &Template) -> bool {
    let docs = ctx.doc_classes();
    if !docs.is_empty() && docs.iter().any(|doc| class.match_string(doc)) {
        return true;
    }
    let values = ctx.class_values(el);
    if values.iter().any(|v| v.matches(class)) {
        return true;
    }
    if ctx.options().ignore_bem_modifier && class.has_string("--") {
        if let Some(block) = class.divide("--").into_iter().next() {
            return values.iter().any(|v| v.matches(&block));
        }
    }
    false
}

fn matches_attribute<'a>(
    ctx: &AnalysisContext<'a>,
    el: ElementRef<'a>,
    attr: &AttributeSelector,
) -> bool {
    let name = attr.name.to_ascii_lowercase();
    let values: Vec<AttrValue> = match name.as_str() {
        "class" => {
            let classes = ctx.class_values(el);
            let mut values = classes.to_vec();
            // The whole attribute, for `=` and friends.
            if !classes.is_empty() {
                let mut joined = Template::empty();
                for (i, class) in classes.iter().enumerate() {
                    match class {
                        AttrValue::Static(t) => {
                            if i > 0 {
                                joined.push_literal(" ");
                            }
                            joined = joined.concat(t);
                        }
                        AttrValue::Unknown => joined.push_interpolation("class"),
                    }
                }
                values.push(AttrValue::Static(joined));
            }
            values
        }
        "id" => ctx.id_values(el).to_vec(),
        _ => el.attribute_values(&name, ctx.state()),
    };
    if values.is_empty() {
        return false;
    }
    let (Some(operator), Some(expected)) = (attr.operator, attr.value.as_ref()) else {
        return true;
    };
    let expected = if attr.case_insensitive {
        expected.to_lowercase()
    } else {
        expected.clone()
    };
    let pattern = operator_pattern(operator, &expected);

    values.iter().any(|value| {
        let AttrValue::Static(actual) = value else {
            return true;
        };
        let actual = if attr.case_insensitive {
            actual.to_lowercase()
        } else {
            actual.clone()
        };
        match operator {
            AttributeOperator::Includes => actual
                .split_whitespace()
                .iter()
                .any(|token| token.matches(&expected)),
            AttributeOperator::DashMatch => {
                actual.matches(&expected) || actual.matches(&pattern)
            }
            _ => actual.matches(&pattern),
        }
    })
}

/// Value pattern an attribute value must intersect for the operator.
fn operator_pattern(operator: AttributeOperator, expected: &Template) -> Template {
    let any = Template::interpolation("*");
    match operator {
        AttributeOperator::Equals | AttributeOperator::Includes => expected.clone(),
        AttributeOperator::DashMatch => expected.concat(&Template::of("-")).concat(&any),
        AttributeOperator::Prefix => expected.concat(&any),
        AttributeOperator::Suffix => any.concat(expected),
        AttributeOperator::Substring => any.concat(expected).concat(&any),
    }
}
