//! Resolved selectors evaluated against a component template.

use vize_pochoir::{
    AnalysisContext, Candidate, CompiledOptions, ComponentState, QueryContext,
    ReverseQueryContext, ScopedCssOptions, StyleLang, StyleSheet, StyleSheetBuilder,
};
use vize_relief::{TemplateBuilder, TemplateTree};

fn todo_template() -> TemplateTree {
    TemplateBuilder::new()
        .element("div", |root| {
            root.attr("class", "todo").attr(":class", "{ done: allDone }");
            root.element("transition", |t| {
                t.attr("name", "fade");
                t.element("p", |p| {
                    p.attr("v-if", "show").attr("class", "msg");
                });
            });
            root.element("ul", |ul| {
                ul.element("li", |li| {
                    li.attr("v-for", "todo in todos")
                        .attr("class", "item")
                        .attr(":class", "itemClass");
                });
            });
            root.element("MyButton", |b| {
                b.attr("class", "btn");
            });
        })
        .build()
}

fn todo_state() -> ComponentState {
    ComponentState::new().with_property("itemClass", "'item--' + todo.kind")
}

fn todo_sheet() -> StyleSheet {
    StyleSheetBuilder::new(StyleLang::Scss)
        .scoped(true)
        .rule(".todo", |todo| {
            todo.rule("&.done", |_| {});
            todo.rule(".fade-enter-active", |_| {});
            todo.rule(".item", |item| {
                item.rule("&--active", |_| {});
            });
            todo.rule(":deep(.icon)", |_| {});
            todo.rule("> ul > .missing", |_| {});
            todo.rule("> .msg", |_| {});
        })
        .build()
}

fn unused(sheet: &StyleSheet, tree: &TemplateTree, state: &ComponentState) -> Vec<String> {
    let options = CompiledOptions::default();
    let ctx = AnalysisContext::new(sheet, tree, state, &options);
    let query = QueryContext::new(&ctx);
    ctx.resolved_selectors()
        .iter()
        .filter(|sel| !query.query(&sel.nodes).is_used())
        .map(|sel| sel.render())
        .collect()
}

#[test]
fn forward_usage() {
    let sheet = todo_sheet();
    let tree = todo_template();
    let state = todo_state();
    // The transition wrapper is not rendered, so `.msg` is a direct child.
    assert_eq!(unused(&sheet, &tree, &state), vec![".todo>ul>.missing"]);
}

#[test]
fn unknown_property_is_permissive() {
    let sheet = StyleSheetBuilder::new(StyleLang::Css)
        .scoped(true)
        .rule("ul > .anything", |_| {})
        .build();
    let tree = todo_template();
    // Without a value for `itemClass`, the binding may produce any class.
    assert!(unused(&sheet, &tree, &ComponentState::new()).is_empty());
    // With a known value, `.anything` can no longer match.
    assert_eq!(
        unused(&sheet, &tree, &todo_state()),
        vec!["ul>.anything"]
    );
}

#[test]
fn reverse_coverage_of_elements() {
    let sheet = todo_sheet();
    let tree = todo_template();
    let state = todo_state();
    let options = CompiledOptions::default();
    let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);
    let li = ctx
        .elements()
        .iter()
        .find(|el| el.tag() == "li")
        .map(|el| el.id())
        .unwrap();

    let reverse = ReverseQueryContext::new(&ctx);
    let covering: Vec<String> = ctx
        .resolved_selectors()
        .iter()
        .filter(|sel| reverse.query_elements(&sel.nodes, [li]).is_matched())
        .map(|sel| sel.render())
        .collect();
    assert_eq!(covering, vec![".todo .item", ".todo .item--active"]);
}

#[test]
fn reverse_reports_first_unmatched_node() {
    let sheet = StyleSheetBuilder::new(StyleLang::Css)
        .scoped(true)
        .rule(".page .todo .msg", |_| {})
        .build();
    let tree = todo_template();
    let state = todo_state();
    let options = CompiledOptions::default();
    let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);
    let selector = &ctx.resolved_selectors()[0];

    let strict = ReverseQueryContext::new(&ctx).query(&selector.nodes);
    assert_eq!(strict.first_unmatched, Some(0));

    let lenient = ReverseQueryContext::new(&ctx)
        .allow_outside(true)
        .query(&selector.nodes);
    assert!(lenient.is_matched());
    assert!(lenient.matched.contains(&Candidate::Outside));
}

#[test]
fn options_modulate_class_matching() {
    let sheet = StyleSheetBuilder::new(StyleLang::Css)
        .scoped(true)
        .rule(".card--wide", |_| {})
        .rule(".documented", |_| {})
        .build();
    let tree = TemplateBuilder::new()
        .element("div", |d| {
            d.attr("class", "card");
        })
        .build();
    let state = ComponentState::new().with_doc_comment("@class documented");

    let options = ScopedCssOptions::from_json(
        r#"{ "ignoreBEMModifier": true, "captureClassesFromDoc": ["/@class\\s+(\\S+)/"] }"#,
    )
    .unwrap()
    .compile()
    .unwrap();
    let ctx = AnalysisContext::new(&sheet, &tree, &state, &options);
    let query = QueryContext::new(&ctx);
    for selector in ctx.resolved_selectors() {
        assert!(query.query(&selector.nodes).is_used(), "{selector}");
    }

    let plain = CompiledOptions::default();
    let ctx = AnalysisContext::new(&sheet, &tree, &state, &plain);
    let query = QueryContext::new(&ctx);
    assert!(ctx
        .resolved_selectors()
        .iter()
        .all(|selector| !query.query(&selector.nodes).is_used()));
}
