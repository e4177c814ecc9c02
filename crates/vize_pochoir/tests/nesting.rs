//! Nesting resolution across the three style dialects.

use vize_pochoir::{resolve_stylesheet, StyleLang, StyleSheet, StyleSheetBuilder};

fn resolved(sheet: &StyleSheet) -> String {
    resolve_stylesheet(sheet)
        .iter()
        .map(|r| r.render())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn css_nesting() {
    let sheet = StyleSheetBuilder::new(StyleLang::Css)
        .scoped(true)
        .rule("div", |div| {
            div.rule("& > .foo", |_| {});
            div.at_rule("media", "(min-width: 640px)", |media| {
                media.rule(".wide", |_| {});
            });
        })
        .at_rule("keyframes", "spin", |frames| {
            frames.rule("from", |_| {});
            frames.rule("to", |_| {});
        })
        .build();

    insta::assert_snapshot!(resolved(&sheet), @r"
    div
    div>.foo
    div .wide
    ");
}

#[test]
fn scss_nesting() {
    let sheet = StyleSheetBuilder::new(StyleLang::Scss)
        .rule(".btn", |btn| {
            btn.rule("&--primary", |_| {});
            btn.rule("&__icon, &:hover", |_| {});
            btn.rule(".toolbar &", |_| {});
            btn.rule(":not(&)", |_| {});
            btn.rule("> span", |_| {});
        })
        .build();

    insta::assert_snapshot!(resolved(&sheet), @r"
    .btn
    .btn--primary
    .btn__icon
    .btn:hover
    .toolbar .btn
    :not(.btn)
    .btn>span
    ");
}

#[test]
fn scss_at_root() {
    let sheet = StyleSheetBuilder::new(StyleLang::Scss)
        .rule(".parent", |parent| {
            parent.at_rule("at-root", ".child", |child| {
                child.rule("&:hover", |_| {});
            });
            parent.at_rule("at-root", "&-sibling", |_| {});
        })
        .build();

    insta::assert_snapshot!(resolved(&sheet), @r"
    .parent
    .child
    .child:hover
    .parent-sibling
    ");
}

#[test]
fn stylus_references() {
    let sheet = StyleSheetBuilder::new(StyleLang::Stylus)
        .rule(".foo", |foo| {
            foo.rule(".bar", |bar| {
                bar.rule("^[0]:hover .baz", |_| {});
                bar.rule("^[-1]-x", |_| {});
                bar.rule("~/ .qux", |_| {});
                bar.rule("../ .quux", |_| {});
                bar.rule("/ .root", |_| {});
                bar.rule("^[1..-1] .r", |_| {});
                bar.rule("^[5] .gone", |_| {});
            });
        })
        .build();

    insta::assert_snapshot!(resolved(&sheet), @r"
    .foo
    .foo .bar
    .foo:hover .baz
    .foo .bar-x
    .foo .qux
    .foo .quux
    .root
    .bar .r
    ");
}

#[test]
fn inverted_stylus_range_is_dropped() {
    let sheet = StyleSheetBuilder::new(StyleLang::Stylus)
        .rule(".a", |a| {
            a.rule(".b", |b| {
                b.rule("^[1..0] .c, .d", |_| {});
            });
        })
        .build();

    // The sibling selector in the same rule still resolves.
    insta::assert_snapshot!(resolved(&sheet), @r"
    .a
    .a .b
    .a .b .d
    ");
}

#[test]
fn resolved_selectors_point_at_their_rule() {
    let sheet = StyleSheetBuilder::new(StyleLang::Scss)
        .scoped(true)
        .rule(".list", |list| {
            list.rule("&-item", |_| {});
        })
        .build();

    let resolved = resolve_stylesheet(&sheet);
    let item = &resolved[1];
    assert_eq!(item.render(), ".list-item");
    assert_eq!(item.span.source_text(&sheet.source), Some("&-item"));
    assert_ne!(item.rule, resolved[0].rule);
    assert!(sheet.find(item.rule).is_some());
}
