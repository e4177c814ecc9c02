use super::{LevelSelection, NestContext, NestingDialect};
use crate::selector::NestingReference;
use crate::stylesheet::StyleLang;

/// SCSS: `&` concatenates everywhere and `@at-root` detaches from the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScssNesting;

impl NestingDialect for ScssNesting {
    fn lang(&self) -> StyleLang {
        StyleLang::Scss
    }

    fn concatenates(&self, _context: NestContext) -> bool {
        true
    }

    fn reference_levels(
        &self,
        reference: NestingReference,
        depth: usize,
    ) -> Option<LevelSelection> {
        match reference {
            NestingReference::Parent => depth.checked_sub(1).map(LevelSelection::Through),
            _ => None,
        }
    }

    fn supports_at_root(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::NestingResolver;
    use crate::stylesheet::StyleSheetBuilder;

    fn render(sheet: &crate::stylesheet::StyleSheet) -> Vec<String> {
        NestingResolver::new(&ScssNesting)
            .resolve(sheet)
            .iter()
            .map(|r| r.render())
            .collect()
    }

    #[test]
    fn test_scss_dialect() {
        assert_eq!(ScssNesting.lang(), StyleLang::Scss);
        assert!(ScssNesting.concatenates(NestContext::Rule));
        assert!(ScssNesting.concatenates(NestContext::NestAtRule));
        assert!(ScssNesting.supports_at_root());
        assert_eq!(
            ScssNesting.reference_levels(NestingReference::Parent, 3),
            Some(LevelSelection::Through(2))
        );
        assert_eq!(ScssNesting.reference_levels(NestingReference::Parent, 0), None);
        assert_eq!(ScssNesting.reference_levels(NestingReference::Index(0), 2), None);
    }

    #[test]
    fn test_scss_concatenation() {
        let sheet = StyleSheetBuilder::new(StyleLang::Scss)
            .rule(".card", |card| {
                card.rule("&__title, &--wide", |_| {});
                card.rule("a&", |_| {});
            })
            .build();
        assert_eq!(
            render(&sheet),
            vec![".card", ".card__title", ".card--wide", "a.card"]
        );
    }

    #[test]
    fn test_scss_at_root() {
        let sheet = StyleSheetBuilder::new(StyleLang::Scss)
            .rule(".menu", |menu| {
                menu.at_rule("at-root", ".item", |_| {});
                menu.at_rule("at-root", "", |block| {
                    block.rule(".detached", |_| {});
                });
            })
            .build();
        assert_eq!(render(&sheet), vec![".menu", ".item", ".detached"]);
    }
}
