use super::{LevelSelection, NestContext, NestingDialect};
use crate::selector::NestingReference;
use crate::stylesheet::StyleLang;

/// CSS Nesting: `&` refers to the parent rule, and only `@nest` concatenates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssNesting;

impl NestingDialect for CssNesting {
    fn lang(&self) -> StyleLang {
        StyleLang::Css
    }

    fn concatenates(&self, context: NestContext) -> bool {
        context == NestContext::NestAtRule
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
}
