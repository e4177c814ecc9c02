use super::{LevelSelection, NestContext, NestingDialect};
use crate::selector::NestingReference;
use crate::stylesheet::StyleLang;

/// Stylus: partial references `^[N]` and `^[N..M]`, plus `~/`, `../` and `/`.
///
/// Levels count from the outermost rule, negative indices from the innermost.
#[derive(Debug, Clone, Copy, Default)]
pub struct StylusNesting;

impl StylusNesting {
    fn normalize(index: i64, depth: usize) -> Option<usize> {
        let depth = i64::try_from(depth).ok()?;
        let index = if index < 0 { depth + index } else { index };
        (0..depth).contains(&index).then_some(index as usize)
    }
}

impl NestingDialect for StylusNesting {
    fn lang(&self) -> StyleLang {
        StyleLang::Stylus
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
            NestingReference::Index(n) => Self::normalize(n, depth).map(LevelSelection::Through),
            NestingReference::Range(from, to) => {
                let start = Self::normalize(from, depth)?;
                let end = Self::normalize(to, depth)?;
                match start {
                    _ if start > end => None,
                    0 => Some(LevelSelection::Through(end)),
                    _ => Some(LevelSelection::Range(start, end)),
                }
            }
            NestingReference::Initial => (depth > 0).then_some(LevelSelection::Through(0)),
            NestingReference::Relative => Some(match depth {
                0 | 1 => LevelSelection::Detached,
                _ => LevelSelection::Through(depth - 2),
            }),
            NestingReference::Root => Some(LevelSelection::Detached),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_reference_levels() {
        let levels = |r| StylusNesting.reference_levels(r, 3);
        assert_eq!(levels(NestingReference::Index(0)), Some(LevelSelection::Through(0)));
        assert_eq!(levels(NestingReference::Index(-1)), Some(LevelSelection::Through(2)));
        assert_eq!(levels(NestingReference::Index(3)), None);
        assert_eq!(levels(NestingReference::Range(0, 1)), Some(LevelSelection::Through(1)));
        assert_eq!(levels(NestingReference::Range(1, -1)), Some(LevelSelection::Range(1, 2)));
        assert_eq!(levels(NestingReference::Range(2, 1)), None);
        assert_eq!(levels(NestingReference::Relative), Some(LevelSelection::Through(1)));
        assert_eq!(levels(NestingReference::Root), Some(LevelSelection::Detached));
    }
}
