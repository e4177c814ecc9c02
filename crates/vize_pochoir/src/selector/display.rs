use std::fmt::{self, Display, Write};

use super::{Combinator, NestingReference, PseudoArgs, Selector, SelectorNode};

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes)
    }
}

/// Render a node list the way it reads in a stylesheet.
pub fn write_nodes(f: &mut impl Write, nodes: &[SelectorNode]) -> fmt::Result {
    for node in nodes {
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Render a node list into a string.
pub fn render_nodes(nodes: &[SelectorNode]) -> String {
    let mut out = String::new();
    let _ = write_nodes(&mut out, nodes);
    out
}

impl Display for NestingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("&"),
            Self::Index(n) => write!(f, "^[{n}]"),
            Self::Range(start, end) => write!(f, "^[{start}..{end}]"),
            Self::Initial => f.write_str("~/"),
            Self::Relative => f.write_str("../"),
            Self::Root => f.write_str("/"),
        }
    }
}

impl Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(n) => write!(f, "{}", n.value),
            Self::Id(n) => write!(f, "#{}", n.value),
            Self::Class(n) => write!(f, ".{}", n.value),
            Self::Universal(_) => f.write_str("*"),
            Self::Attribute(attr) => {
                write!(f, "[{}", attr.name)?;
                if let (Some(op), Some(value)) = (attr.operator, &attr.value) {
                    write!(f, "{}\"{}\"", op.as_str(), value)?;
                }
                if attr.case_insensitive {
                    f.write_str(" i")?;
                }
                f.write_char(']')
            }
            Self::Nesting(n) => write!(f, "{}", n.reference),
            Self::Pseudo(pseudo) => {
                f.write_str(&pseudo.name)?;
                match &pseudo.args {
                    PseudoArgs::None => Ok(()),
                    PseudoArgs::Raw(raw) => write!(f, "({raw})"),
                    PseudoArgs::Selectors(list) => {
                        f.write_char('(')?;
                        for (i, sel) in list.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{sel}")?;
                        }
                        f.write_char(')')
                    }
                }
            }
            Self::Combinator(c) => match c.kind {
                Combinator::Deep(_) => write!(f, " {} ", c.kind.as_str()),
                kind => f.write_str(kind.as_str()),
            },
            Self::Unknown(n) => f.write_str(&n.value),
        }
    }
}
