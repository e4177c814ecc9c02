//! Analysis options.

use regex::Regex;
use serde::{Deserialize, Serialize};
use vize_carton::{CompactString, FxHashSet};

use crate::error::OptionsError;

/// User-facing options, as found in lint configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopedCssOptions {
    /// Treat `.block--modifier` as used when `.block` is.
    #[serde(rename = "ignoreBEMModifier")]
    pub ignore_bem_modifier: bool,
    /// Patterns capturing class names from documentation comments.
    /// `/pattern/flags` is a regular expression, anything else a literal.
    pub capture_classes_from_doc: Vec<String>,
    /// Attributes besides `class` that carry class names (e.g. `active-class`).
    pub extra_class_attributes: Vec<String>,
    /// Analyse stylesheets without the `scoped` attribute too.
    pub check_unscoped: bool,
}

impl ScopedCssOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn compile(&self) -> Result<CompiledOptions, OptionsError> {
        let capture_classes_from_doc = self
            .capture_classes_from_doc
            .iter()
            .map(|pattern| compile_pattern(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompiledOptions {
            ignore_bem_modifier: self.ignore_bem_modifier,
            capture_classes_from_doc,
            extra_class_attributes: self
                .extra_class_attributes
                .iter()
                .map(|s| CompactString::from(s.as_str()))
                .collect(),
            check_unscoped: self.check_unscoped,
        })
    }
}

/// Options with patterns compiled.
#[derive(Debug, Clone, Default)]
pub struct CompiledOptions {
    pub ignore_bem_modifier: bool,
    pub capture_classes_from_doc: Vec<Regex>,
    pub extra_class_attributes: Vec<CompactString>,
    pub check_unscoped: bool,
}

impl CompiledOptions {
    /// Class names captured from documentation comments.
    ///
    /// Each match contributes its capture groups, or the whole match when the
    /// pattern has none.
    pub fn captured_classes<'d>(
        &self,
        docs: impl IntoIterator<Item = &'d str>,
    ) -> FxHashSet<CompactString> {
        let mut out = FxHashSet::default();
        if self.capture_classes_from_doc.is_empty() {
            return out;
        }
        for doc in docs {
            for pattern in &self.capture_classes_from_doc {
                for caps in pattern.captures_iter(doc) {
                    let groups: Vec<_> = caps.iter().skip(1).flatten().collect();
                    if groups.is_empty() {
                        out.extend(caps.get(0).map(|m| CompactString::from(m.as_str())));
                    } else {
                        out.extend(groups.iter().map(|m| CompactString::from(m.as_str())));
                    }
                }
            }
        }
        out
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, OptionsError> {
    let source = match pattern.strip_prefix('/').and_then(|p| p.rsplit_once('/')) {
        Some((body, flags)) => {
            let inline: String = flags
                .chars()
                .filter(|c| matches!(c, 'i' | 'm' | 's'))
                .collect();
            if inline.is_empty() {
                body.to_string()
            } else {
                format!("(?{inline}){body}")
            }
        }
        None => regex::escape(pattern),
    };
    Regex::new(&source).map_err(|source| OptionsError::InvalidPattern {
        pattern: pattern.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let options = ScopedCssOptions::from_json(
            r#"{ "ignoreBEMModifier": true, "extraClassAttributes": ["active-class"] }"#,
        )
        .unwrap();
        assert!(options.ignore_bem_modifier);
        assert_eq!(options.extra_class_attributes, vec!["active-class"]);
        assert!(options.capture_classes_from_doc.is_empty());
        assert!(ScopedCssOptions::from_json("{ \"checkUnscoped\": 1 }").is_err());
    }

    #[test]
    fn test_captured_classes() {
        let options = ScopedCssOptions {
            capture_classes_from_doc: vec![r"/(?:^|\s)@class\s+\.?([\w-]+)/gi".into()],
            ..Default::default()
        }
        .compile()
        .unwrap();
        let classes = options.captured_classes(["Styles\n@class .btn-primary\n@CLASS icon"]);
        assert!(classes.contains("btn-primary"));
        assert!(classes.contains("icon"));
    }

    #[test]
    fn test_invalid_pattern() {
        let options = ScopedCssOptions {
            capture_classes_from_doc: vec!["/(unclosed/".into()],
            ..Default::default()
        };
        assert!(matches!(
            options.compile(),
            Err(OptionsError::InvalidPattern { .. })
        ));
    }
}
