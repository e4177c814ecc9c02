//! Component state side-channel.
//!
//! Script analysis is done elsewhere; what the engine needs from it is handed
//! in as expression source text: the candidate return values of `data()` and
//! `computed` properties, the values passed to `classList` of template refs,
//! and the component's documentation comments.

use vize_carton::{CompactString, FxHashMap};

use crate::expression::ValueExpr;

/// Statically extracted facts about a component's script.
#[derive(Debug, Clone, Default)]
pub struct ComponentState {
    properties: FxHashMap<CompactString, Vec<ValueExpr>>,
    ref_class_lists: FxHashMap<CompactString, Vec<ValueExpr>>,
    doc_comments: Vec<CompactString>,
}

impl ComponentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate value for a `data()` / `computed` property.
    pub fn with_property(mut self, name: &str, expression: &str) -> Self {
        self.add_property(name, expression);
        self
    }

    /// Add a value passed to `this.$refs.<ref>.classList.add(...)` or similar.
    pub fn with_ref_class_list(mut self, ref_name: &str, expression: &str) -> Self {
        self.ref_class_lists
            .entry(ref_name.into())
            .or_default()
            .push(ValueExpr::parse(expression));
        self
    }

    pub fn with_doc_comment(mut self, text: &str) -> Self {
        self.doc_comments.push(text.into());
        self
    }

    pub fn add_property(&mut self, name: &str, expression: &str) {
        self.properties
            .entry(name.into())
            .or_default()
            .push(ValueExpr::parse(expression));
    }

    /// Candidate values of a property; empty when the property is not known.
    #[inline]
    pub fn property(&self, name: &str) -> &[ValueExpr] {
        self.properties.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    #[inline]
    pub fn ref_class_list(&self, ref_name: &str) -> &[ValueExpr] {
        self.ref_class_lists
            .get(ref_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn doc_comments(&self) -> &[CompactString] {
        &self.doc_comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_state_lookup() {
        let state = ComponentState::new()
            .with_property("cls", "'a'")
            .with_property("cls", "'b'")
            .with_ref_class_list("box", "'shown'");
        assert_eq!(state.property("cls").len(), 2);
        assert!(state.property("other").is_empty());
        assert!(!state.has_property("other"));
        assert_eq!(
            state.ref_class_list("box"),
            &[ValueExpr::Str(Template::of("shown"))]
        );
    }
}
