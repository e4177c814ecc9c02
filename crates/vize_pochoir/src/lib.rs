//! # vize_pochoir
//!
//! Pochoir - Scoped style matching for Vize.
//!
//! ## Name Origin
//!
//! **Pochoir** (/pɔ.ʃwaʁ/) is the French stencil technique: paint is brushed
//! through a cut-out so it lands only where the openings are. A scoped
//! `<style>` block works the same way. Its selectors only reach the elements
//! the component's template cuts out, and `vize_pochoir` checks where each
//! selector can land.
//!
//! ## Purpose
//!
//! - **Templates**: strings with unknown parts, matched by intersection
//! - **Selectors**: a selector AST covering CSS, SCSS and Stylus syntax
//! - **Nesting**: flattening nested rules into complete selectors
//! - **Elements**: the rendered element tree with the values classes,
//!   ids and attributes may take
//! - **Queries**: evaluating selectors against that tree, left to right
//!   and right to left
//!
//! ## Architecture
//!
//! ```text
//!  vize_relief (template tree)     style block (StyleSheet)
//!          ↓                               ↓
//!   element adapter                nesting resolver
//!          ↘                               ↙
//!            AnalysisContext  →  QueryContext / ReverseQueryContext
//!                                        ↓
//!                               vize_patina (lint rules)
//! ```

// Core modules
pub mod error;
pub mod span;
pub mod template;

// Style side
pub mod resolver;
pub mod selector;
pub mod stylesheet;

// Template side
pub mod element;
pub mod expression;
pub mod options;
pub mod state;

// Analysis
pub mod context;
pub mod query;

pub use context::{AnalysisContext, ForeignAnchor};
pub use element::{AttrValue, BuiltIn, ElementRef};
pub use error::{OptionsError, SelectorParseError};
pub use expression::{LogicalOp, ObjectEntry, ValueExpr};
pub use options::{CompiledOptions, ScopedCssOptions};
pub use query::{
    Candidate, CandidateSet, QueryContext, QueryResult, ReverseQueryContext, ReverseQueryResult,
};
pub use resolver::{resolve_stylesheet, NestingResolver, ResolvedSelector};
pub use selector::{parse_selector_list, Selector, SelectorNode, SelectorSyntax};
pub use span::Span;
pub use state::ComponentState;
pub use stylesheet::{RuleId, StyleLang, StyleNode, StyleSheet, StyleSheetBuilder};
pub use template::{InterpolationSyntax, Template, TemplateElement};
