//! Relief - The sculptured AST surface for Vize Vue templates.
//!
//! Like a relief sculpture standing out from its background, this crate lifts the
//! element structure out of a `<template>` block into a read-only tree that style
//! analysis can walk in both directions.

pub mod ast;
pub mod builder;
pub mod tree;

pub use ast::*;
pub use builder::{parse_prop, ElementScope, TemplateBuilder};
pub use tree::TemplateTree;
